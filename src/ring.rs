//! Lock-free SPSC ring buffer.
//!
//! The one handoff primitive between execution contexts: the capture ISR
//! feeds the decode thread, the decode path feeds the dispatch thread, and
//! the capture path feeds the log drain — each through its own ring.
//!
//! # Rules
//!
//! - Only atomic operations for synchronization; no locks.
//! - `push` never blocks: a full ring drops the item and counts the drop.
//! - Exactly one producer context and one consumer context per ring.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Lock-free single-producer single-consumer ring.
///
/// # Safety
///
/// Uses `UnsafeCell` internally but is safe to use because:
/// - exactly one context pushes and exactly one context pops (enforced by
///   design, not by the type system),
/// - the producer checks capacity against the consumer's published read
///   index before writing, so a slot is never written while readable,
/// - index publication uses Release stores paired with Acquire loads, so
///   the consumer sees the slot contents before it sees the index.
pub struct SpscRing<T: Copy, const N: usize> {
    slots: UnsafeCell<[Option<T>; N]>,

    /// Next write index (monotonically increasing, wraps via mask).
    write_idx: AtomicU32,

    /// Next read index (monotonically increasing, wraps via mask).
    read_idx: AtomicU32,

    /// Items dropped because the ring was full.
    dropped: AtomicU32,
}

// SAFETY: single producer, single consumer, atomic index coordination.
unsafe impl<T: Copy + Send, const N: usize> Sync for SpscRing<T, N> {}
unsafe impl<T: Copy + Send, const N: usize> Send for SpscRing<T, N> {}

impl<T: Copy, const N: usize> SpscRing<T, N> {
    const MASK: usize = N - 1;

    /// Create a new empty ring.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Ring size must be power of 2");

        Self {
            slots: UnsafeCell::new([None; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an item (producer context only).
    ///
    /// Returns `true` if queued, `false` if the ring was full and the item
    /// was dropped. O(1), never blocks, never allocates.
    #[inline]
    pub fn push(&self, item: T) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: single producer; capacity check above guarantees the
        // consumer is not reading this slot.
        unsafe {
            (*self.slots.get())[(write as usize) & Self::MASK] = Some(item);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Pop the next item (consumer context only).
    ///
    /// Returns `None` when the ring is empty.
    #[inline]
    pub fn pop(&self) -> Option<T> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: single consumer; the producer has published this slot
        // via the Release store on write_idx.
        let item = unsafe { (*self.slots.get())[(read as usize) & Self::MASK] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        item
    }

    /// Number of items waiting to be popped.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Whether any items are waiting.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending() != 0
    }

    /// Count of items dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset the dropped counter (e.g. after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Ring capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: Copy, const N: usize> Default for SpscRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

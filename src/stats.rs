//! Decode statistics.
//!
//! This core has no fault conditions — malformed timing degrades to
//! "no event" — so the observability surface is a set of counters:
//! what was decoded, what repeated, what timed out.

use core::sync::atomic::{AtomicU32, Ordering};

/// Thread-safe decode counters.
///
/// Incremented from the decode/tick paths through `&self`; read from
/// anywhere. Counters only grow; they are never cleared.
pub struct DecodeStats {
    /// Complete 32-bit frames decoded.
    datagrams: AtomicU32,

    /// Repeat codes seen.
    repeats: AtomicU32,

    /// Releases fired because the repeat deadline expired.
    timeout_releases: AtomicU32,
}

impl DecodeStats {
    pub const fn new() -> Self {
        Self {
            datagrams: AtomicU32::new(0),
            repeats: AtomicU32::new(0),
            timeout_releases: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn record_datagram(&self) {
        self.datagrams.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_repeat(&self) {
        self.repeats.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_timeout_release(&self) {
        self.timeout_releases.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn datagrams(&self) -> u32 {
        self.datagrams.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn repeats(&self) -> u32 {
        self.repeats.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn timeout_releases(&self) -> u32 {
        self.timeout_releases.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of all counters, for periodic reporting.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            datagrams: self.datagrams(),
            repeats: self.repeats(),
            timeout_releases: self.timeout_releases(),
        }
    }
}

impl Default for DecodeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the decode counters at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub datagrams: u32,
    pub repeats: u32,
    pub timeout_releases: u32,
}

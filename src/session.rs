//! Receiver session: the owned decoding context.
//!
//! One session per receiver pin. The thread that owns it is the single
//! producer of the event queue: `feed_pulse` runs for every captured
//! mark/space pair, `tick` runs on the periodic poll, and both complete
//! without blocking or allocating.
//!
//! Read accessors never fail on an unconfigured session — before a
//! protocol is bound they report neutral defaults (wildcard button code,
//! zeroed datagram, no data received).

use heapless::String;

use crate::button::ANY_BUTTON_CODE;
use crate::datagram::{Datagram, Protocol};
use crate::decoder::{IrDecoder, PulseOutcome};
use crate::events::{ButtonEvent, EventQueue};
use crate::stats::DecodeStats;
use crate::tracker::ButtonTracker;

/// Hex rendering of a datagram: `0x` + 8 nibbles.
pub type DatagramHex = String<16>;

/// Per-receiver decoding state.
pub struct ReceiverSession {
    /// Bound protocol; `None` until the first [`bind_protocol`] call.
    decoder: Option<IrDecoder>,
    tracker: ButtonTracker,

    /// Most recently completed frame ([`Datagram::EMPTY`] before any).
    last_datagram: Datagram,

    /// One-shot "a frame completed" flag, cleared by
    /// [`was_data_received`](Self::was_data_received).
    has_new_datagram: bool,

    stats: DecodeStats,
}

impl ReceiverSession {
    /// A session with no protocol bound yet.
    pub fn new() -> Self {
        Self {
            decoder: None,
            tracker: ButtonTracker::new(),
            last_datagram: Datagram::EMPTY,
            has_new_datagram: false,
            stats: DecodeStats::new(),
        }
    }

    /// A session bound to `protocol` from the start.
    pub fn with_protocol(protocol: Protocol) -> Self {
        let mut session = Self::new();
        session.bind_protocol(protocol);
        session
    }

    /// Bind the framing protocol. Idempotent: the first binding wins and
    /// later calls are no-ops (deliberate — double connect keeps the
    /// original protocol silently, it is not an error).
    ///
    /// Returns `true` if this call performed the binding; callers use
    /// that to skip re-subscribing hardware on repeat connects.
    pub fn bind_protocol(&mut self, protocol: Protocol) -> bool {
        if self.decoder.is_some() {
            return false;
        }
        self.decoder = Some(IrDecoder::new(protocol));
        true
    }

    /// The bound protocol, if any.
    pub fn protocol(&self) -> Option<Protocol> {
        self.decoder.as_ref().map(|d| d.protocol())
    }

    /// Process one captured mark/space pair (capture path).
    ///
    /// `now_ms` is monotonic running time. Derived events are pushed onto
    /// `events`; a completed frame pushes `Datagram`, then `Released` for
    /// a superseded button, then `Pressed`. Pulses arriving before a
    /// protocol is bound are discarded.
    pub fn feed_pulse(&mut self, mark_us: u32, space_us: u32, now_ms: u64, events: &EventQueue) {
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };

        match decoder.feed(mark_us + space_us) {
            PulseOutcome::Incomplete => {}
            PulseOutcome::Repeat => {
                self.stats.record_repeat();
                self.tracker.on_repeat(now_ms);
            }
            PulseOutcome::Datagram(frame) => {
                self.stats.record_datagram();
                self.last_datagram = frame;
                self.has_new_datagram = true;
                events.push(ButtonEvent::Datagram(frame));

                let transition = self.tracker.on_datagram(frame.command, now_ms);
                if let Some(code) = transition.released {
                    events.push(ButtonEvent::Released(code));
                }
                if let Some(code) = transition.pressed {
                    events.push(ButtonEvent::Pressed(code));
                }
            }
        }
    }

    /// Release-by-timeout poll (tick path).
    ///
    /// Runs at a fixed cadence independent of pulse arrival; a held
    /// button whose repeat deadline has passed is released here, since
    /// the physical release transmits nothing.
    pub fn tick(&mut self, now_ms: u64, events: &EventQueue) {
        if let Some(code) = self.tracker.tick(now_ms) {
            self.stats.record_timeout_release();
            if let Some(decoder) = self.decoder.as_mut() {
                decoder.reset_bits();
            }
            events.push(ButtonEvent::Released(code));
        }
    }

    /// Button code of the most recently decoded command.
    ///
    /// The wildcard code (-1) while no protocol is bound; after binding,
    /// the command high byte (0 before the first frame).
    pub fn current_button(&self) -> i32 {
        if self.decoder.is_none() {
            return ANY_BUTTON_CODE;
        }
        self.last_datagram.button_code() as i32
    }

    /// Code of the button currently held, if any.
    pub fn active_command(&self) -> Option<u8> {
        self.tracker.active_command()
    }

    /// The most recently completed frame (zeroed before the first).
    pub fn last_datagram(&self) -> Datagram {
        self.last_datagram
    }

    /// Address+command as `0x`-prefixed uppercase hex: `"0x00FF12ED"`.
    ///
    /// `"0x00000000"` before the first frame. No allocation; the string
    /// is fixed capacity.
    pub fn last_datagram_hex(&self) -> DatagramHex {
        let mut out = DatagramHex::new();
        // 10 chars always fit in the 16-byte capacity
        let _ = core::fmt::write(&mut out, format_args!("{}", self.last_datagram));
        out
    }

    /// One-shot: `true` exactly once per completed frame, then `false`
    /// until the next frame completes.
    pub fn was_data_received(&mut self) -> bool {
        core::mem::take(&mut self.has_new_datagram)
    }

    /// Decode counters.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }
}

impl Default for ReceiverSession {
    fn default() -> Self {
        Self::new()
    }
}

//! Module: config
//!
//! Purpose: Central tuning constants for the IR receiver.
//! Pulse thresholds are calibrated for a 38 kHz demodulator module and the
//! NEC / Keyestudio pulse-distance timing; timeouts follow the protocol's
//! natural repeat cadence (a held button retransmits roughly every 108 ms).

/// Mark+space durations below this are a logical 0 (µs).
///
/// NEC bit 0 is nominally 562.5 µs mark + 562.5 µs space = 1125 µs.
pub const BIT_ZERO_LIMIT_US: u32 = 1600;

/// Mark+space durations below this (and at or above the zero limit)
/// are a logical 1 (µs).
///
/// NEC bit 1 is nominally 562.5 µs mark + 1687.5 µs space = 2250 µs.
pub const BIT_ONE_LIMIT_US: u32 = 2700;

/// Boundary pulses below this are a repeat code (µs).
///
/// The repeat lead is 9 ms mark + 2.25 ms space = 11.25 ms; the data lead
/// (9 ms + 4.5 ms = 13.5 ms) falls above and only resets the bit counter.
pub const REPEAT_LIMIT_US: u32 = 12_500;

/// Bits per complete datagram: 16-bit address word + 16-bit command word.
pub const DATAGRAM_BITS: u8 = 32;

/// How long a held button is considered pressed after the last datagram
/// or repeat code (ms).
pub const REPEAT_TIMEOUT_MS: u64 = 120;

/// Cadence of the release-by-timeout poll (ms).
pub const TICK_PERIOD_MS: u64 = 20;

/// Capacity of the decode-path → dispatch event queue. Power of two.
pub const EVENT_QUEUE_SIZE: usize = 64;

/// Capacity of the ISR → decode-thread pulse ring. Power of two.
///
/// A full 32-bit frame is 34 pulse pairs; 256 buffers several frames of
/// headroom against a briefly stalled decode thread.
pub const PULSE_QUEUE_SIZE: usize = 256;

/// Capacity of the capture-path log ring. Power of two.
pub const LOG_RING_SIZE: usize = 128;

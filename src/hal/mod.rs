//! Hardware layer for the IR receiver.
//!
//! Thin wrappers around ESP-IDF peripherals. Decoding logic stays in the
//! core modules; this layer only turns pin edges into mark/space pairs
//! and provides the periodic tick.

pub mod pulse;

pub use pulse::{start_tick, PulseCapture, PulseCaptureConfig};

//! # RustIrReceiver
//!
//! Infrared remote receiver for ESP32: decodes NEC / Keyestudio mark-space
//! pulse timing into 32-bit address/command datagrams and button
//! press/release events.
//!
//! ## Architecture
//!
//! Pure FSMs at the core, lock-free SPSC rings at every context boundary:
//! - The GPIO ISR only timestamps edges and pushes pulse pairs.
//! - The decode thread owns the [`ReceiverSession`] and pushes
//!   [`ButtonEvent`]s; it never blocks, locks, or allocates.
//! - The dispatch thread owns the [`HandlerRegistry`] and runs user
//!   callbacks, so slow handlers cannot delay decoding.
//!
//! Everything outside `hal` is hardware-free and testable on host.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod button;
pub mod config;
pub mod datagram;
pub mod decoder;
pub mod events;
pub mod logging;
pub mod registry;
pub mod ring;
pub mod session;
pub mod stats;
pub mod tracker;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use button::{IrButton, IrButtonAction, ANY_BUTTON_CODE};
pub use datagram::{Datagram, Protocol};
pub use decoder::{IrDecoder, PulseOutcome};
pub use events::{ButtonEvent, EventQueue};
pub use registry::{ButtonMatcher, HandlerRegistry};
pub use ring::SpscRing;
pub use session::ReceiverSession;
pub use stats::{DecodeStats, StatsSnapshot};
pub use tracker::{ButtonTracker, Transition};

//! Press/release derivation from decoded frames and repeat codes.
//!
//! A physical button release transmits nothing: the handset just stops
//! sending repeat codes. Release is therefore inferred by a deadline —
//! every full frame or repeat code pushes the deadline out, and a
//! periodic tick fires the release once the deadline passes.

use crate::config::REPEAT_TIMEOUT_MS;

/// Press/release edges produced by one decoded frame.
///
/// At most one of each; a button switch carries both (release the old,
/// press the new). A held-button repeat carries neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    /// Button that just went up.
    pub released: Option<u8>,
    /// Button that just went down.
    pub pressed: Option<u8>,
}

impl Transition {
    /// No edges (held-button repeat).
    pub const NONE: Self = Self {
        released: None,
        pressed: None,
    };

    #[inline]
    pub fn is_none(&self) -> bool {
        self.released.is_none() && self.pressed.is_none()
    }
}

/// Held-button state machine.
///
/// `active_command` is `None` in the idle state; while it holds a code, a
/// repeat deadline is always scheduled.
pub struct ButtonTracker {
    /// Code of the button currently held, if any.
    active_command: Option<u8>,

    /// Absolute time after which the held button counts as released (ms).
    repeat_deadline_ms: u64,

    /// Deadline extension granted per frame/repeat (ms).
    timeout_ms: u64,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self::with_timeout(REPEAT_TIMEOUT_MS)
    }

    /// Tracker with a non-default expiry window (test hook and tuning).
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            active_command: None,
            repeat_deadline_ms: 0,
            timeout_ms,
        }
    }

    /// Code of the currently held button, if any.
    #[inline]
    pub fn active_command(&self) -> Option<u8> {
        self.active_command
    }

    /// A complete frame was decoded: refresh the deadline and derive edges.
    ///
    /// The button identity is the command word's high byte. Re-decoding
    /// the active button's frame is a held repeat: deadline only, no
    /// edges. A different code releases the old button (if any) and
    /// presses the new one.
    pub fn on_datagram(&mut self, command_word: u16, now_ms: u64) -> Transition {
        self.repeat_deadline_ms = now_ms + self.timeout_ms;

        let code = (command_word >> 8) as u8;
        if self.active_command == Some(code) {
            return Transition::NONE;
        }

        let released = self.active_command.take();
        self.active_command = Some(code);
        Transition {
            released,
            pressed: Some(code),
        }
    }

    /// A repeat code arrived: refresh the deadline, nothing else.
    #[inline]
    pub fn on_repeat(&mut self, now_ms: u64) {
        self.repeat_deadline_ms = now_ms + self.timeout_ms;
    }

    /// Periodic poll: returns the released code once the deadline passes.
    ///
    /// The caller must reset the decoder's bit counter when this fires,
    /// so a partial frame from the dying transmission cannot leak into
    /// the next press.
    pub fn tick(&mut self, now_ms: u64) -> Option<u8> {
        let code = self.active_command?;
        if now_ms > self.repeat_deadline_ms {
            self.active_command = None;
            Some(code)
        } else {
            None
        }
    }
}

impl Default for ButtonTracker {
    fn default() -> Self {
        Self::new()
    }
}

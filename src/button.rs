//! Handset buttons and their command codes.
//!
//! Codes are the high byte of the decoded command word, as transmitted by
//! the Keyestudio 17-key handset (the NEC handsets bundled with the same
//! kits use the same map). Some keys legitimately share a code — OK and 5
//! both send 0x02 — so codes live in a lookup, not in enum discriminants.

/// A button on the remote handset.
///
/// `Any` is the wildcard used for catch-all handler registration and as
/// the "no session" sentinel code. The `Spacer*` entries are blank
/// positions in the handset grid; their codes are negative and can never
/// match a decoded command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrButton {
    Number0,
    Number1,
    Number2,
    Number3,
    Number4,
    Number5,
    Number6,
    Number7,
    Number8,
    Number9,
    Star,
    Hash,
    Up,
    Down,
    Left,
    Right,
    Ok,
    SpacerA,
    SpacerB,
    SpacerC,
    SpacerD,
    Any,
}

/// Numeric code of the wildcard button.
pub const ANY_BUTTON_CODE: i32 = -1;

impl IrButton {
    /// Numeric code of this button (pure lookup, no receiver state).
    pub const fn code(self) -> i32 {
        match self {
            IrButton::Number1 => 0xA2,
            IrButton::Number2 => 0x62,
            IrButton::Number3 => 0xE2,
            IrButton::Number4 => 0x22,
            IrButton::Number5 => 0x02,
            IrButton::Number6 => 0xC2,
            IrButton::Number7 => 0xE0,
            IrButton::Number8 => 0xA8,
            IrButton::Number9 => 0x90,
            IrButton::Star => 0x68,
            IrButton::Number0 => 0x98,
            IrButton::Hash => 0xB0,
            IrButton::Up => 0x18,
            IrButton::Left => 0x10,
            IrButton::Ok => 0x02,
            IrButton::Right => 0x5A,
            IrButton::Down => 0x4A,
            IrButton::SpacerA => -101,
            IrButton::SpacerB => -102,
            IrButton::SpacerC => -103,
            IrButton::SpacerD => -104,
            IrButton::Any => ANY_BUTTON_CODE,
        }
    }
}

/// Direction of a button event subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrButtonAction {
    Pressed,
    Released,
}

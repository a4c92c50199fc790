//! Module: datagram
//!
//! Purpose: Framing protocol selection and the decoded 32-bit frame.
//!
//! A frame is 16 address bits followed by 16 command bits, shifted in
//! MSB-first. The command word conventionally carries the button code in
//! its high byte and the bitwise complement in its low byte; the
//! complement is exposed as a diagnostic but never enforced (noisy
//! receivers and nonconforming handsets would lose frames otherwise).

/// IR framing protocol.
///
/// Fixed for the lifetime of a receiver session; selects whether a 1-bit
/// inside the address byte is data (NEC) or a start marker (Keyestudio).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    /// Keyestudio vendor framing: a high bit within the first 8 bits
    /// resynchronizes the frame (start marker, not data).
    Keyestudio,
    /// Plain NEC framing: all 32 bits are data.
    Nec,
}

/// A complete decoded frame: address word + command word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Datagram {
    /// 16-bit address section.
    pub address: u16,
    /// 16-bit command section.
    pub command: u16,
}

impl Datagram {
    /// All-zero frame, the state before anything has been decoded.
    pub const EMPTY: Self = Self {
        address: 0,
        command: 0,
    };

    pub const fn new(address: u16, command: u16) -> Self {
        Self { address, command }
    }

    /// Button identity: the command word's high byte.
    #[inline]
    pub const fn button_code(&self) -> u8 {
        (self.command >> 8) as u8
    }

    /// Whether the command low byte is the complement of the high byte.
    ///
    /// Diagnostic only. Frames failing this check are still delivered.
    #[inline]
    pub const fn complement_ok(&self) -> bool {
        (self.command >> 8) as u8 == !(self.command as u8)
    }
}

impl core::fmt::Display for Datagram {
    /// Renders as `0x` + address + command, 4 uppercase hex digits each,
    /// most significant nibble first: `0x00FF12ED`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:04X}{:04X}", self.address, self.command)
    }
}

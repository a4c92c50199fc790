//! IR pulse classifier and datagram assembler.
//!
//! Pure logic, no hardware dependencies. Consumes mark+space durations,
//! produces frame outcomes. Fully testable on host.
//!
//! # Framing
//!
//! One pulse cycle (mark + following space) encodes one symbol:
//!
//! - short cycle → bit 0
//! - medium cycle → bit 1
//! - long cycle → frame boundary: either a repeat code (held button,
//!   no payload) or a data lead / noise, both of which restart bit
//!   counting.
//!
//! A frame is 32 bits: 16 address bits into the high accumulator, then
//! 16 command bits into the low accumulator, MSB-first. Under Keyestudio
//! framing a 1-bit inside the address byte is a start marker, not data:
//! the assembler discards what it has and restarts at bit 9 with the
//! accumulator holding exactly that bit.

use crate::config::{BIT_ONE_LIMIT_US, BIT_ZERO_LIMIT_US, DATAGRAM_BITS, REPEAT_LIMIT_US};
use crate::datagram::{Datagram, Protocol};

/// Outcome of feeding one mark+space cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PulseOutcome {
    /// Nothing to report: a mid-frame bit was folded, or the cycle was
    /// noise / a data lead. Never an error.
    Incomplete,
    /// Repeat code: the button is still held, no payload follows.
    Repeat,
    /// The 32nd bit landed; the frame is complete.
    Datagram(Datagram),
}

/// Incremental 32-bit frame assembler.
///
/// One instance per protocol binding. The bit counter is reset by boundary
/// pulses (inside [`feed`](Self::feed)) and by the release-timeout path
/// (via [`reset_bits`](Self::reset_bits)); frame completion does not reset
/// it — the next frame's lead pulse does.
pub struct IrDecoder {
    protocol: Protocol,

    /// Bits folded into the current frame, 0..=32 in normal operation.
    bits_received: u8,

    /// Address shift register (bits 1–16).
    hi_word: u16,

    /// Command shift register (bits 17–32).
    lo_word: u16,
}

impl IrDecoder {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            bits_received: 0,
            hi_word: 0,
            lo_word: 0,
        }
    }

    #[inline]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Bits folded into the frame in progress.
    #[inline]
    pub fn bits_received(&self) -> u8 {
        self.bits_received
    }

    /// Classify one mark+space cycle and fold it into the frame.
    ///
    /// `mark_space_us` is the combined duration of the low pulse and the
    /// following high pulse, in microseconds.
    #[inline]
    pub fn feed(&mut self, mark_space_us: u32) -> PulseOutcome {
        if mark_space_us < BIT_ZERO_LIMIT_US {
            return self.append_bit(0);
        }
        if mark_space_us < BIT_ONE_LIMIT_US {
            return self.append_bit(1);
        }

        // Frame boundary. The counter reset must happen regardless of
        // which boundary kind this turns out to be.
        self.bits_received = 0;
        if mark_space_us < REPEAT_LIMIT_US {
            PulseOutcome::Repeat
        } else {
            // Data lead or noise; the bits that follow (if any) start a
            // fresh frame.
            PulseOutcome::Incomplete
        }
    }

    /// Restart bit counting without touching the accumulators.
    ///
    /// Used by the release-timeout path so a stale partial frame cannot
    /// leak into the next button press.
    #[inline]
    pub fn reset_bits(&mut self) {
        self.bits_received = 0;
    }

    fn append_bit(&mut self, bit: u16) -> PulseOutcome {
        self.bits_received = self.bits_received.saturating_add(1);

        if self.bits_received <= 8 {
            self.hi_word = (self.hi_word << 1) | bit;
            if self.protocol == Protocol::Keyestudio && bit == 1 {
                // Start marker inside the address byte: drop everything
                // accumulated so far and resynchronize at bit 9.
                self.bits_received = 9;
                self.hi_word = 1;
            }
        } else if self.bits_received <= 16 {
            self.hi_word = (self.hi_word << 1) | bit;
        } else if self.bits_received <= 32 {
            self.lo_word = (self.lo_word << 1) | bit;
        }
        // Bits past 32 fold nowhere; the next boundary pulse resets.

        if self.bits_received == DATAGRAM_BITS {
            PulseOutcome::Datagram(Datagram::new(self.hi_word, self.lo_word))
        } else {
            PulseOutcome::Incomplete
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed a 16-bit word MSB-first as bit cycles.
    fn feed_word(decoder: &mut IrDecoder, word: u16) -> Option<Datagram> {
        let mut completed = None;
        for i in (0..16).rev() {
            let cycle = if (word >> i) & 1 == 1 { 2250 } else { 1120 };
            if let PulseOutcome::Datagram(d) = decoder.feed(cycle) {
                assert!(completed.is_none(), "frame completed twice");
                completed = Some(d);
            }
        }
        completed
    }

    #[test]
    fn test_classification_thresholds() {
        let mut decoder = IrDecoder::new(Protocol::Nec);

        // Below 1600: bit 0 (counter advances, hi shifts in a zero)
        decoder.feed(1599);
        assert_eq!(decoder.bits_received(), 1);

        // 1600..2700: bit 1
        let mut decoder = IrDecoder::new(Protocol::Nec);
        decoder.feed(1600);
        assert_eq!(decoder.bits_received(), 1);
        decoder.feed(2699);
        assert_eq!(decoder.bits_received(), 2);

        // At 2700 and beyond: boundary, counter resets
        assert_eq!(decoder.feed(2700), PulseOutcome::Repeat);
        assert_eq!(decoder.bits_received(), 0);
    }

    #[test]
    fn test_boundary_repeat_vs_noise() {
        let mut decoder = IrDecoder::new(Protocol::Nec);

        // Repeat lead: 9000 + 2250
        assert_eq!(decoder.feed(11_250), PulseOutcome::Repeat);
        // Data lead: 9000 + 4500 — resets the counter, reports nothing
        assert_eq!(decoder.feed(13_500), PulseOutcome::Incomplete);
        // Way out of range: noise
        assert_eq!(decoder.feed(50_000), PulseOutcome::Incomplete);
    }

    #[test]
    fn test_boundary_resets_partial_frame() {
        let mut decoder = IrDecoder::new(Protocol::Nec);

        for _ in 0..5 {
            decoder.feed(1120);
        }
        assert_eq!(decoder.bits_received(), 5);

        decoder.feed(13_500);
        assert_eq!(decoder.bits_received(), 0);
    }

    #[test]
    fn test_nec_frame_completes_on_32nd_bit_exactly() {
        let mut decoder = IrDecoder::new(Protocol::Nec);

        assert_eq!(feed_word(&mut decoder, 0x00FF), None);
        let frame = feed_word(&mut decoder, 0x12ED).expect("32nd bit completes the frame");

        assert_eq!(frame.address, 0x00FF);
        assert_eq!(frame.command, 0x12ED);
        assert_eq!(frame.button_code(), 0x12);
    }

    #[test]
    fn test_nec_high_bit_in_address_byte_is_data() {
        let mut decoder = IrDecoder::new(Protocol::Nec);

        assert_eq!(feed_word(&mut decoder, 0x80FF), None);
        let frame = feed_word(&mut decoder, 0x30CF).unwrap();

        assert_eq!(frame.address, 0x80FF);
        assert_eq!(frame.command, 0x30CF);
    }

    #[test]
    fn test_keyestudio_start_marker_restarts_at_bit_nine() {
        let mut decoder = IrDecoder::new(Protocol::Keyestudio);

        // Two zeros, then a one inside the address byte
        decoder.feed(1120);
        decoder.feed(1120);
        decoder.feed(2250);

        // The one is a start marker: counter forced to 9, accumulator to 1
        assert_eq!(decoder.bits_received(), 9);

        // 23 more zero bits finish the frame
        let mut frame = None;
        for i in 0..23 {
            match decoder.feed(1120) {
                PulseOutcome::Datagram(d) => {
                    assert_eq!(i, 22, "completion must land on the 32nd bit");
                    frame = Some(d);
                }
                PulseOutcome::Incomplete => {}
                PulseOutcome::Repeat => panic!("bit cycle classified as repeat"),
            }
        }

        let frame = frame.expect("frame should complete");
        // Marker bit shifted left through the remaining 7 address bits
        assert_eq!(frame.address, 0x0080);
        assert_eq!(frame.command, 0x0000);
    }

    #[test]
    fn test_keyestudio_full_frame_after_marker() {
        let mut decoder = IrDecoder::new(Protocol::Keyestudio);

        // Start marker first
        decoder.feed(2250);
        assert_eq!(decoder.bits_received(), 9);

        // Remaining 7 address bits: zeros
        for _ in 0..7 {
            decoder.feed(1120);
        }
        // Command word 0xA25D (button 1 + complement)
        let frame = feed_word(&mut decoder, 0xA25D).unwrap();

        assert_eq!(frame.address, 0x0080);
        assert_eq!(frame.command, 0xA25D);
        assert_eq!(frame.button_code(), 0xA2);
        assert!(frame.complement_ok());
    }

    #[test]
    fn test_bits_past_32_fold_nowhere() {
        let mut decoder = IrDecoder::new(Protocol::Nec);

        feed_word(&mut decoder, 0x00FF);
        let frame = feed_word(&mut decoder, 0x12ED).unwrap();

        // Stray bits after completion must not complete a second frame
        // or corrupt the accumulators.
        for _ in 0..6 {
            assert_eq!(decoder.feed(2250), PulseOutcome::Incomplete);
        }
        assert_eq!(frame.command, 0x12ED);
    }

    #[test]
    fn test_two_frames_back_to_back() {
        let mut decoder = IrDecoder::new(Protocol::Nec);

        feed_word(&mut decoder, 0x00FF);
        let first = feed_word(&mut decoder, 0x12ED).unwrap();
        assert_eq!(first.button_code(), 0x12);

        // Next frame announced by its data lead
        assert_eq!(decoder.feed(13_500), PulseOutcome::Incomplete);

        feed_word(&mut decoder, 0x00FF);
        let second = feed_word(&mut decoder, 0x30CF).unwrap();
        assert_eq!(second.button_code(), 0x30);
    }

    #[test]
    fn test_reset_bits() {
        let mut decoder = IrDecoder::new(Protocol::Nec);

        decoder.feed(1120);
        decoder.feed(1120);
        assert_eq!(decoder.bits_received(), 2);

        decoder.reset_bits();
        assert_eq!(decoder.bits_received(), 0);
    }
}

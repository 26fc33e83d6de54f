//! RailDriver output report encoding: the three-digit speed display.
//!
//! The console carries a three-character seven-segment display driven by
//! command byte 134. Characters are encoded per the segment table below and
//! emitted in reverse order (rightmost display character first). A decimal
//! point is not a character slot of its own: it ORs bit 0x80 into the
//! preceding character, and the last slot cannot carry one.

use crate::ids::commands;
use crate::{ProtocolError, ProtocolResult};

/// Meters/second to miles/hour, the display unit.
pub const MPS_TO_MPH: f32 = 2.23694;

/// Command byte selecting the speed display.
pub const SPEED_DISPLAY_COMMAND: u8 = commands::SPEED_DISPLAY;

/// Segment bit lighting the decimal point after a digit.
pub const DECIMAL_POINT_BIT: u8 = 0x80;

/// Default output report length: report ID byte plus the console's native
/// 32-byte write payload.
pub const OUTPUT_REPORT_LEN: usize = 33;

/// Number of bytes of an output report actually used by a speed update:
/// report ID, command byte, three segment bytes.
pub const SPEED_REPORT_USED: usize = 5;

/// Segment pattern for one display character.
///
/// Segment numbering:
/// ```text
///    1
///  6   2
///    7
///  5   3
///    4   8 (decimal point)
/// ```
///
/// Only the digits 0–9 light up; any other character (sign, space) renders
/// as all segments off.
pub fn seven_segment(c: char) -> u8 {
    match c {
        '0' => 0b0011_1111,
        '1' => 0b0000_0110,
        '2' => 0b0101_1011,
        '3' => 0b0100_1111,
        '4' => 0b0110_0110,
        '5' => 0b0110_1101,
        '6' => 0b0111_1101,
        '7' => 0b0000_0111,
        '8' => 0b0111_1111,
        '9' => 0b0110_1111,
        _ => 0,
    }
}

/// Encode a velocity into the three wire-order segment bytes.
///
/// The velocity is converted to mph, formatted to one decimal place, and
/// left-padded to three printable characters. Each character fills one
/// display slot left to right; a '.' immediately following a character folds
/// into that character's [`DECIMAL_POINT_BIT`] (never on the last slot).
/// The returned array is already reversed into wire order; unused trailing
/// slots are zero.
pub fn encode_speed_digits(velocity_mps: f32) -> [u8; 3] {
    let text = format!("{:>3}", format!("{:.1}", velocity_mps * MPS_TO_MPH));

    let mut slots = [0u8; 3];
    let mut used = 0;
    let mut chars = text.chars().peekable();
    while used < slots.len() {
        let Some(c) = chars.next() else { break };
        let mut pattern = seven_segment(c);
        if used != slots.len() - 1 && chars.peek() == Some(&'.') {
            chars.next();
            pattern |= DECIMAL_POINT_BIT;
        }
        slots[used] = pattern;
        used += 1;
    }

    let mut wire = [0u8; 3];
    for (i, slot) in slots[..used].iter().rev().enumerate() {
        wire[i] = *slot;
    }
    wire
}

/// Fill `out` with a complete speed-display output report.
///
/// The whole buffer is zeroed first, then byte 1 gets the command byte and
/// bytes 2–4 the wire-order segment bytes. Byte 0 stays zero (report ID).
/// `out` should be sized to the device's native write length
/// ([`OUTPUT_REPORT_LEN`] for the RailDriver).
///
/// # Errors
///
/// [`ProtocolError::OutputBufferTooShort`] if `out` cannot hold the used
/// prefix.
pub fn build_speed_report(velocity_mps: f32, out: &mut [u8]) -> ProtocolResult<()> {
    if out.len() < SPEED_REPORT_USED {
        return Err(ProtocolError::OutputBufferTooShort {
            len: out.len(),
            min: SPEED_REPORT_USED,
        });
    }

    out.fill(0);
    out[1] = SPEED_DISPLAY_COMMAND;
    out[2..SPEED_REPORT_USED].copy_from_slice(&encode_speed_digits(velocity_mps));
    Ok(())
}

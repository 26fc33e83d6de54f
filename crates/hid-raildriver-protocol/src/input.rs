//! RailDriver input report decoding.
//!
//! One input report carries the seven analog levers as single bytes plus the
//! 44-bit button field. Decoding is pure and allocation-free; it runs on the
//! transport's read thread and must stay cheap.

use crate::buttons::ButtonMask;
use crate::ids::layout;
use crate::{ProtocolError, ProtocolResult};

/// Minimum input report length: report ID + 7 analog bytes + 6 button bytes.
pub const INPUT_REPORT_LEN: usize = 14;

/// Decoded snapshot of one input report.
///
/// Analog values are raw device bytes; calibration and normalization live in
/// `opencab-calibration`. Snapshots are immutable: each report produces a new
/// value that supersedes the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCabState {
    /// Reverser lever (bipolar, neutral near center).
    pub reverser: u8,
    /// Combined dynamic-brake/throttle lever (bipolar).
    pub throttle: u8,
    /// Automatic (train) brake lever, with an emergency detent below release.
    pub auto_brake: u8,
    /// Independent (locomotive) brake lever.
    pub ind_brake: u8,
    /// Bail-off rocker on the independent brake handle.
    pub bail_off: u8,
    /// Wiper rotary switch.
    pub wiper: u8,
    /// Headlight rotary switch.
    pub lights: u8,
    /// All 44 button bits.
    pub buttons: ButtonMask,
}

/// Decode one input report.
///
/// `data` must be the full wire frame, report ID byte included. Buffers
/// shorter than [`INPUT_REPORT_LEN`] are rejected so the caller can keep its
/// previous snapshot; the decoder never reads past `data`.
///
/// # Errors
///
/// [`ProtocolError::ReportTooShort`] if `data` is under 14 bytes.
pub fn parse_input_report(data: &[u8]) -> ProtocolResult<RawCabState> {
    if data.len() < INPUT_REPORT_LEN {
        return Err(ProtocolError::ReportTooShort {
            len: data.len(),
            min: INPUT_REPORT_LEN,
        });
    }

    let a = layout::ANALOG_FIRST;
    let low = u32::from_le_bytes([
        data[layout::BUTTONS_LOW],
        data[layout::BUTTONS_LOW + 1],
        data[layout::BUTTONS_LOW + 2],
        data[layout::BUTTONS_LOW + 3],
    ]);
    let high = u16::from_le_bytes([data[layout::BUTTONS_HIGH], data[layout::BUTTONS_HIGH + 1]]);

    Ok(RawCabState {
        reverser: data[a],
        throttle: data[a + 1],
        auto_brake: data[a + 2],
        ind_brake: data[a + 3],
        bail_off: data[a + 4],
        wiper: data[a + 5],
        lights: data[a + 6],
        buttons: ButtonMask::from_words(low, high),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::Button;

    fn frame(analog: [u8; 7], low: u32, high: u16) -> [u8; INPUT_REPORT_LEN] {
        let mut buf = [0u8; INPUT_REPORT_LEN];
        buf[1..8].copy_from_slice(&analog);
        buf[8..12].copy_from_slice(&low.to_le_bytes());
        buf[12..14].copy_from_slice(&high.to_le_bytes());
        buf
    }

    #[test]
    fn test_parse_analog_fields() {
        let buf = frame([0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70], 0, 0);
        let state = parse_input_report(&buf).expect("valid frame");

        assert_eq!(state.reverser, 0x10);
        assert_eq!(state.throttle, 0x20);
        assert_eq!(state.auto_brake, 0x30);
        assert_eq!(state.ind_brake, 0x40);
        assert_eq!(state.bail_off, 0x50);
        assert_eq!(state.wiper, 0x60);
        assert_eq!(state.lights, 0x70);
        assert!(state.buttons.is_empty());
    }

    #[test]
    fn test_parse_button_words() {
        // bytes[8..12) = 0x00000001 LE, bytes[12..14) = 0x0000: bit 0 only.
        let buf = frame([0; 7], 0x0000_0001, 0x0000);
        let state = parse_input_report(&buf).expect("valid frame");
        assert_eq!(state.buttons.bits(), 1);

        // Second word lands in the high bits.
        let buf = frame([0; 7], 0, 0x0200);
        let state = parse_input_report(&buf).expect("valid frame");
        assert!(state.buttons.contains(Button::Bell));
    }

    #[test]
    fn test_parse_masks_reserved_nibble() {
        let buf = frame([0; 7], 0, 0xF000);
        let state = parse_input_report(&buf).expect("valid frame");
        assert!(state.buttons.is_empty());
    }

    #[test]
    fn test_parse_report_id_ignored() {
        let mut buf = frame([1, 2, 3, 4, 5, 6, 7], 0, 0);
        buf[0] = 0xAB;
        let state = parse_input_report(&buf).expect("valid frame");
        assert_eq!(state.reverser, 1);
    }

    #[test]
    fn test_parse_too_short() {
        let result = parse_input_report(&[0u8; 13]);
        assert!(matches!(
            result,
            Err(ProtocolError::ReportTooShort { len: 13, min: 14 })
        ));
    }

    #[test]
    fn test_parse_longer_buffer_ok() {
        let mut buf = [0u8; 32];
        buf[1] = 0x7F;
        let state = parse_input_report(&buf).expect("valid frame");
        assert_eq!(state.reverser, 0x7F);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_round_trip(analog in any::<[u8; 7]>(), low in any::<u32>(), high in 0u16..0x1000) {
            let buf = frame(analog, low, high);
            let state = parse_input_report(&buf).expect("valid frame");
            prop_assert_eq!(
                [state.reverser, state.throttle, state.auto_brake, state.ind_brake,
                 state.bail_off, state.wiper, state.lights],
                analog
            );
            prop_assert_eq!(state.buttons, ButtonMask::from_words(low, high));
        }

        #[test]
        fn prop_short_buffers_rejected(data in proptest::collection::vec(any::<u8>(), 0..INPUT_REPORT_LEN)) {
            prop_assert!(parse_input_report(&data).is_err());
        }
    }
}

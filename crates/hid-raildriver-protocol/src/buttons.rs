//! 44-bit button mask and edge detection.
//!
//! Bits 0–27 are the numbered buttons on the console's button rows; bits
//! 28–43 are the named controls (zoom rocker, D-Pad, range/e-stop rockers,
//! alerter, sander, pantograph, bell, and the two whistle positions). Bit
//! positions match the device's wire packing: the first 32 bits come from a
//! little-endian word, the next 12 from a little-endian half-word occupying
//! the high bits.

use crate::ids::layout::BUTTON_BITS;

/// Named buttons above the numbered rows (wire bits 28–43).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Button {
    Up = 28,
    Down = 29,
    DPadUp = 30,
    DPadRight = 31,
    DPadDown = 32,
    DPadLeft = 33,
    RangeUp = 34,
    RangeDown = 35,
    EStopUp = 36,
    EStopDown = 37,
    Alert = 38,
    Sand = 39,
    Pantograph = 40,
    Bell = 41,
    WhistleUp = 42,
    WhistleDown = 43,
}

impl Button {
    /// Wire bit position of this button.
    pub fn bit(self) -> u32 {
        self as u32
    }

    /// Mask with only this button's bit set.
    pub fn mask(self) -> ButtonMask {
        ButtonMask(1u64 << self.bit())
    }
}

/// Snapshot of all 44 button bits from one input report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonMask(u64);

impl ButtonMask {
    /// All valid button bits.
    pub const ALL: ButtonMask = ButtonMask((1u64 << BUTTON_BITS) - 1);
    /// No buttons pressed.
    pub const EMPTY: ButtonMask = ButtonMask(0);

    /// Build a mask from the two wire words: the low 32 bits and the second
    /// 12-bit word. Reserved high bits of `high` are discarded.
    pub fn from_words(low: u32, high: u16) -> Self {
        let high = u64::from(high & 0x0FFF);
        ButtonMask((high << 32) | u64::from(low))
    }

    /// Build a mask from raw bits, discarding anything above bit 43.
    pub fn from_bits(bits: u64) -> Self {
        ButtonMask(bits) & Self::ALL
    }

    /// Raw bit representation.
    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether a named button is held in this snapshot.
    pub fn contains(self, button: Button) -> bool {
        self.0 & button.mask().0 != 0
    }

    /// Whether numbered button `n` (0–27) is held. Out-of-range is never held.
    pub fn contains_numbered(self, n: u8) -> bool {
        n < 28 && self.0 & (1u64 << n) != 0
    }

    /// Buttons held now that were not held in `previous`.
    ///
    /// Computed as `current & (current ^ previous)`; calling with the same
    /// mask twice yields an empty result, so a one-tick press fires exactly
    /// once.
    pub fn pressed_since(self, previous: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 & (self.0 ^ previous.0))
    }
}

impl std::ops::BitAnd for ButtonMask {
    type Output = ButtonMask;
    fn bitand(self, rhs: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 & rhs.0)
    }
}

impl std::ops::BitOr for ButtonMask {
    type Output = ButtonMask;
    fn bitor(self, rhs: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 | rhs.0)
    }
}

/// Tick-cadence edge detector.
///
/// Owned by the host-tick side, never by the report reader: the previous-mask
/// state must advance exactly once per tick, after the edge computation, or
/// one-tick presses are lost or double-counted.
#[derive(Debug, Default)]
pub struct ButtonEdgeDetector {
    previous: ButtonMask,
}

impl ButtonEdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the current mask, returning the newly pressed buttons and
    /// recording `current` as the new baseline.
    pub fn update(&mut self, current: ButtonMask) -> ButtonMask {
        let edges = current.pressed_since(self.previous);
        self.previous = current;
        edges
    }

    /// Baseline mask from the last `update` call.
    pub fn previous(&self) -> ButtonMask {
        self.previous
    }
}

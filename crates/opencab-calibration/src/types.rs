//! Calibration type definitions.
//!
//! Reference points are raw device bytes captured with the lever held at a
//! known physical position. Factory defaults assume a centered lever rests
//! near 0x7F and the full byte range is usable.

use serde::{Deserialize, Serialize};

/// Calibration for a bipolar lever whose rest position is mid-range
/// (reverser, combined throttle/dynamic-brake, headlight switch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenteredAxis {
    /// Raw byte at the low end of travel.
    pub min: u8,
    /// Raw byte at the neutral detent.
    pub center: u8,
    /// Raw byte at the high end of travel.
    pub max: u8,
}

impl Default for CenteredAxis {
    fn default() -> Self {
        Self {
            min: 0x00,
            center: 0x7F,
            max: 0xFF,
        }
    }
}

/// Calibration for a unipolar lever resting at one extreme
/// (independent brake, bail-off, wiper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearAxis {
    /// Raw byte at the released position.
    pub min: u8,
    /// Raw byte at full travel.
    pub max: u8,
}

impl Default for LinearAxis {
    fn default() -> Self {
        Self {
            min: 0x00,
            max: 0xFF,
        }
    }
}

/// Calibration for the automatic brake lever, which has an emergency detent
/// below the normal working range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrakeAxis {
    /// Raw byte at the emergency end stop.
    pub min: u8,
    /// Raw byte at the emergency threshold; readings below it mean the lever
    /// has been thrown past full service into emergency.
    pub emergency: u8,
    /// Raw byte at release.
    pub max: u8,
}

impl Default for BrakeAxis {
    fn default() -> Self {
        Self {
            min: 0x00,
            emergency: 0x10,
            max: 0xFF,
        }
    }
}

/// Complete per-device calibration record.
///
/// One instance is shared by all axes of a session; calibration capture
/// mutates exactly one field at a time and the host persists the record
/// after each capture. Fields absent from a persisted document fall back to
/// factory defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CabCalibration {
    pub reverser: CenteredAxis,
    pub throttle: CenteredAxis,
    pub auto_brake: BrakeAxis,
    pub ind_brake: LinearAxis,
    pub bail_off: LinearAxis,
    pub wiper: LinearAxis,
    pub lights: CenteredAxis,
}

/// One persisted reference byte within a [`CabCalibration`].
///
/// Used by calibration UIs: each capture action names the point being set
/// and supplies the current raw reading of that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPoint {
    ReverserMin,
    ReverserCenter,
    ReverserMax,
    ThrottleMin,
    ThrottleCenter,
    ThrottleMax,
    AutoBrakeMin,
    AutoBrakeEmergency,
    AutoBrakeMax,
    IndBrakeMin,
    IndBrakeMax,
    BailOffMin,
    BailOffMax,
    WiperMin,
    WiperMax,
    LightsMin,
    LightsCenter,
    LightsMax,
}

impl CabCalibration {
    /// Record `raw` as the given reference point, leaving every other field
    /// untouched.
    pub fn capture(&mut self, point: CalibrationPoint, raw: u8) {
        use CalibrationPoint::*;
        match point {
            ReverserMin => self.reverser.min = raw,
            ReverserCenter => self.reverser.center = raw,
            ReverserMax => self.reverser.max = raw,
            ThrottleMin => self.throttle.min = raw,
            ThrottleCenter => self.throttle.center = raw,
            ThrottleMax => self.throttle.max = raw,
            AutoBrakeMin => self.auto_brake.min = raw,
            AutoBrakeEmergency => self.auto_brake.emergency = raw,
            AutoBrakeMax => self.auto_brake.max = raw,
            IndBrakeMin => self.ind_brake.min = raw,
            IndBrakeMax => self.ind_brake.max = raw,
            BailOffMin => self.bail_off.min = raw,
            BailOffMax => self.bail_off.max = raw,
            WiperMin => self.wiper.min = raw,
            WiperMax => self.wiper.max = raw,
            LightsMin => self.lights.min = raw,
            LightsCenter => self.lights.center = raw,
            LightsMax => self.lights.max = raw,
        }
    }
}

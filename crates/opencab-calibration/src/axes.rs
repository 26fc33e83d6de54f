//! Axis normalization.
//!
//! Every normalizer is a pure function of the raw byte and the calibration
//! snapshot it is called with. Outputs are deliberately unclamped: a lever
//! that drifts past its captured end points reads slightly outside the
//! nominal range, and callers decide whether that matters.

use crate::types::{BrakeAxis, CenteredAxis, LinearAxis};

impl CenteredAxis {
    /// Bipolar map onto [-1.0, 1.0] with 0.0 exactly at the center detent.
    ///
    /// The two travel halves are scaled independently, so the slope is
    /// discontinuous at the center. Degenerate calibrations
    /// (min == center or center == max) read as neutral.
    pub fn normalize(&self, raw: u8) -> f32 {
        if self.min == self.center || self.center == self.max {
            return 0.0;
        }

        if raw < self.center {
            (f32::from(raw) - f32::from(self.min))
                / (f32::from(self.center) - f32::from(self.min))
                - 1.0
        } else {
            (f32::from(raw) - f32::from(self.center))
                / (f32::from(self.max) - f32::from(self.center))
        }
    }

    /// Split-unipolar map onto [0.0, 1.0]: travel below the center detent
    /// occupies [0.0, 0.5], travel above it [0.5, 1.0].
    ///
    /// Used for the headlight switch, where the detent is a mid position
    /// rather than a neutral one. Same degenerate guards as
    /// [`normalize`](Self::normalize).
    pub fn normalize_split(&self, raw: u8) -> f32 {
        if self.min == self.center || self.center == self.max {
            return 0.0;
        }

        if raw < self.center {
            (f32::from(raw) - f32::from(self.min))
                / (f32::from(self.center) - f32::from(self.min))
                * 0.5
        } else {
            (f32::from(raw) - f32::from(self.center))
                / (f32::from(self.max) - f32::from(self.center))
                * 0.5
                + 0.5
        }
    }
}

impl LinearAxis {
    /// Unipolar map onto [0.0, 1.0], unclamped. A degenerate calibration
    /// (min == max) reads as 0.0.
    pub fn normalize(&self, raw: u8) -> f32 {
        if self.min == self.max {
            return 0.0;
        }

        (f32::from(raw) - f32::from(self.min)) / (f32::from(self.max) - f32::from(self.min))
    }
}

impl BrakeAxis {
    /// Unipolar map of the working range onto [0.0, 1.0], measured from the
    /// emergency threshold rather than the end stop. Readings inside the
    /// emergency band come out negative; a degenerate calibration
    /// (emergency == max) reads as 0.0.
    pub fn normalize(&self, raw: u8) -> f32 {
        if self.emergency == self.max {
            return 0.0;
        }

        (f32::from(raw) - f32::from(self.emergency))
            / (f32::from(self.max) - f32::from(self.emergency))
    }

    /// Whether the lever sits inside the emergency band. A reading exactly
    /// at the threshold is not emergency.
    pub fn is_emergency(&self, raw: u8) -> bool {
        raw < self.emergency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_bipolar_endpoints_and_center() {
        let axis = CenteredAxis {
            min: 0x00,
            center: 0x7F,
            max: 0xFF,
        };

        assert!((axis.normalize(0x00) + 1.0).abs() < EPS);
        assert!(axis.normalize(0x7F).abs() < EPS);
        assert!((axis.normalize(0xFF) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_bipolar_center_is_exact_zero() {
        let axis = CenteredAxis {
            min: 10,
            center: 100,
            max: 200,
        };
        assert_eq!(axis.normalize(100), 0.0);
        // One count below center is on the negative branch.
        assert!(axis.normalize(99) < 0.0);
    }

    #[test]
    fn test_bipolar_degenerate() {
        let low = CenteredAxis {
            min: 50,
            center: 50,
            max: 200,
        };
        let high = CenteredAxis {
            min: 50,
            center: 200,
            max: 200,
        };
        for raw in [0u8, 50, 128, 200, 255] {
            assert_eq!(low.normalize(raw), 0.0);
            assert_eq!(high.normalize(raw), 0.0);
            assert_eq!(low.normalize_split(raw), 0.0);
        }
    }

    #[test]
    fn test_split_halves() {
        let axis = CenteredAxis {
            min: 0,
            center: 128,
            max: 255,
        };

        assert!(axis.normalize_split(0).abs() < EPS);
        assert!((axis.normalize_split(64) - 0.25).abs() < 0.01);
        assert!((axis.normalize_split(128) - 0.5).abs() < EPS);
        assert!((axis.normalize_split(255) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_linear_unclamped_passthrough() {
        let axis = LinearAxis { min: 64, max: 192 };

        assert!(axis.normalize(64).abs() < EPS);
        assert!((axis.normalize(192) - 1.0).abs() < EPS);
        // Drift outside the captured range passes through unclamped.
        assert!(axis.normalize(32) < 0.0);
        assert!(axis.normalize(255) > 1.0);
    }

    #[test]
    fn test_linear_degenerate() {
        let axis = LinearAxis { min: 80, max: 80 };
        assert_eq!(axis.normalize(0), 0.0);
        assert_eq!(axis.normalize(255), 0.0);
    }

    #[test]
    fn test_brake_working_range() {
        let axis = BrakeAxis {
            min: 0,
            emergency: 0x10,
            max: 0xFF,
        };

        assert!(axis.normalize(0x10).abs() < EPS);
        assert!((axis.normalize(0xFF) - 1.0).abs() < EPS);
        // Inside the emergency band the normalized value goes negative.
        assert!(axis.normalize(0x08) < 0.0);
    }

    #[test]
    fn test_brake_emergency_predicate() {
        let axis = BrakeAxis {
            min: 0,
            emergency: 0x10,
            max: 0xFF,
        };

        assert!(axis.is_emergency(0x0F));
        assert!(!axis.is_emergency(0x10));
        assert!(!axis.is_emergency(0xFF));
    }

    #[test]
    fn test_brake_degenerate() {
        let axis = BrakeAxis {
            min: 0,
            emergency: 0xFF,
            max: 0xFF,
        };
        assert_eq!(axis.normalize(0x80), 0.0);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_bipolar_bounded_for_valid_calibration(
            raw in any::<u8>(),
            min in 0u8..100,
            center in 100u8..160,
            max in 160u8..=255,
        ) {
            let axis = CenteredAxis { min, center, max };
            // min < center < max by construction.
            if raw >= min && raw <= max {
                let value = axis.normalize(raw);
                prop_assert!(value >= -1.0 - 1e-5);
                prop_assert!(value <= 1.0 + 1e-5);
            }
            prop_assert_eq!(axis.normalize(center), 0.0);
        }

        #[test]
        fn prop_degenerate_always_neutral(raw in any::<u8>(), x in any::<u8>(), y in any::<u8>()) {
            prop_assume!(x != y);
            let axis = CenteredAxis { min: x, center: x, max: y };
            prop_assert_eq!(axis.normalize(raw), 0.0);
        }

        #[test]
        fn prop_split_bounded(
            raw in any::<u8>(),
            min in 0u8..100,
            center in 100u8..160,
            max in 160u8..=255,
        ) {
            let axis = CenteredAxis { min, center, max };
            if raw >= min && raw <= max {
                let value = axis.normalize_split(raw);
                prop_assert!(value >= -1e-5);
                prop_assert!(value <= 1.0 + 1e-5);
            }
        }

        #[test]
        fn prop_emergency_strictly_below_threshold(raw in any::<u8>(), emergency in any::<u8>()) {
            let axis = BrakeAxis { min: 0, emergency, max: 0xFF };
            prop_assert_eq!(axis.is_emergency(raw), raw < emergency);
        }
    }
}

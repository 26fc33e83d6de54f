//! Calibration and normalization for the RailDriver control console.
//!
//! Each lever reports a single raw byte; this crate maps those bytes through
//! persisted per-axis reference points into normalized floats. All
//! normalizers are pure functions of (raw byte, calibration snapshot), and a
//! degenerate calibration (coincident reference points) always yields the
//! neutral value 0.0 rather than an error.

pub mod axes;
pub mod types;

pub use types::{BrakeAxis, CabCalibration, CalibrationPoint, CenteredAxis, LinearAxis};

//! RailDriver HID protocol: report decoding, button mask handling, and
//! seven-segment display encoding.
//!
//! This crate is intentionally I/O-free. It provides pure functions and types
//! that can be tested without hardware or OS-level HID plumbing; transport
//! lives in `opencab-session`.
//!
//! ## Report layout
//!
//! The crate targets the 14-byte/44-button input report revision of the
//! RailDriver desktop console (PI Engineering, VID 0x05F3, PID 0x00D2).
//! An earlier firmware revision exposed only 28 button bits; it is not
//! supported here. See [`ids::layout`] for the canonical offsets.

pub mod buttons;
pub mod ids;
pub mod input;
pub mod output;

pub use buttons::{Button, ButtonEdgeDetector, ButtonMask};
pub use ids::{CONSUMER_USAGE_PAGE, PIE_VENDOR_ID, product_ids};
pub use input::{INPUT_REPORT_LEN, RawCabState, parse_input_report};
pub use output::{
    MPS_TO_MPH, OUTPUT_REPORT_LEN, SPEED_DISPLAY_COMMAND, build_speed_report,
    encode_speed_digits, seven_segment,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("input report too short: {len} bytes, need {min}")]
    ReportTooShort { len: usize, min: usize },

    #[error("output buffer too short: {len} bytes, need {min}")]
    OutputBufferTooShort { len: usize, min: usize },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

//! RailDriver device session.
//!
//! Owns the connection lifecycle (enumerate → select → open → stream →
//! close), publishes decoded input snapshots from the read thread to the
//! host tick through a lock-free mailbox, and maps normalized lever values
//! onto the host's locomotive control surface.
//!
//! Threading model: the reader thread is the only writer of the input
//! snapshot; the host tick thread reads it. Calibration lives behind a
//! `parking_lot::RwLock` shared with whatever thread drives calibration
//! capture (typically a UI). Button edge state belongs to the tick side and
//! never crosses threads.

pub mod config;
pub mod controls;
pub mod mailbox;
pub mod session;

pub use config::CabConfig;
pub use controls::{
    BAIL_OFF_APPLY_THRESHOLD, CabControls, CameraNudge, LocomotiveControls, camera_nudge,
    headlight_level, horn_intensity, map_locomotive_controls,
};
pub use mailbox::SnapshotCell;
pub use session::{CabSession, WRITE_RETRY_LIMIT};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("HID backend error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("protocol error: {0}")]
    Protocol(#[from] opencab_hid_raildriver_protocol::ProtocolError),

    #[error("speed display write failed after {attempts} attempts: {source}")]
    DisplayWrite {
        attempts: u32,
        source: hidapi::HidError,
    },

    #[error("configuration I/O failed: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("configuration parse failed: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::Protocol(
            opencab_hid_raildriver_protocol::ProtocolError::ReportTooShort { len: 2, min: 14 },
        );
        assert_eq!(
            format!("{}", err),
            "protocol error: input report too short: 2 bytes, need 14"
        );
    }
}

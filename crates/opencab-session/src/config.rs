//! Persisted configuration record.
//!
//! One JSON document carries the calibration record plus host preferences.
//! Loading tolerates a missing file and missing fields (old schemas): both
//! fall back to defaults, so a fresh install and a partial document behave
//! the same. Hosts save after every calibration capture.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use opencab_calibration::CabCalibration;

use crate::SessionResult;

/// Default configuration file name, relative to the host's settings
/// directory.
pub const DEFAULT_CONFIG_FILE: &str = "opencab.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CabConfig {
    /// Per-axis calibration record shared with the device session.
    pub calibration: CabCalibration,
    /// Connect to the console as soon as the host enables the driver.
    pub auto_connect: bool,
}

impl Default for CabConfig {
    fn default() -> Self {
        Self {
            calibration: CabCalibration::default(),
            auto_connect: true,
        }
    }
}

impl CabConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// I/O failures other than a missing file, and malformed JSON.
    pub fn load(path: &Path) -> SessionResult<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Write the record to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// I/O failures.
    pub fn save(&self, path: &Path) -> SessionResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencab_calibration::CalibrationPoint;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("opencab-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config =
            CabConfig::load(&scratch_path("does-not-exist.json")).expect("defaults on missing");
        assert_eq!(config, CabConfig::default());
        assert!(config.auto_connect);
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = scratch_path("round-trip.json");
        let mut config = CabConfig::default();
        config.auto_connect = false;
        config
            .calibration
            .capture(CalibrationPoint::ReverserCenter, 0x90);

        config.save(&path).expect("save");
        let loaded = CabConfig::load(&path).expect("load");
        fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
        assert_eq!(loaded.calibration.reverser.center, 0x90);
    }

    #[test]
    fn test_partial_document_falls_back_per_field() {
        let path = scratch_path("partial.json");
        fs::write(&path, r#"{"auto_connect": false}"#).expect("write fixture");

        let loaded = CabConfig::load(&path).expect("load");
        fs::remove_file(&path).ok();

        assert!(!loaded.auto_connect);
        assert_eq!(loaded.calibration, CabCalibration::default());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let path = scratch_path("malformed.json");
        fs::write(&path, "{not json").expect("write fixture");

        let result = CabConfig::load(&path);
        fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}

//! Device session lifecycle and state access.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use opencab_calibration::{CabCalibration, CalibrationPoint};
use opencab_hid_raildriver_protocol::{
    ButtonMask, CONSUMER_USAGE_PAGE, OUTPUT_REPORT_LEN, PIE_VENDOR_ID, RawCabState,
    build_speed_report, parse_input_report, product_ids,
};

use crate::controls::CabControls;
use crate::mailbox::SnapshotCell;
use crate::{SessionError, SessionResult};

/// Upper bound on busy retries for one speed-display write.
pub const WRITE_RETRY_LIMIT: u32 = 64;

/// Read timeout per poll of the input endpoint. Keeps the reader responsive
/// to shutdown without spinning.
const READ_TIMEOUT_MS: i32 = 20;

/// Backoff after a transport error before the next read attempt.
const ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// State shared between the session and its reader thread.
struct SessionShared {
    snapshot: SnapshotCell<RawCabState>,
    running: AtomicBool,
    transport_errors: AtomicU32,
}

/// A session with one RailDriver console.
///
/// Lifecycle: Disconnected → [`connect`](Self::connect) → Connected
/// (streaming) → [`disconnect`](Self::disconnect) → Disconnected. There is
/// no automatic reconnect; call `connect` again after a device swap.
///
/// While connected, a reader thread continuously decodes input reports and
/// publishes the latest snapshot; every getter reflects that snapshot at
/// whatever cadence the host polls. A transport error does not tear the
/// session down — it is logged and counted, and streaming resumes if the
/// device recovers.
pub struct CabSession {
    calibration: Arc<RwLock<CabCalibration>>,
    shared: Arc<SessionShared>,
    device: Option<Arc<HidDevice>>,
    reader: Option<JoinHandle<()>>,
    write_report: Vec<u8>,
}

impl CabSession {
    /// Create a disconnected session around a shared calibration record.
    ///
    /// The session holds a reference, not a copy: calibration captures from
    /// a UI thread are visible to the next normalization on the tick thread.
    pub fn new(calibration: Arc<RwLock<CabCalibration>>) -> Self {
        Self {
            calibration,
            shared: Arc::new(SessionShared {
                snapshot: SnapshotCell::new(RawCabState::default()),
                running: AtomicBool::new(false),
                transport_errors: AtomicU32::new(0),
            }),
            device: None,
            reader: None,
            write_report: Vec::new(),
        }
    }

    /// Enumerate, select, and open a console, then start streaming.
    ///
    /// Selection matches PI Engineering devices on the consumer-control
    /// usage page, preferring the RailDriver product ID but accepting any
    /// other match as an equal-priority fallback. Finding no device (or
    /// failing to open the one found) is not an error: the session stays
    /// Disconnected, the condition is logged, and `Ok(false)` is returned so
    /// the host may retry later.
    ///
    /// # Errors
    ///
    /// Only HID backend initialization failure is surfaced as an error.
    pub fn connect(&mut self) -> SessionResult<bool> {
        if self.device.is_some() {
            return Ok(true);
        }

        let api = HidApi::new()?;

        let mut preferred = None;
        let mut fallback = None;
        let mut seen = 0usize;
        for info in api.device_list() {
            if info.vendor_id() != PIE_VENDOR_ID || info.usage_page() != CONSUMER_USAGE_PAGE {
                continue;
            }
            seen += 1;
            if info.product_id() == product_ids::RAILDRIVER {
                preferred.get_or_insert(info);
            } else {
                fallback.get_or_insert(info);
            }
        }
        debug!(candidates = seen, "enumerated PI Engineering devices");

        let Some(info) = preferred.or(fallback) else {
            info!("no RailDriver console found");
            return Ok(false);
        };

        let device = match info.open_device(&api) {
            Ok(device) => Arc::new(device),
            Err(e) => {
                warn!(
                    product_id = info.product_id(),
                    error = %e,
                    "failed to open RailDriver console"
                );
                return Ok(false);
            }
        };

        self.write_report = vec![0u8; OUTPUT_REPORT_LEN];
        self.shared.running.store(true, Ordering::Release);
        self.shared.snapshot.publish(RawCabState::default());

        let shared = Arc::clone(&self.shared);
        let reader_device = Arc::clone(&device);
        self.reader = Some(std::thread::spawn(move || {
            read_loop(&reader_device, &shared);
        }));
        self.device = Some(device);

        info!(
            product_id = info.product_id(),
            "RailDriver console connected"
        );
        Ok(true)
    }

    /// Stop streaming and release the device. Safe to call when already
    /// disconnected.
    pub fn disconnect(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(handle) = self.reader.take() {
            if handle.join().is_err() {
                warn!("reader thread panicked during shutdown");
            }
        }
        if self.device.take().is_some() {
            info!("RailDriver console disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    /// Transport errors observed since connect. The session stays Connected
    /// through transport errors; hosts wanting stricter behavior can watch
    /// this counter.
    pub fn transport_errors(&self) -> u32 {
        self.shared.transport_errors.load(Ordering::Relaxed)
    }

    /// Latest decoded raw snapshot.
    pub fn raw_state(&self) -> RawCabState {
        self.shared.snapshot.read()
    }

    /// One coherent normalized snapshot: a single raw read and a single
    /// calibration read cover all axes. Hosts should call this once per
    /// tick instead of the individual getters.
    pub fn controls(&self) -> CabControls {
        let raw = self.raw_state();
        let cal = self.calibration.read();
        CabControls {
            reverser: cal.reverser.normalize(raw.reverser),
            throttle: cal.throttle.normalize(raw.throttle),
            auto_brake: cal.auto_brake.normalize(raw.auto_brake),
            ind_brake: cal.ind_brake.normalize(raw.ind_brake),
            bail_off: cal.bail_off.normalize(raw.bail_off),
            wiper: cal.wiper.normalize(raw.wiper),
            lights: cal.lights.normalize_split(raw.lights),
            emergency_brake: cal.auto_brake.is_emergency(raw.auto_brake),
            buttons: raw.buttons,
        }
    }

    pub fn reverser(&self) -> f32 {
        self.calibration.read().reverser.normalize(self.raw_state().reverser)
    }

    pub fn throttle(&self) -> f32 {
        self.calibration.read().throttle.normalize(self.raw_state().throttle)
    }

    pub fn auto_brake(&self) -> f32 {
        self.calibration.read().auto_brake.normalize(self.raw_state().auto_brake)
    }

    /// Automatic brake lever thrown past the emergency threshold.
    pub fn emergency_brake(&self) -> bool {
        self.calibration.read().auto_brake.is_emergency(self.raw_state().auto_brake)
    }

    pub fn ind_brake(&self) -> f32 {
        self.calibration.read().ind_brake.normalize(self.raw_state().ind_brake)
    }

    pub fn bail_off(&self) -> f32 {
        self.calibration.read().bail_off.normalize(self.raw_state().bail_off)
    }

    pub fn wipers(&self) -> f32 {
        self.calibration.read().wiper.normalize(self.raw_state().wiper)
    }

    pub fn lights(&self) -> f32 {
        self.calibration.read().lights.normalize_split(self.raw_state().lights)
    }

    pub fn buttons(&self) -> ButtonMask {
        self.raw_state().buttons
    }

    /// Shared calibration handle, e.g. for a calibration UI or persistence.
    pub fn calibration(&self) -> Arc<RwLock<CabCalibration>> {
        Arc::clone(&self.calibration)
    }

    /// Record the current raw reading of the targeted axis as the given
    /// calibration point, returning the captured byte. The host should
    /// persist the record afterwards.
    pub fn capture_calibration(&self, point: CalibrationPoint) -> u8 {
        let raw = raw_for_point(&self.raw_state(), point);
        self.calibration.write().capture(point, raw);
        debug!(?point, raw, "calibration point captured");
        raw
    }

    /// Render a velocity (m/s) onto the console's speed display.
    ///
    /// No-op while disconnected. Writes retry on a busy transport up to
    /// [`WRITE_RETRY_LIMIT`] attempts; exhaustion surfaces
    /// [`SessionError::DisplayWrite`] rather than blocking the tick thread
    /// forever.
    ///
    /// # Errors
    ///
    /// [`SessionError::DisplayWrite`] when the transport stays busy.
    pub fn update_velocity_display(&mut self, velocity_mps: f32) -> SessionResult<()> {
        let Some(device) = &self.device else {
            return Ok(());
        };

        build_speed_report(velocity_mps, &mut self.write_report)?;
        write_with_retry(&self.write_report, |report| device.write(report))
    }
}

/// Push one report through `write`, retrying a busy transport up to
/// [`WRITE_RETRY_LIMIT`] attempts before surfacing
/// [`SessionError::DisplayWrite`].
fn write_with_retry<W>(report: &[u8], mut write: W) -> SessionResult<()>
where
    W: FnMut(&[u8]) -> Result<usize, hidapi::HidError>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match write(report) {
            Ok(_) => return Ok(()),
            Err(source) if attempts >= WRITE_RETRY_LIMIT => {
                return Err(SessionError::DisplayWrite { attempts, source });
            }
            Err(e) => {
                debug!(attempts, error = %e, "display write busy, retrying");
            }
        }
    }
}

impl Drop for CabSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Read buffer size; generous so platforms that insist on whole-report
/// reads are satisfied.
const READ_BUF_LEN: usize = 64;

/// Reader thread body: poll, decode, publish.
fn read_loop(device: &HidDevice, shared: &SessionShared) {
    let mut frame = [0u8; READ_BUF_LEN];
    while shared.running.load(Ordering::Acquire) {
        // hidapi strips the leading zero report ID on reads; keep byte 0
        // clear so the frame matches the documented wire layout.
        match device.read_timeout(&mut frame[1..], READ_TIMEOUT_MS) {
            Ok(0) => {}
            Ok(n) => match parse_input_report(&frame[..n + 1]) {
                Ok(state) => shared.snapshot.publish(state),
                Err(e) => {
                    // Malformed report: keep the previous snapshot.
                    debug!(error = %e, "dropped malformed input report");
                }
            },
            Err(e) => {
                let count = shared.transport_errors.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(error = %e, count, "RailDriver transport error");
                std::thread::sleep(ERROR_BACKOFF);
            }
        }
    }
}

/// Which lever a calibration point samples from.
fn raw_for_point(state: &RawCabState, point: CalibrationPoint) -> u8 {
    use CalibrationPoint::*;
    match point {
        ReverserMin | ReverserCenter | ReverserMax => state.reverser,
        ThrottleMin | ThrottleCenter | ThrottleMax => state.throttle,
        AutoBrakeMin | AutoBrakeEmergency | AutoBrakeMax => state.auto_brake,
        IndBrakeMin | IndBrakeMax => state.ind_brake,
        BailOffMin | BailOffMax => state.bail_off,
        WiperMin | WiperMax => state.wiper,
        LightsMin | LightsCenter | LightsMax => state.lights,
    }
}

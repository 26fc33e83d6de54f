//! Diagnostic tool for the RailDriver control console: list candidate
//! devices, watch decoded cab state, or push a value to the speed display.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hidapi::HidApi;
use parking_lot::RwLock;
use tracing::info;

use opencab_calibration::CabCalibration;
use opencab_hid_raildriver_protocol::{
    ButtonEdgeDetector, CONSUMER_USAGE_PAGE, MPS_TO_MPH, PIE_VENDOR_ID,
};
use opencab_session::{CabConfig, CabSession, map_locomotive_controls};

#[derive(Parser)]
#[command(
    name = "opencab",
    about = "RailDriver control console diagnostics"
)]
struct Cli {
    /// Configuration file with the calibration record.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached PI Engineering devices
    List,
    /// Connect and print decoded cab state until interrupted
    Watch {
        /// Watch duration in seconds (default: 10)
        #[arg(long, default_value = "10")]
        duration: u64,
        /// Poll interval in milliseconds
        #[arg(long, default_value = "100")]
        interval: u64,
    },
    /// Show a speed (mph) on the console's display
    Display {
        /// Speed to render, in miles per hour
        mph: f32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let calibration = load_calibration(cli.config.as_deref())?;

    match cli.command {
        Commands::List => list_devices(),
        Commands::Watch { duration, interval } => watch(calibration, duration, interval),
        Commands::Display { mph } => display(calibration, mph),
    }
}

fn load_calibration(path: Option<&std::path::Path>) -> Result<Arc<RwLock<CabCalibration>>> {
    let calibration = match path {
        Some(path) => {
            let config = CabConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            config.calibration
        }
        None => CabCalibration::default(),
    };
    Ok(Arc::new(RwLock::new(calibration)))
}

fn list_devices() -> Result<()> {
    let api = HidApi::new().context("HID backend initialization failed")?;

    let mut found = 0;
    println!(
        "{:<8} {:<8} {:<12} Product",
        "VID", "PID", "Usage Page"
    );
    println!("{}", "-".repeat(60));
    for dev in api.device_list() {
        if dev.vendor_id() != PIE_VENDOR_ID {
            continue;
        }
        found += 1;
        let marker = if dev.usage_page() == CONSUMER_USAGE_PAGE {
            " (candidate)"
        } else {
            ""
        };
        println!(
            "{:<8} {:<8} {:<12} {}{}",
            format!("0x{:04X}", dev.vendor_id()),
            format!("0x{:04X}", dev.product_id()),
            format!("0x{:04X}", dev.usage_page()),
            dev.product_string().unwrap_or("(unknown)"),
            marker,
        );
    }

    if found == 0 {
        println!("No PI Engineering devices found.");
    }
    Ok(())
}

fn connect(calibration: Arc<RwLock<CabCalibration>>) -> Result<CabSession> {
    let mut session = CabSession::new(calibration);
    if !session.connect().context("connect failed")? {
        bail!("no RailDriver console found");
    }
    Ok(session)
}

fn watch(calibration: Arc<RwLock<CabCalibration>>, duration: u64, interval: u64) -> Result<()> {
    let session = connect(calibration)?;
    let mut edges = ButtonEdgeDetector::new();

    let deadline = Instant::now() + Duration::from_secs(duration);
    while Instant::now() < deadline {
        let cab = session.controls();
        let newly_pressed = edges.update(cab.buttons);
        let out = map_locomotive_controls(&cab, newly_pressed);

        println!(
            "rev {:+.2}  thr {:+.2}  auto {:.2}{}  ind {:.2}  bail {:.2}  \
             wiper {:.2}  light {}  horn {:.1}  buttons {:011x}",
            cab.reverser,
            cab.throttle,
            cab.auto_brake,
            if cab.emergency_brake { "!" } else { " " },
            cab.ind_brake,
            cab.bail_off,
            cab.wiper,
            out.headlight,
            out.horn,
            cab.buttons.bits(),
        );
        if !newly_pressed.is_empty() {
            info!("newly pressed: {:011x}", newly_pressed.bits());
        }

        std::thread::sleep(Duration::from_millis(interval));
    }

    if session.transport_errors() > 0 {
        info!(
            errors = session.transport_errors(),
            "transport errors during watch"
        );
    }
    Ok(())
}

fn display(calibration: Arc<RwLock<CabCalibration>>, mph: f32) -> Result<()> {
    let mut session = connect(calibration)?;
    session
        .update_velocity_display(mph / MPS_TO_MPH)
        .context("display write failed")?;
    println!("displayed {mph:.1} mph");
    Ok(())
}

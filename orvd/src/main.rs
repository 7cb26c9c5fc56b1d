//! Open Rack Vent daemon
//!
//! Drives the cooling hardware in a server-rack enclosure: builds the
//! unified hardware interface from the user's wire mapping, blinks the
//! status LEDs, and exposes fan/sensor control over a REST API.
//!
//! Configuration errors (bad wire mapping, unsupported board, malformed
//! lookup table) are fatal at startup. Once running, individual sensor
//! failures degrade to absent readings and never take the daemon down.

mod api;
mod heartbeat;

use anyhow::{Context, Result};
use api::AppState;
use clap::Parser;
use orv_core::{HardwarePlatform, OnboardLed, PcbRevision, WireMapping};
use orv_hardware::{build_interface, HardwareInterface, MockDriver, SysfsDriver};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Open Rack Vent control daemon
#[derive(Parser, Debug)]
#[command(name = "orvd")]
#[command(version, about = "Open Rack Vent control daemon", long_about = None)]
struct Args {
    /// The type of hardware running this daemon
    #[arg(long, default_value = "BeagleBoneBlack", env = "ORV_PLATFORM")]
    platform: HardwarePlatform,

    /// The revision of the PCB driving the fans and sensors
    #[arg(long, default_value = "v1.0.0", env = "ORV_PCB_REVISION")]
    pcb_revision: PcbRevision,

    /// JSON payload describing how the rack's fans and thermistors are
    /// wired to the PCB headers
    #[arg(
        long,
        default_value = orv_core::DEFAULT_WIRE_MAPPING_JSON,
        env = "ORV_WIRE_MAPPING_JSON"
    )]
    wire_mapping_json: String,

    /// Host address the web API binds to
    #[arg(long, default_value = "0.0.0.0", env = "ORV_WEB_API_HOST")]
    bind: String,

    /// Port the web API listens on
    #[arg(short, long, default_value_t = 8000, env = "ORV_WEB_API_PORT")]
    port: u16,

    /// Run against the in-memory mock driver instead of sysfs
    #[arg(long)]
    mock: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    info!("Open Rack Vent daemon starting...");

    let mapping = WireMapping::from_json(&args.wire_mapping_json)
        .context("Invalid wire mapping payload")?;

    let interface: Arc<dyn HardwareInterface> = if args.mock {
        info!("Mock mode: pin commands are recorded, not issued");
        Arc::new(build_interface(
            args.platform,
            args.pcb_revision,
            &mapping,
            MockDriver::new(),
        )?)
    } else {
        Arc::new(build_interface(
            args.platform,
            args.pcb_revision,
            &mapping,
            SysfsDriver::new(),
        )?)
    };

    // Clear a FAULT latched by a previous run.
    if let Err(e) = interface.set_onboard_led(OnboardLed::Fault, false) {
        warn!("Could not clear FAULT LED: {}", e);
    }

    let run_heartbeat = heartbeat::spawn_led_heartbeat(
        interface.clone(),
        OnboardLed::Run,
        heartbeat::HEARTBEAT_PERIOD,
    );
    let web_heartbeat = heartbeat::spawn_led_heartbeat(
        interface.clone(),
        OnboardLed::Web,
        heartbeat::HEARTBEAT_PERIOD,
    );

    let state = AppState::new(interface.clone(), args.platform, args.pcb_revision);
    let app = api::create_router(state);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Could not bind {bind_addr}"))?;

    info!("Open Rack Vent API listening on {}", bind_addr);

    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    run_heartbeat.abort();
    web_heartbeat.abort();

    if let Err(e) = &serve_result {
        error!("Uncaught runtime error: {}", e);
        // Latch the FAULT LED so the failure is visible at the rack.
        let _ = interface.set_onboard_led(OnboardLed::Fault, true);
    }

    let _ = interface.set_onboard_led(OnboardLed::Run, false);
    let _ = interface.set_onboard_led(OnboardLed::Web, false);

    info!("Stopping ORV. Bye!");
    serve_result.map_err(Into::into)
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

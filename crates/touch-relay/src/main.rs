//! touch-relay entry point.
//!
//! Drives the host pointer from a touch tablet's raw input stream.  The tablet
//! side forwards its event node over any byte pipe; this process decodes the
//! frames, projects the pen/finger position onto a screen rectangle, and moves
//! the cursor and left button accordingly.
//!
//! # Usage
//!
//! ```text
//! touch-relay [OPTIONS]
//!
//! Options:
//!   -c, --config <PATH>        Config file [default: platform config dir]
//!       --listen <ADDR>        Accept the device stream on ADDR [default: 0.0.0.0:12345]
//!       --port-attempts <N>    Ports to try when ADDR is busy [default: 16]
//!   -i, --input <PATH|->       Read frames from a file or stdin instead
//!       --region <RECT>        Destination x_min,y_min,x_max,y_max [default: primary screen]
//!       --interval-ms <MS>     Minimum time between pointer updates [default: 16]
//!       --rotate / --no-rotate Portrait tablet on a landscape screen [default: rotate]
//!       --edge-triggered       Send button changes only, not every tick
//!       --backend <NAME>       native | xdotool | dry-run [default: native]
//!       --byte-order <ORDER>   native | little | big [default: native]
//!       --write-config         Save the effective settings and exit
//! ```
//!
//! On the device, something like
//! `cat /dev/input/event1 | nc <host> 12345` feeds the listener.
//!
//! # Environment variable overrides
//!
//! Every option above except the rotate pair and `--write-config` can also be
//! set through a `TOUCH_RELAY_*` variable (`TOUCH_RELAY_LISTEN`,
//! `TOUCH_RELAY_BACKEND`, ...).  CLI args take precedence, then environment,
//! then the config file.  Log verbosity comes from `RUST_LOG`, falling back to
//! `log_level` in the config file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use touch_core::{ByteOrder, Rectangle};
use touch_relay::application::relay_touch::{ButtonTrigger, TouchRelay};
use touch_relay::infrastructure::pointer::{create_actuator, PointerBackend};
use touch_relay::infrastructure::region::{FixedRegion, PrimaryScreenRegion, RegionProvider};
use touch_relay::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, AppConfig,
};
use touch_relay::infrastructure::transport::open_source;

/// How long shutdown waits for a relay thread stuck in a blocking read.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Relay a touch tablet's raw input stream to the host pointer.
#[derive(Debug, Parser)]
#[command(
    name = "touch-relay",
    about = "Relay a touch tablet's raw input stream to the host pointer",
    version
)]
struct Cli {
    /// Config file to read instead of the platform default.
    #[arg(short, long, env = "TOUCH_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to accept the device stream on.
    #[arg(long, env = "TOUCH_RELAY_LISTEN", conflicts_with = "input")]
    listen: Option<SocketAddr>,

    /// Consecutive ports to try when the listen port is busy.
    #[arg(long, env = "TOUCH_RELAY_PORT_ATTEMPTS")]
    port_attempts: Option<u16>,

    /// Read frames from a capture file, or `-` for stdin.
    #[arg(short, long, env = "TOUCH_RELAY_INPUT")]
    input: Option<String>,

    /// Fixed destination rectangle as `x_min,y_min,x_max,y_max`.
    #[arg(long, env = "TOUCH_RELAY_REGION", allow_hyphen_values = true)]
    region: Option<Rectangle>,

    /// Minimum milliseconds between pointer updates.
    #[arg(long, env = "TOUCH_RELAY_INTERVAL_MS")]
    interval_ms: Option<f64>,

    /// Map axes for a tablet held in portrait orientation.
    #[arg(long, overrides_with = "no_rotate")]
    rotate: bool,

    /// Map axes one-to-one (landscape tablet).
    #[arg(long, overrides_with = "rotate")]
    no_rotate: bool,

    /// Send mouse_down / mouse_up only when the button state changes.
    #[arg(long, env = "TOUCH_RELAY_EDGE_TRIGGERED")]
    edge_triggered: bool,

    /// Pointer backend: native, xdotool, or dry-run.
    #[arg(long, env = "TOUCH_RELAY_BACKEND")]
    backend: Option<PointerBackend>,

    /// Byte order of the device's frames: native, little, or big.
    #[arg(long, env = "TOUCH_RELAY_BYTE_ORDER")]
    byte_order: Option<ByteOrder>,

    /// Save the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    /// Loads the config file named by `--config` (or the platform default).
    ///
    /// A missing file, or no resolvable platform directory, yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load_file_config(&self) -> anyhow::Result<(AppConfig, Option<PathBuf>)> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => config_file_path().ok(),
        };
        let config = match &path {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AppConfig::default(),
        };
        Ok((config, path))
    }

    /// Overlays the command-line settings onto `config`.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(addr) = self.listen {
            config.source.listen = addr;
            config.source.input = None;
        }
        if let Some(attempts) = self.port_attempts {
            config.source.port_attempts = attempts;
        }
        if let Some(input) = &self.input {
            config.source.input = Some(input.clone());
        }
        if let Some(region) = self.region {
            config.destination = Some(region);
        }
        if let Some(ms) = self.interval_ms {
            config.relay.interval_ms = ms;
        }
        if self.no_rotate {
            config.relay.rotate = false;
        } else if self.rotate {
            config.relay.rotate = true;
        }
        if self.edge_triggered {
            config.relay.button_trigger = ButtonTrigger::Edge;
        }
        if let Some(backend) = self.backend {
            config.pointer.backend = backend;
        }
        if let Some(order) = self.byte_order {
            config.relay.byte_order = order;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed and overlaid on the config file.
/// 2. `tracing_subscriber` is initialised from `RUST_LOG`, falling back to
///    the configured `log_level`.
/// 3. A Tokio runtime is built for the async edges: accepting the device
///    connection and watching for Ctrl+C.
/// 4. [`run`] wires the relay and blocks until the stream ends.
///
/// The relay itself runs on a blocking thread.  If Ctrl+C arrives while that
/// thread is parked in a read, the runtime is shut down with a short timeout
/// instead of waiting for the read to return.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (mut config, config_path) = cli.load_file_config()?;
    cli.apply_to(&mut config);

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.relay.log_level)),
        )
        .init();

    if cli.write_config {
        let path = config_path.context("no config path; pass --config <PATH>")?;
        save_config_to(&config, &path)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        info!("configuration written to {}", path.display());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the Tokio runtime")?;
    let result = runtime.block_on(run(config));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Wires collaborators together and runs one relay session.
async fn run(config: AppConfig) -> anyhow::Result<()> {
    let destination = match config.destination {
        Some(rect) => FixedRegion(rect).destination(),
        None => PrimaryScreenRegion::new().destination(),
    }
    .context("failed to determine the destination rectangle")?;

    let actuator = create_actuator(config.pointer.backend)
        .with_context(|| format!("failed to start the {} pointer backend", config.pointer.backend))?;

    let mut relay = TouchRelay::new(config.relay_config(), destination, Arc::clone(&actuator))
        .context("invalid relay configuration")?;

    let spec = config.source_spec();
    let session_id = Uuid::new_v4();
    let span = info_span!("relay_session", %session_id);

    info!(
        "touch-relay starting: source={spec}, destination={destination}, backend={}",
        config.pointer.backend
    );

    // ── Open the byte source ──────────────────────────────────────────────────
    let opened = tokio::select! {
        opened = open_source(&spec).instrument(span.clone()) => {
            opened.context("failed to open the byte source")?
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C before the stream opened; exiting");
            return Ok(());
        }
    };

    // ── Relay until end of stream ─────────────────────────────────────────────
    let session = span.clone();
    let task = tokio::task::spawn_blocking(move || {
        let _entered = session.enter();
        info!("relaying frames from {}", opened.origin);
        relay.run(opened.reader)
    });

    tokio::select! {
        joined = task => {
            let outcome = joined
                .context("relay thread panicked")?
                .context("relay stopped with an error")?;
            span.in_scope(|| {
                info!(
                    "session finished: {} frames, {} admitted ticks, {} truncated bytes",
                    outcome.frames, outcome.admitted, outcome.truncated_bytes
                );
            });
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
            // The relay thread may be mid-press; leave the host button up.
            if let Err(e) = actuator.mouse_up() {
                warn!("failed to release the button on shutdown: {e}");
            }
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use touch_relay::infrastructure::transport::SourceSpec;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["touch-relay"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn applied(args: &[&str]) -> AppConfig {
        let mut config = AppConfig::default();
        parse(args).apply_to(&mut config);
        config
    }

    #[test]
    fn test_no_flags_keep_file_config() {
        assert_eq!(applied(&[]), AppConfig::default());
    }

    #[test]
    fn test_input_dash_selects_stdin() {
        let config = applied(&["--input", "-"]);
        assert_eq!(config.source_spec(), SourceSpec::Stdin);
    }

    #[test]
    fn test_listen_replaces_file_input() {
        // Arrange: the file asked for a capture, the CLI asks for a listener
        let mut config = AppConfig::default();
        config.source.input = Some("capture.bin".to_string());

        // Act
        parse(&["--listen", "127.0.0.1:4000", "--port-attempts", "2"]).apply_to(&mut config);

        // Assert
        assert_eq!(
            config.source_spec(),
            SourceSpec::Listen {
                addr: "127.0.0.1:4000".parse().unwrap(),
                port_attempts: 2
            }
        );
    }

    #[test]
    fn test_listen_and_input_conflict() {
        let result = Cli::try_parse_from(["touch-relay", "--listen", "0.0.0.0:1", "--input", "-"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_region_parses_rectangle() {
        let config = applied(&["--region", "100,200,1380,920"]);
        assert_eq!(
            config.destination,
            Some(Rectangle::new(100, 200, 1380, 920).unwrap())
        );
    }

    #[test]
    fn test_region_accepts_negative_origin() {
        let config = applied(&["--region", "-1920,0,0,1080"]);
        assert_eq!(
            config.destination,
            Some(Rectangle::new(-1920, 0, 0, 1080).unwrap())
        );
    }

    #[test]
    fn test_region_rejects_inverted_rectangle() {
        let result = Cli::try_parse_from(["touch-relay", "--region", "10,0,0,10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_rotate_and_rotate_last_one_wins() {
        assert!(!applied(&["--no-rotate"]).relay.rotate);
        assert!(applied(&["--no-rotate", "--rotate"]).relay.rotate);
        assert!(!applied(&["--rotate", "--no-rotate"]).relay.rotate);
    }

    #[test]
    fn test_relay_flags_reach_relay_config() {
        // Act
        let relay = applied(&[
            "--interval-ms",
            "0",
            "--edge-triggered",
            "--byte-order",
            "little",
        ])
        .relay_config();

        // Assert
        assert_eq!(relay.interval, Duration::ZERO);
        assert_eq!(relay.button_trigger, ButtonTrigger::Edge);
        assert_eq!(relay.byte_order, ByteOrder::Little);
    }

    #[test]
    fn test_backend_flag_parses() {
        let config = applied(&["--backend", "dry-run"]);
        assert_eq!(config.pointer.backend, PointerBackend::DryRun);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["touch-relay", "--backend", "uinput"]).is_err());
    }
}

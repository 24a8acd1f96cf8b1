//! Remote pointer host: entry point.
//!
//! Serves the motion/click HTTP API and drives the local cursor.
//!
//! # Usage
//!
//! ```text
//! pointer-host [OPTIONS]
//!
//! Options:
//!   --config <PATH>      Config file [default: platform config dir/host.toml]
//!   --bind <IP>          Listen address (overrides server.bind_address)
//!   --port <PORT>        Listen port (overrides server.port)
//!   --backend <BACKEND>  native | virtual (overrides cursor.backend)
//!   --log-level <LEVEL>  tracing filter (overrides logging.level)
//!   --print-config       Print the effective config as TOML and exit
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable           | Flag          |
//! |--------------------|---------------|
//! | `POINTER_CONFIG`   | `--config`    |
//! | `POINTER_BIND`     | `--bind`      |
//! | `POINTER_PORT`     | `--port`      |
//! | `POINTER_BACKEND`  | `--backend`   |
//! | `POINTER_LOG`      | `--log-level` |
//!
//! `RUST_LOG`, when set, wins over both the flag and the config file.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pointer_host::application::{CursorControl, MotionIntegrator};
use pointer_host::infrastructure::cursor::{open_native, UnavailableCursor, VirtualCursor};
use pointer_host::infrastructure::http::HttpServer;
use pointer_host::infrastructure::storage::config::{
    load_config, CursorBackend, CursorConfig, HostConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    Native,
    Virtual,
}

impl From<BackendArg> for CursorBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Native => CursorBackend::Native,
            BackendArg::Virtual => CursorBackend::Virtual,
        }
    }
}

/// Remote pointer host.
///
/// Accepts relative motion and click requests from a touch controller on the
/// local network and applies them to this machine's cursor.
#[derive(Debug, Parser)]
#[command(name = "pointer-host", about = "Drive this machine's cursor from a remote touch pad", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "POINTER_CONFIG")]
    config: Option<PathBuf>,

    /// IP address to listen on.
    ///
    /// `0.0.0.0` accepts controllers on any interface; `127.0.0.1` only local.
    #[arg(long, env = "POINTER_BIND")]
    bind: Option<String>,

    /// TCP port to listen on.
    #[arg(long, env = "POINTER_PORT")]
    port: Option<u16>,

    /// Cursor backend.  `virtual` moves an in-memory pointer only.
    #[arg(long, value_enum, env = "POINTER_BACKEND")]
    backend: Option<BackendArg>,

    /// Log level or filter directive.
    #[arg(long, env = "POINTER_LOG")]
    log_level: Option<String>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Loads the config file and applies CLI overrides on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the merged
    /// values fail validation.
    fn into_host_config(self) -> anyhow::Result<HostConfig> {
        let config = load_config(self.config.as_deref()).with_context(|| match &self.config {
            Some(path) => format!("failed to load config from {}", path.display()),
            None => "failed to load config from the default location".to_string(),
        })?;
        let config = self.apply(config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn apply(&self, mut config: HostConfig) -> HostConfig {
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.backend {
            config.cursor.backend = backend.into();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config
    }
}

// ── Cursor backend selection ──────────────────────────────────────────────────

/// Opens the configured cursor.
///
/// A native backend that fails to open is replaced by [`UnavailableCursor`]
/// so the server still starts and `/test` reports the problem to the
/// controller.
fn open_cursor(config: &CursorConfig) -> Arc<dyn CursorControl> {
    match config.backend {
        CursorBackend::Virtual => {
            info!(
                "using virtual cursor on a {}x{} screen",
                config.screen_width, config.screen_height
            );
            Arc::new(VirtualCursor::new(config.screen_width, config.screen_height))
        }
        CursorBackend::Native => match open_native() {
            Ok(cursor) => {
                info!("native cursor control ready");
                cursor
            }
            Err(e) => {
                error!("cursor control unavailable: {e}");
                warn!("serving anyway; every cursor request will fail until restarted");
                Arc::new(UnavailableCursor::new(e.to_string()))
            }
        },
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let print_config = cli.print_config;
    let config = cli.into_host_config()?;

    if print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = config.socket_addr()?;
    info!(
        "remote pointer host starting: addr={addr}, max_delta={}, smoothing={}, min_move={}, reset_gap_ms={}",
        config.motion.max_delta,
        config.motion.smoothing,
        config.motion.min_move,
        config.motion.reset_gap_ms
    );

    let cursor = open_cursor(&config.cursor);
    let integrator = Arc::new(MotionIntegrator::new(cursor, config.integrator_config()));
    let server = HttpServer::bind(addr, integrator).await?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    server.serve(running).await?;

    info!("remote pointer host stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Remote pointer controller: entry point.
//!
//! Replays a touch script against a host.  Useful for driving a host without
//! a phone, and for soak-testing the motion pipeline.
//!
//! # Usage
//!
//! ```text
//! pointer-remote [OPTIONS]
//!
//! Options:
//!   --host <ADDR>         Host to connect to before the script starts
//!   --port <PORT>         Port used when an address has none [default: 3000]
//!   --timeout-ms <MS>     Per-request timeout [default: 2000]
//!   --sensitivity <GAIN>  Initial sensitivity [default: 1.5]
//!   --script <PATH>       Script file; `-` or absent reads stdin
//!   --log-level <LEVEL>   tracing filter [default: info]
//! ```
//!
//! Each flag also reads a `POINTER_*` environment variable (`POINTER_HOST`,
//! `POINTER_PORT`, `POINTER_TIMEOUT_MS`, `POINTER_SENSITIVITY`,
//! `POINTER_SCRIPT`, `POINTER_LOG`).  `RUST_LOG` wins over `--log-level`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pointer_core::protocol::DEFAULT_PORT;
use pointer_core::SamplerConfig;
use pointer_remote::application::RemoteSession;
use pointer_remote::infrastructure::http_transport::HttpTransport;
use pointer_remote::infrastructure::touch_script::replay;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote pointer controller.
///
/// Reads touch commands (one JSON object per line) and forwards the
/// resulting motion and clicks to a Remote Pointer host.
#[derive(Debug, Parser)]
#[command(name = "pointer-remote", about = "Replay touch gestures against a Remote Pointer host", version)]
struct Cli {
    /// Host address (`ip`, `ip:port`, or `name`).  Connects before replay.
    #[arg(long, env = "POINTER_HOST")]
    host: Option<String>,

    /// Port used when an address does not name one.
    #[arg(long, env = "POINTER_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "POINTER_TIMEOUT_MS", default_value_t = 2000)]
    timeout_ms: u64,

    /// Initial sensitivity gain (clamped to the sampler's bounds).
    #[arg(long, env = "POINTER_SENSITIVITY", default_value_t = 1.5)]
    sensitivity: f64,

    /// Touch script to replay.  Reads stdin when absent or `-`.
    #[arg(long, env = "POINTER_SCRIPT")]
    script: Option<PathBuf>,

    /// Log level or filter directive.
    #[arg(long, env = "POINTER_LOG", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            initial_sensitivity: self.sensitivity,
            ..SamplerConfig::default()
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}

async fn open_script(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&cli.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let transport = HttpTransport::new(cli.timeout()).context("failed to build HTTP client")?;
    let mut session = RemoteSession::new(transport, cli.sampler_config()).with_default_port(cli.port);
    info!(
        "remote pointer controller starting: sensitivity={:.2}, timeout_ms={}",
        session.sensitivity(),
        cli.timeout_ms
    );

    if let Some(host) = &cli.host {
        if let Err(e) = session.connect(host).await {
            warn!("initial connect failed: {e}");
        }
    }

    let script = open_script(cli.script.as_ref()).await?;
    let summary = replay(script, &mut session).await?;

    info!(
        commands = summary.commands,
        sent = summary.sent,
        suppressed = summary.suppressed,
        ignored = summary.ignored,
        clicks = summary.clicks,
        failures = summary.failures,
        "replay finished"
    );
    if let Some(err) = session.last_error() {
        warn!("last error: {err}");
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

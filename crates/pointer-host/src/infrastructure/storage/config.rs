//! TOML configuration for the host.
//!
//! Default location:
//! - Windows:  `%APPDATA%\RemotePointer\host.toml`
//! - Linux:    `~/.config/remote-pointer/host.toml`
//! - macOS:    `~/Library/Application Support/RemotePointer/host.toml`
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0"
//! port = 3000
//!
//! [motion]
//! max_delta = 100.0
//! smoothing = 0.3
//! min_move = 1.0
//! reset_gap_ms = 100
//!
//! [cursor]
//! backend = "native"      # or "virtual"
//! screen_width = 1920
//! screen_height = 1080
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field is optional; missing ones take the defaults shown above, and a
//! missing file at the default location is the same as an empty one.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pointer_core::domain::boundary::DEFAULT_MAX_DELTA;
use pointer_core::domain::smoothing::{DEFAULT_RESET_GAP, DEFAULT_SMOOTHING_ALPHA};
use pointer_core::protocol::DEFAULT_PORT;
use pointer_core::SmoothingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::integrate_motion::{IntegratorConfig, DEFAULT_MIN_MOVE};

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Integrator tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotionConfig {
    #[serde(default = "default_max_delta")]
    pub max_delta: f64,
    /// Weight of the previous smoothed delta, in `[0, 1)`.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    #[serde(default = "default_min_move")]
    pub min_move: f64,
    #[serde(default = "default_reset_gap_ms")]
    pub reset_gap_ms: u64,
}

/// Which cursor the host drives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CursorBackend {
    /// The real OS pointer.
    #[default]
    Native,
    /// An in-memory pointer; nothing on screen moves.
    Virtual,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CursorConfig {
    #[serde(default)]
    pub backend: CursorBackend,
    /// Virtual screen size, only used by the `virtual` backend.
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level or filter directive; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_max_delta() -> f64 {
    DEFAULT_MAX_DELTA
}
fn default_smoothing() -> f64 {
    DEFAULT_SMOOTHING_ALPHA
}
fn default_min_move() -> f64 {
    DEFAULT_MIN_MOVE
}
fn default_reset_gap_ms() -> u64 {
    DEFAULT_RESET_GAP.as_millis() as u64
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_delta: default_max_delta(),
            smoothing: default_smoothing(),
            min_move: default_min_move(),
            reset_gap_ms: default_reset_gap_ms(),
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            backend: CursorBackend::default(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Validation and conversion ─────────────────────────────────────────────────

impl HostConfig {
    /// Checks every value that parsed but could still be unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.motion;
        if !(m.max_delta.is_finite() && m.max_delta > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "motion.max_delta must be a positive number, got {}",
                m.max_delta
            )));
        }
        if !(0.0..1.0).contains(&m.smoothing) {
            return Err(ConfigError::Invalid(format!(
                "motion.smoothing must be in [0, 1), got {}",
                m.smoothing
            )));
        }
        if !(m.min_move.is_finite() && m.min_move >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "motion.min_move must be zero or positive, got {}",
                m.min_move
            )));
        }
        if m.reset_gap_ms == 0 {
            return Err(ConfigError::Invalid(
                "motion.reset_gap_ms must be greater than zero".into(),
            ));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// The address to listen on.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server.bind_address.trim().parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "server.bind_address is not an IP address: {:?}",
                self.server.bind_address
            ))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn integrator_config(&self) -> IntegratorConfig {
        IntegratorConfig {
            max_delta: self.motion.max_delta,
            smoothing: SmoothingConfig {
                alpha: self.motion.smoothing,
                reset_gap: Duration::from_millis(self.motion.reset_gap_ms),
            },
            min_move: self.motion.min_move,
        }
    }

    /// The config as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(platform_config_dir()
        .ok_or(ConfigError::NoPlatformConfigDir)?
        .join("host.toml"))
}

/// Loads the host config.
///
/// With an explicit `path` the file must exist.  Without one, the default
/// location is tried and a missing file (or an undeterminable config
/// directory) yields `HostConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<HostConfig, ConfigError> {
    match path {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Ok(path) => match read_config(&path) {
                Err(ConfigError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    Ok(HostConfig::default())
                }
                other => other,
            },
            Err(ConfigError::NoPlatformConfigDir) => Ok(HostConfig::default()),
            Err(e) => Err(e),
        },
    }
}

fn read_config(path: &Path) -> Result<HostConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("RemotePointer"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("remote-pointer"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("RemotePointer")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

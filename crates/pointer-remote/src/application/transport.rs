//! The host capability seen from the controller, and the address it targets.
//!
//! [`HostTransport`] is stateless with respect to the host: every call names
//! the [`HostAddress`] it goes to, so the session alone decides which host is
//! current and whether it is still reachable.

use std::fmt;

use async_trait::async_trait;
use pointer_core::protocol::{
    ClickButton, ClickResponse, CursorPosition, MotionRequest, MotionResponse, StatusResponse,
    DEFAULT_PORT,
};
use thiserror::Error;

/// Errors returned by a [`HostTransport`].
///
/// Every variant means the same thing to the session: the request did not
/// complete and the connection must be treated as lost.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The host could not be reached (refused, reset, DNS failure, ...).
    #[error("host unreachable: {0}")]
    Unreachable(String),
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// The host answered with a non-2xx status.
    #[error("server error {status}: {message}")]
    Status { status: u16, message: String },
    /// The host answered 2xx but with `success: false`.
    #[error("host reported failure: {0}")]
    Rejected(String),
    /// The response body was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Request/response channel to a host.
///
/// The production implementation speaks HTTP; tests use the generated
/// `MockHostTransport` or a real in-process host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostTransport: Send + Sync {
    /// `GET /test`: connectivity and capability check.
    async fn probe(&self, host: &HostAddress) -> Result<StatusResponse, TransportError>;

    /// `POST /mouse`: sends one relative motion event.
    async fn send_motion(
        &self,
        host: &HostAddress,
        motion: MotionRequest,
    ) -> Result<MotionResponse, TransportError>;

    /// `POST /click`: clicks `button` at the current cursor position.
    async fn send_click(
        &self,
        host: &HostAddress,
        button: ClickButton,
    ) -> Result<ClickResponse, TransportError>;

    /// `GET /position`: reads the host cursor position.
    async fn position(&self, host: &HostAddress) -> Result<CursorPosition, TransportError>;
}

// ── Host address ──────────────────────────────────────────────────────────────

/// Why a host address string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("host address is empty")]
    Empty,
    #[error("invalid host address {0:?}")]
    Invalid(String),
}

/// Host name or IP plus port, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress {
    host: String,
    port: u16,
}

impl HostAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses `input` using the standard host port when none is given.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        Self::parse_with_default_port(input, DEFAULT_PORT)
    }

    /// Parses `host`, `host:port`, `[v6]`, `[v6]:port`, or a bare IPv6
    /// literal.  Surrounding whitespace, an `http://` prefix and a trailing
    /// `/` are ignored.
    pub fn parse_with_default_port(input: &str, default_port: u16) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        let invalid = || AddressError::Invalid(trimmed.to_string());

        let rest = trimmed.strip_prefix("http://").unwrap_or(trimmed);
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            let (inner, after) = bracketed.split_once(']').ok_or_else(invalid)?;
            let port = match after {
                "" => default_port,
                p => p
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(invalid)?,
            };
            (format!("[{inner}]"), port)
        } else if rest.matches(':').count() > 1 {
            (format!("[{rest}]"), default_port)
        } else if let Some((host, port)) = rest.split_once(':') {
            (host.to_string(), port.parse().map_err(|_| invalid())?)
        } else {
            (rest.to_string(), default_port)
        };

        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if bare.is_empty()
            || port == 0
            || bare
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@'))
        {
            return Err(invalid());
        }
        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `http://host:port` followed by `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path)
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

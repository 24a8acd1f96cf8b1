//! RemoteSession: the controller side of the motion pipeline.
//!
//! Combines the [`MotionSampler`], the dead-zone transport policy, and the
//! connection state machine:
//!
//! ```text
//!   Disconnected ──connect() + GET /test ok──▶ Connected
//!        ▲                                        │
//!        └──────── any transport failure ─────────┘
//! ```
//!
//! A lost connection is never retried automatically.  Dropped motion events
//! are superseded by the next sample, and the user reconnects explicitly,
//! which re-runs the `/test` handshake.

use pointer_core::protocol::{
    ClickButton, ClickResponse, CursorPosition, MotionRequest, StatusResponse, DEFAULT_PORT,
};
use pointer_core::{MotionDelta, MotionSampler, SamplerConfig, TouchSample};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::transport::{AddressError, HostAddress, HostTransport, TransportError};

/// Errors surfaced to the user by [`RemoteSession`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("please enter a host address")]
    EmptyAddress,
    #[error("invalid host address {0:?}")]
    InvalidAddress(String),
    /// `reconnect()` was called before any successful `connect()`.
    #[error("no host to reconnect to")]
    NoPreviousHost,
    #[error("not connected to a host")]
    NotConnected,
    /// The `/test` handshake failed; the session stays disconnected.
    #[error("connection failed: {0}")]
    ConnectFailed(#[source] TransportError),
    /// A request on an established session failed; the session is now
    /// disconnected.
    #[error("lost connection to host: {0}")]
    ConnectionLost(#[source] TransportError),
}

impl From<AddressError> for SessionError {
    fn from(e: AddressError) -> Self {
        match e {
            AddressError::Empty => SessionError::EmptyAddress,
            AddressError::Invalid(s) => SessionError::InvalidAddress(s),
        }
    }
}

/// Connection state of a [`RemoteSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected(HostAddress),
}

/// What happened to one touch-move callback.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Not tracking a gesture, or not connected; the sampler was not touched.
    Ignored,
    /// Inside the dead zone (including the zero baseline delta); nothing sent.
    Suppressed(MotionDelta),
    /// Sent to the host, which reported the resulting cursor position.
    Sent {
        delta: MotionDelta,
        position: CursorPosition,
    },
}

/// One controller talking to one host.
pub struct RemoteSession<T> {
    transport: T,
    sampler: MotionSampler,
    state: ConnectionState,
    default_port: u16,
    last_host: Option<HostAddress>,
    last_error: Option<String>,
}

impl<T: HostTransport> RemoteSession<T> {
    pub fn new(transport: T, config: SamplerConfig) -> Self {
        Self {
            transport,
            sampler: MotionSampler::new(config),
            state: ConnectionState::Disconnected,
            default_port: DEFAULT_PORT,
            last_host: None,
            last_error: None,
        }
    }

    /// Port used when a host address passed to [`connect`](Self::connect)
    /// does not name one.
    pub fn with_default_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected(_))
    }

    /// The connected host, if any.
    pub fn host(&self) -> Option<&HostAddress> {
        match &self.state {
            ConnectionState::Connected(addr) => Some(addr),
            ConnectionState::Disconnected => None,
        }
    }

    /// Message of the most recent connect or transport failure, cleared by a
    /// successful connect.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn sensitivity(&self) -> f64 {
        self.sampler.sensitivity()
    }

    pub fn sampler(&self) -> &MotionSampler {
        &self.sampler
    }

    // ── Connection ────────────────────────────────────────────────────────────

    /// Parses `address` and runs the `/test` handshake against it.
    ///
    /// On success the session is connected to that host.  On any failure the
    /// session is disconnected, even if it was previously connected elsewhere.
    pub async fn connect(&mut self, address: &str) -> Result<StatusResponse, SessionError> {
        let host = match HostAddress::parse_with_default_port(address, self.default_port) {
            Ok(host) => host,
            Err(e) => {
                let e = SessionError::from(e);
                self.state = ConnectionState::Disconnected;
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };
        self.handshake(host).await
    }

    /// Re-runs the handshake against the last host passed to `connect`.
    pub async fn reconnect(&mut self) -> Result<StatusResponse, SessionError> {
        let host = self.last_host.clone().ok_or(SessionError::NoPreviousHost)?;
        self.handshake(host).await
    }

    /// Drops the connection without contacting the host.
    pub fn disconnect(&mut self) {
        if let ConnectionState::Connected(host) = &self.state {
            info!("disconnected from {host}");
        }
        self.state = ConnectionState::Disconnected;
    }

    async fn handshake(&mut self, host: HostAddress) -> Result<StatusResponse, SessionError> {
        self.state = ConnectionState::Disconnected;
        self.last_host = Some(host.clone());

        match self.transport.probe(&host).await {
            Ok(status) => {
                info!(
                    "connected to {host}: cursor at ({}, {})",
                    status.position.x, status.position.y
                );
                self.state = ConnectionState::Connected(host);
                self.last_error = None;
                Ok(status)
            }
            Err(e) => {
                warn!("connection to {host} failed: {e}");
                self.last_error = Some(e.to_string());
                Err(SessionError::ConnectFailed(e))
            }
        }
    }

    fn lose_connection(&mut self, e: TransportError) -> SessionError {
        if let ConnectionState::Connected(host) = &self.state {
            warn!("lost connection to {host}: {e}");
        }
        self.state = ConnectionState::Disconnected;
        self.last_error = Some(e.to_string());
        SessionError::ConnectionLost(e)
    }

    // ── Touch surface ─────────────────────────────────────────────────────────

    /// Begins tracking a gesture.  Tracking does not require a connection.
    pub fn touch_start(&mut self, sample: TouchSample) {
        self.sampler.on_touch_start(sample);
    }

    /// Samples a touch move and, if it clears the dead zone, sends it.
    ///
    /// Returns [`SessionError::ConnectionLost`] if the send fails; the
    /// dropped event is not retried.
    pub async fn touch_move(&mut self, sample: TouchSample) -> Result<MoveOutcome, SessionError> {
        let Some(host) = self.host().cloned() else {
            return Ok(MoveOutcome::Ignored);
        };
        if !self.sampler.is_tracking() {
            return Ok(MoveOutcome::Ignored);
        }

        let delta = self.sampler.on_touch_move(sample);
        if !self.sampler.should_transmit(&delta) {
            return Ok(MoveOutcome::Suppressed(delta));
        }

        let request = MotionRequest {
            delta_x: delta.dx,
            delta_y: delta.dy,
        };
        match self.transport.send_motion(&host, request).await {
            Ok(resp) => {
                debug!(
                    dx = delta.dx,
                    dy = delta.dy,
                    x = resp.position.x,
                    y = resp.position.y,
                    "motion sent"
                );
                Ok(MoveOutcome::Sent {
                    delta,
                    position: resp.position,
                })
            }
            Err(e) => Err(self.lose_connection(e)),
        }
    }

    /// Ends the current gesture.
    pub fn touch_end(&mut self) {
        self.sampler.on_touch_end();
    }

    /// Clicks `button` on the host.
    ///
    /// Returns `Ok(None)` without contacting the host while disconnected.
    pub async fn click(
        &mut self,
        button: ClickButton,
    ) -> Result<Option<ClickResponse>, SessionError> {
        let Some(host) = self.host().cloned() else {
            debug!("{button} click ignored while disconnected");
            return Ok(None);
        };
        match self.transport.send_click(&host, button).await {
            Ok(resp) => {
                info!("{}", resp.message);
                Ok(Some(resp))
            }
            Err(e) => Err(self.lose_connection(e)),
        }
    }

    /// Reads the host cursor position (diagnostics).
    pub async fn position(&mut self) -> Result<CursorPosition, SessionError> {
        let host = self.host().cloned().ok_or(SessionError::NotConnected)?;
        match self.transport.position(&host).await {
            Ok(position) => Ok(position),
            Err(e) => Err(self.lose_connection(e)),
        }
    }

    /// Steps sensitivity up or down; returns the new value.
    pub fn adjust_sensitivity(&mut self, increase: bool) -> f64 {
        let value = self.sampler.adjust_sensitivity(increase);
        info!("sensitivity set to {value:.2}");
        value
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

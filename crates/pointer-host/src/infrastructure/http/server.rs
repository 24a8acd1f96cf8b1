//! HTTP server: accept loop and per-connection request handling.
//!
//! Each accepted connection runs in its own Tokio task and may carry many
//! keep-alive requests.  Routing touches the cursor through blocking OS calls
//! and a `std::sync::Mutex`, so each request is handed to
//! `spawn_blocking` rather than run on the async worker.
//!
//! Shutdown is triggered by a shared `AtomicBool` that is cleared by the
//! Ctrl+C handler in `main.rs`; the accept loop polls it between accepts.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use pointer_core::protocol::MOUSE_PATH;

use super::request::{read_request, HttpError};
use super::response::Response;
use super::router::handle_request;
use crate::application::integrate_motion::MotionIntegrator;

/// How often the accept loop re-checks the `running` flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);
/// An idle keep-alive connection is closed after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// A bound, not yet serving, HTTP listener.
pub struct HttpServer {
    listener: TcpListener,
    integrator: Arc<MotionIntegrator>,
}

impl HttpServer {
    /// Binds the listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is in use or cannot be bound.
    pub async fn bind(addr: SocketAddr, integrator: Arc<MotionIntegrator>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;
        Ok(Self {
            listener,
            integrator,
        })
    }

    /// The address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until `running` is set to `false`.
    pub async fn serve(self, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        info!("remote pointer host listening on {}", self.local_addr()?);

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            match timeout(ACCEPT_POLL, self.listener.accept()).await {
                Ok(Ok((stream, peer))) => {
                    debug!("connection from {peer}");
                    let integrator = Arc::clone(&self.integrator);
                    tokio::spawn(async move {
                        handle_connection(stream, peer, integrator).await;
                    });
                }
                Ok(Err(e)) => {
                    // Transient (e.g. out of file descriptors); keep serving.
                    error!("accept error: {e}");
                }
                Err(_) => {}
            }
        }

        Ok(())
    }
}

// ── Per-connection handler ────────────────────────────────────────────────────

async fn handle_connection(stream: TcpStream, peer: SocketAddr, integrator: Arc<MotionIntegrator>) {
    match serve_connection(stream, peer, integrator).await {
        Ok(()) => debug!("connection {peer} closed"),
        Err(e) => warn!("connection {peer} closed with error: {e}"),
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    integrator: Arc<MotionIntegrator>,
) -> Result<(), HttpError> {
    // Each request is tiny; don't let Nagle hold back the response.
    stream.set_nodelay(true)?;
    let mut buf = Vec::with_capacity(1024);

    loop {
        let request = match timeout(IDLE_TIMEOUT, read_request(&mut stream, &mut buf)).await {
            Err(_) => return Ok(()),
            Ok(Ok(Some(request))) => request,
            Ok(Ok(None)) => return Ok(()),
            Ok(Err(e)) => {
                let status = match &e {
                    HttpError::TooLarge => Some(413),
                    HttpError::Malformed(_) => Some(400),
                    HttpError::Io(_) | HttpError::UnexpectedEof => None,
                };
                if let Some(status) = status {
                    let message = if status == 413 {
                        "Request too large"
                    } else {
                        "Bad request"
                    };
                    stream
                        .write_all(&Response::error(status, message).to_bytes(false))
                        .await?;
                }
                return Err(e);
            }
        };

        let started = Instant::now();
        let keep_alive = request.keep_alive();
        let method = request.method.clone();
        let path = request.path.clone();

        let routed = Arc::clone(&integrator);
        let response = tokio::task::spawn_blocking(move || handle_request(&routed, &request))
            .await
            .unwrap_or_else(|e| {
                error!("request handler panicked: {e}");
                Response::error(500, "Internal server error")
            });

        let elapsed_us = started.elapsed().as_micros() as u64;
        if path == MOUSE_PATH {
            debug!(%peer, %method, %path, status = response.status, elapsed_us, "request");
        } else {
            info!(%peer, %method, %path, status = response.status, elapsed_us, "request");
        }

        stream.write_all(&response.to_bytes(keep_alive)).await?;
        if !keep_alive {
            return Ok(());
        }
    }
}

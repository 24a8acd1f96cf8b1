//! # pointer-remote
//!
//! The controller half of Remote Pointer: turns touch-drag gestures into
//! relative motion events and sends them to a host over the local network.
//!
//! # How the pieces fit
//!
//! ```text
//!  touch script ──▶ RemoteSession ──▶ HostTransport ──HTTP──▶ pointer-host
//!  (or a UI)        │ MotionSampler     (HttpTransport)
//!                   │ dead-zone filter
//!                   └ Connected / Disconnected
//! ```
//!
//! - **`application`** – [`RemoteSession`](application::RemoteSession), the
//!   connection state machine wrapped around the sampler, and the
//!   [`HostTransport`](application::HostTransport) trait it sends through.
//! - **`infrastructure`** – the `reqwest` implementation of that trait and a
//!   line-delimited JSON script format that stands in for a touch surface.

pub mod application;
pub mod infrastructure;

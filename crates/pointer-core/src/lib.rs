//! # pointer-core
//!
//! Shared library for Remote Pointer containing the motion-event pipeline
//! math and the JSON wire types spoken between the controller and the host.
//!
//! This crate is used by both the host and the controller applications.
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! Remote Pointer turns a handheld touch device into a touchpad for another
//! computer.  The *controller* (the touch device) samples finger positions and
//! sends small relative motion events to the *host* over the local network.
//! The host clamps, smooths, and applies those events to its real cursor.
//!
//! This crate (`pointer-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure pipeline logic with no OS dependencies: the touch
//!   sampler with its sensitivity gain, the boundary clamp that distrusts
//!   client-supplied magnitudes, and the exponential smoothing state machine.
//!
//! - **`protocol`** – The JSON request and response bodies for the four HTTP
//!   endpoints (`/test`, `/mouse`, `/click`, `/position`).

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `pointer_core::MotionSampler` instead of `pointer_core::domain::sampler::MotionSampler`.
pub use domain::boundary::{BoundaryError, BoundedDelta};
pub use domain::delta::MotionDelta;
pub use domain::sampler::{MotionSampler, SamplerConfig, TouchSample};
pub use domain::sensitivity::SensitivityGain;
pub use domain::smoothing::{SmoothingConfig, SmoothingPhase, SmoothingState};
pub use protocol::messages::{ClickButton, CursorPosition};

//! Domain entities for the motion-event pipeline.
//!
//! This module contains pure pipeline logic with no infrastructure dependencies.
//! Nothing here reads a clock, opens a socket, or touches the real cursor:
//! callers pass timestamps in and receive values out, which keeps every rule
//! testable in isolation.
//!
//! # Data flow
//!
//! ```text
//! controller:  TouchSample ──> MotionSampler ──> MotionDelta ──(dead zone)──> network
//! host:        network ──> BoundedDelta (finite + clamp) ──> SmoothingState ──> cursor
//! ```

/// Relative motion value shared by both sides of the pipeline.
pub mod delta;

/// Controller-side sensitivity gain.
pub mod sensitivity;

/// Controller-side touch sampler.
pub mod sampler;

/// Host-side validation of untrusted deltas.
pub mod boundary;

/// Host-side exponential smoothing state machine.
pub mod smoothing;

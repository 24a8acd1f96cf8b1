//! Boundary validation for deltas received from the network.
//!
//! The host never trusts the magnitude a controller claims.  Every inbound
//! delta passes through [`BoundedDelta::validate`] before any smoothing math
//! runs, and a [`BoundedDelta`] can only be obtained that way, so the rest of
//! the host can rely on both axes being finite and within `[-max, max]`.
//!
//! This module has no knowledge of smoothing or cursor state; the clamp can be
//! tested (and reasoned about) entirely on its own.

use thiserror::Error;

use super::delta::MotionDelta;

/// Default per-axis clamp bound, in pixels.
pub const DEFAULT_MAX_DELTA: f64 = 100.0;

/// Reasons an inbound delta is rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BoundaryError {
    #[error("deltaX is not a finite number")]
    NonFiniteX,
    #[error("deltaY is not a finite number")]
    NonFiniteY,
}

/// A motion delta whose axes are finite and clamped to a known bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedDelta {
    delta: MotionDelta,
    max: f64,
}

impl BoundedDelta {
    /// Validates that both axes are finite and clamps each one independently
    /// to `[-max_delta, max_delta]`.
    ///
    /// A negative or non-finite `max_delta` is treated as zero, which pins
    /// every delta to the origin rather than widening the bound.
    pub fn validate(raw_x: f64, raw_y: f64, max_delta: f64) -> Result<Self, BoundaryError> {
        if !raw_x.is_finite() {
            return Err(BoundaryError::NonFiniteX);
        }
        if !raw_y.is_finite() {
            return Err(BoundaryError::NonFiniteY);
        }
        let max = if max_delta.is_finite() { max_delta.max(0.0) } else { 0.0 };
        Ok(Self {
            delta: MotionDelta::new(raw_x.clamp(-max, max), raw_y.clamp(-max, max)),
            max,
        })
    }

    pub fn delta(&self) -> MotionDelta {
        self.delta
    }

    /// The bound this delta was clamped to.
    pub fn bound(&self) -> f64 {
        self.max
    }

    /// Returns `true` if validation changed either axis.
    pub fn was_clamped(&self, raw_x: f64, raw_y: f64) -> bool {
        self.delta.dx != raw_x || self.delta.dy != raw_y
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Relative motion deltas.

use serde::{Deserialize, Serialize};

/// Relative cursor motion along both axes since the previous sample.
///
/// Values are in host pixels after gain has been applied; they are not
/// rounded until the host integrates them against the absolute cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionDelta {
    pub dx: f64,
    pub dy: f64,
}

impl MotionDelta {
    /// The zero delta returned for baseline and duplicate-timestamp samples.
    pub const ZERO: MotionDelta = MotionDelta { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Returns `true` if both axes are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Returns `true` if either axis magnitude is strictly greater than `threshold`.
    ///
    /// Used twice in the pipeline: by the controller's dead-zone filter before
    /// sending, and by the host's minimum-move gate before moving the cursor.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.dx.abs() > threshold || self.dy.abs() > threshold
    }

    /// Scales both axes by the same factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }

    /// Euclidean length of the delta.
    pub fn magnitude(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

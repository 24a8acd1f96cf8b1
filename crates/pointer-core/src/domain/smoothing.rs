//! Exponential smoothing of host-side motion deltas.
//!
//! The host keeps a single [`SmoothingState`]: the most recent smoothed delta
//! and the instant it was produced.  Each inbound (already bounded) delta is
//! combined with that state according to a two-state machine keyed on the
//! time elapsed since the previous update:
//!
//! ```text
//!            gap > reset_gap (or no previous update)
//!   Idle ─────────────────────────────────────────────> Reset
//!                                                        │  gap <= reset_gap
//!                                                        v
//!   Reset <──────── gap > reset_gap ────────────── Smoothing ──┐
//!                                                        ^     │ gap <= reset_gap
//!                                                        └─────┘
//! ```
//!
//! - **Reset**: the state is overwritten with the input, no blending.  A new
//!   burst therefore never inherits motion from a gesture that ended earlier.
//! - **Smoothing**: `out = input * (1 - alpha) + previous * alpha` per axis.
//!
//! The state is a value type.  [`SmoothingState::advance`] returns the next
//! state instead of mutating in place so that the caller decides when (and
//! under which lock) to commit it.

use std::time::{Duration, Instant};

use super::boundary::BoundedDelta;
use super::delta::MotionDelta;

/// Default weight of the previous smoothed value.
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;
/// Default gap after which a new burst starts.
pub const DEFAULT_RESET_GAP: Duration = Duration::from_millis(100);

/// Tunables for the smoothing state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingConfig {
    /// Weight of the previous smoothed value, in `[0, 1)`.
    pub alpha: f64,
    /// Updates separated by more than this start a new burst.
    pub reset_gap: Duration,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING_ALPHA,
            reset_gap: DEFAULT_RESET_GAP,
        }
    }
}

/// Which transition an update took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingPhase {
    /// First update of a burst; the input was stored unblended.
    Reset,
    /// The input was blended with the previous smoothed value.
    Smoothing,
}

/// The host's most recent smoothed delta and when it was produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothingState {
    updated_at: Option<Instant>,
    value: MotionDelta,
}

/// Outcome of [`SmoothingState::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingStep {
    pub phase: SmoothingPhase,
    /// The smoothed delta to apply to the cursor.
    pub output: MotionDelta,
    /// The state to commit once the output has been applied.
    pub next: SmoothingState,
}

impl SmoothingState {
    /// A state that has never been updated.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.updated_at.is_none()
    }

    /// The last smoothed delta (zero while idle).
    pub fn value(&self) -> MotionDelta {
        self.value
    }

    pub fn updated_at(&self) -> Option<Instant> {
        self.updated_at
    }

    /// Decides the transition an update at `now` would take.
    ///
    /// An earlier `now` than the stored timestamp (requests that captured the
    /// clock before acquiring the state lock) counts as zero elapsed time.
    pub fn phase_at(&self, now: Instant, config: &SmoothingConfig) -> SmoothingPhase {
        match self.updated_at {
            None => SmoothingPhase::Reset,
            Some(at) if now.saturating_duration_since(at) > config.reset_gap => {
                SmoothingPhase::Reset
            }
            Some(_) => SmoothingPhase::Smoothing,
        }
    }

    /// Computes the smoothed output for `input` at `now` and the state that
    /// follows it.  `self` is left untouched.
    pub fn advance(
        &self,
        input: &BoundedDelta,
        now: Instant,
        config: &SmoothingConfig,
    ) -> SmoothingStep {
        let phase = self.phase_at(now, config);
        let input = input.delta();
        let output = match phase {
            SmoothingPhase::Reset => input,
            SmoothingPhase::Smoothing => blend(input, self.value, config.alpha),
        };
        // Keep the timestamp non-decreasing even if `now` is stale.
        let updated_at = match self.updated_at {
            Some(at) if at > now => at,
            _ => now,
        };
        SmoothingStep {
            phase,
            output,
            next: SmoothingState {
                updated_at: Some(updated_at),
                value: output,
            },
        }
    }
}

fn blend(input: MotionDelta, previous: MotionDelta, alpha: f64) -> MotionDelta {
    MotionDelta::new(
        input.dx * (1.0 - alpha) + previous.dx * alpha,
        input.dy * (1.0 - alpha) + previous.dy * alpha,
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! MotionIntegrator: turns untrusted network deltas into cursor moves.
//!
//! Per motion event:
//!
//! ```text
//! raw (dx, dy) ──validate/clamp──> BoundedDelta
//!              ──smoothing step──> smoothed delta        (state lock held
//!              ──read cursor────> current position        from here until
//!              ──round + add────> candidate position      the commit)
//!              ──min-move gate──> move_to(candidate)? -> landed position
//!              ──commit─────────> SmoothingState
//! ```
//!
//! The reported position is where the backend says the cursor landed, which
//! differs from the candidate when the backend pins it to the screen edge.
//!
//! The smoothing state lives behind a `Mutex` owned by the integrator.  The
//! lock is held for the whole read-modify-write, which also guarantees the
//! cursor never receives overlapping `move_to` calls.  The new state is only
//! written after every capability call for the event has succeeded, so a
//! failed request leaves it exactly as it was.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use pointer_core::domain::boundary::DEFAULT_MAX_DELTA;
use pointer_core::{
    BoundedDelta, ClickButton, CursorPosition, MotionDelta, SmoothingConfig, SmoothingPhase,
    SmoothingState,
};
use thiserror::Error;
use tracing::{debug, info};

use super::cursor_control::{CursorControl, CursorError};

/// Default minimum smoothed magnitude (either axis) that issues a move.
pub const DEFAULT_MIN_MOVE: f64 = 1.0;

/// Error type for integrator operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegratorError {
    /// The request payload is malformed or out of range.  Never touches state.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The host cursor primitive failed.  Never touches state.
    #[error(transparent)]
    CapabilityUnavailable(#[from] CursorError),
}

/// Tunables for the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    /// Per-axis clamp bound applied before smoothing.
    pub max_delta: f64,
    pub smoothing: SmoothingConfig,
    /// A move is only issued when the smoothed delta exceeds this on some axis.
    pub min_move: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_delta: DEFAULT_MAX_DELTA,
            smoothing: SmoothingConfig::default(),
            min_move: DEFAULT_MIN_MOVE,
        }
    }
}

/// What one motion event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    /// Where the cursor landed; the pre-event position when the move was
    /// gated.
    pub position: CursorPosition,
    /// The smoothed delta used for this event.
    pub applied: MotionDelta,
    pub phase: SmoothingPhase,
    /// Whether a `move_to` was issued.
    pub moved: bool,
    /// Whether the raw input was clamped.
    pub clamped: bool,
}

/// The host motion integrator.
pub struct MotionIntegrator {
    cursor: Arc<dyn CursorControl>,
    config: IntegratorConfig,
    state: Mutex<SmoothingState>,
}

impl MotionIntegrator {
    pub fn new(cursor: Arc<dyn CursorControl>, config: IntegratorConfig) -> Self {
        Self {
            cursor,
            config,
            state: Mutex::new(SmoothingState::idle()),
        }
    }

    /// A copy of the committed smoothing state.
    pub fn smoothing_state(&self) -> SmoothingState {
        *self.lock_state()
    }

    /// Handles one motion event stamped with the current time.
    ///
    /// # Errors
    ///
    /// - [`IntegratorError::InvalidInput`] if either axis is not finite.
    /// - [`IntegratorError::CapabilityUnavailable`] if reading or moving the
    ///   cursor fails.
    pub fn handle_motion(&self, raw_x: f64, raw_y: f64) -> Result<MotionOutcome, IntegratorError> {
        self.handle_motion_at(raw_x, raw_y, Instant::now())
    }

    /// Handles one motion event as if it arrived at `now`.
    pub fn handle_motion_at(
        &self,
        raw_x: f64,
        raw_y: f64,
        now: Instant,
    ) -> Result<MotionOutcome, IntegratorError> {
        let bounded = BoundedDelta::validate(raw_x, raw_y, self.config.max_delta)
            .map_err(|e| IntegratorError::InvalidInput(e.to_string()))?;
        let clamped = bounded.was_clamped(raw_x, raw_y);
        if clamped {
            debug!(raw_x, raw_y, bound = bounded.bound(), "motion delta clamped");
        }

        let mut state = self.lock_state();
        let step = state.advance(&bounded, now, &self.config.smoothing);
        let applied = step.output;

        let current = self.cursor.position()?;
        let candidate = CursorPosition::new(
            current.x.saturating_add(round_half_up(applied.dx)),
            current.y.saturating_add(round_half_up(applied.dy)),
        );

        let moved = applied.exceeds(self.config.min_move);
        let position = if moved {
            self.cursor.move_to(candidate.x, candidate.y)?
        } else {
            current
        };

        *state = step.next;
        drop(state);

        debug!(
            phase = ?step.phase,
            dx = applied.dx,
            dy = applied.dy,
            x = position.x,
            y = position.y,
            moved,
            "motion applied"
        );

        Ok(MotionOutcome {
            position,
            applied,
            phase: step.phase,
            moved,
            clamped,
        })
    }

    /// Validates `kind` and clicks the matching button.
    ///
    /// Only `"left"` and `"right"` are accepted; anything else is rejected
    /// before the cursor is touched.
    pub fn handle_click(&self, kind: &str) -> Result<ClickButton, IntegratorError> {
        let button = kind
            .parse::<ClickButton>()
            .map_err(|e| IntegratorError::InvalidInput(e.to_string()))?;
        self.cursor.click(button)?;
        info!(%button, "click performed");
        Ok(button)
    }

    /// Connectivity probe: proves the cursor capability is reachable.
    pub fn query_status(&self) -> Result<CursorPosition, IntegratorError> {
        Ok(self.cursor.position()?)
    }

    pub fn query_position(&self) -> Result<CursorPosition, IntegratorError> {
        Ok(self.cursor.position()?)
    }

    // The state is a plain value that is only replaced wholesale, so a
    // poisoned lock still holds a consistent state.
    fn lock_state(&self) -> MutexGuard<'_, SmoothingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Rounds to the nearest integer, with halves going towards +∞.
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Client motion sampler: turns a touch-drag gesture into motion deltas.
//!
//! The sampler keeps exactly one reference sample (the last observed touch
//! position) and produces one [`MotionDelta`] per touch-move callback:
//!
//! ```text
//! raw      = current - last
//! speed    = |raw| / elapsed_ms
//! boost    = clamp(speed * speed_scale, min_speed_multiplier, max_speed_multiplier)
//! delta    = raw * sensitivity * boost
//! ```
//!
//! Fast flicks therefore travel further than slow drags of the same length,
//! and slow jittery motion is damped.
//!
//! # Zero-motion cases
//!
//! The first move of a gesture only establishes the baseline (the touch-down
//! point is usually offset from where the finger settles), and a move with
//! zero elapsed time cannot produce a speed.  Both return [`MotionDelta::ZERO`];
//! neither is an error.
//!
//! # Threading
//!
//! Touch callbacks are delivered one at a time by the UI event loop, so the
//! sampler is a plain `&mut self` state machine with no interior locking.

use super::delta::MotionDelta;
use super::sensitivity::{
    SensitivityGain, DEFAULT_SENSITIVITY, MAX_SENSITIVITY, MIN_SENSITIVITY, SENSITIVITY_STEP,
};

/// A single observed touch position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub x: f64,
    pub y: f64,
    /// Milliseconds on the controller's monotonic clock.
    pub timestamp_ms: u64,
}

impl TouchSample {
    pub fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self { x, y, timestamp_ms }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Tunables for the sampler and the controller's transport policy.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Gain a new sampler starts with.
    pub initial_sensitivity: f64,
    pub min_sensitivity: f64,
    pub max_sensitivity: f64,
    /// Multiplicative factor of one sensitivity adjustment.
    pub sensitivity_step: f64,
    pub min_speed_multiplier: f64,
    pub max_speed_multiplier: f64,
    /// Converts pixels-per-millisecond into a speed multiplier.
    pub speed_scale: f64,
    /// Deltas with both axes at or below this magnitude are never sent.
    pub dead_zone: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            initial_sensitivity: DEFAULT_SENSITIVITY,
            min_sensitivity: MIN_SENSITIVITY,
            max_sensitivity: MAX_SENSITIVITY,
            sensitivity_step: SENSITIVITY_STEP,
            min_speed_multiplier: 0.5,
            max_speed_multiplier: 2.0,
            speed_scale: 10.0,
            dead_zone: 0.1,
        }
    }
}

/// Converts touch callbacks into gain-adjusted motion deltas.
#[derive(Debug, Clone)]
pub struct MotionSampler {
    config: SamplerConfig,
    gain: SensitivityGain,
    start: Option<TouchSample>,
    last: Option<TouchSample>,
    tracking: bool,
    awaiting_first_move: bool,
}

impl MotionSampler {
    /// Creates an idle sampler whose gain starts at `config.initial_sensitivity`.
    pub fn new(config: SamplerConfig) -> Self {
        let gain = SensitivityGain::new(
            config.initial_sensitivity,
            config.min_sensitivity,
            config.max_sensitivity,
            config.sensitivity_step,
        );
        Self {
            config,
            gain,
            start: None,
            last: None,
            tracking: false,
            awaiting_first_move: false,
        }
    }

    /// Current sensitivity gain.
    pub fn sensitivity(&self) -> f64 {
        self.gain.value()
    }

    /// Returns `true` between `on_touch_start` and `on_touch_end`.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// The sample that opened the current gesture, if any.
    pub fn gesture_start(&self) -> Option<TouchSample> {
        self.start
    }

    /// The reference sample the next delta is computed against, if any.
    pub fn last_sample(&self) -> Option<TouchSample> {
        self.last
    }

    /// Begins a new gesture at `sample`, discarding any previous tracking state.
    pub fn on_touch_start(&mut self, sample: TouchSample) {
        self.start = Some(sample);
        self.last = Some(sample);
        self.tracking = true;
        self.awaiting_first_move = true;
    }

    /// Computes the motion delta for a touch-move callback.
    ///
    /// Always replaces the reference sample with `sample` (unless the sample
    /// is non-finite, which is dropped), including the cases that return a
    /// zero delta.
    ///
    /// The first move of a gesture only sets the baseline: the distance from
    /// the touch-start point is never transmitted, however far the finger
    /// travelled before the first callback.
    pub fn on_touch_move(&mut self, sample: TouchSample) -> MotionDelta {
        if !sample.is_finite() {
            return MotionDelta::ZERO;
        }

        let previous = self.last.replace(sample);
        if std::mem::take(&mut self.awaiting_first_move) {
            return MotionDelta::ZERO;
        }
        let Some(last) = previous else {
            return MotionDelta::ZERO;
        };

        // A timestamp that went backwards is treated like a duplicate event.
        let elapsed_ms = sample.timestamp_ms.saturating_sub(last.timestamp_ms);
        if elapsed_ms == 0 {
            return MotionDelta::ZERO;
        }

        let raw = MotionDelta::new(sample.x - last.x, sample.y - last.y);
        let speed = raw.magnitude() / elapsed_ms as f64;
        raw.scaled(self.gain.value() * self.speed_multiplier(speed))
    }

    /// Ends the gesture; the next gesture starts with no residual velocity.
    pub fn on_touch_end(&mut self) {
        self.start = None;
        self.last = None;
        self.tracking = false;
        self.awaiting_first_move = false;
    }

    /// Steps the sensitivity gain up or down and returns the new value.
    pub fn adjust_sensitivity(&mut self, increase: bool) -> f64 {
        self.gain.adjust(increase)
    }

    /// Dead-zone filter: `true` when `delta` is large enough to send.
    pub fn should_transmit(&self, delta: &MotionDelta) -> bool {
        delta.exceeds(self.config.dead_zone)
    }

    fn speed_multiplier(&self, speed: f64) -> f64 {
        (speed * self.config.speed_scale).clamp(
            self.config.min_speed_multiplier,
            self.config.max_speed_multiplier,
        )
    }
}

impl Default for MotionSampler {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

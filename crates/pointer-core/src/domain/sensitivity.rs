//! User-adjustable sensitivity gain applied by the controller.
//!
//! The gain is a plain multiplier on every motion delta.  The user nudges it up
//! or down in fixed multiplicative steps, so each press changes the pointer
//! speed by the same *ratio* no matter where the gain currently sits.

/// Lower bound of the sensitivity gain.
pub const MIN_SENSITIVITY: f64 = 0.5;
/// Upper bound of the sensitivity gain.
pub const MAX_SENSITIVITY: f64 = 5.0;
/// Factor applied (or divided out) by one adjustment step.
pub const SENSITIVITY_STEP: f64 = 1.2;
/// Gain a fresh controller session starts with.
pub const DEFAULT_SENSITIVITY: f64 = 1.5;

/// A sensitivity multiplier that always lies within its configured bounds.
///
/// The bounds are stored alongside the value so that [`SensitivityGain::adjust`]
/// can re-clamp after every step without consulting external configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityGain {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl SensitivityGain {
    /// Creates a gain, clamping `initial` into `[min, max]`.
    ///
    /// A non-finite `initial` falls back to `min`.  If `min > max` the two are
    /// swapped so the invariant `min <= value <= max` still holds.
    pub fn new(initial: f64, min: f64, max: f64, step: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let value = if initial.is_finite() { initial } else { min };
        Self {
            value: value.clamp(min, max),
            min,
            max,
            step,
        }
    }

    /// Current multiplier.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Lower and upper bounds, in that order.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Multiplies (`increase = true`) or divides the gain by the step factor,
    /// clamps it to its bounds, and returns the new value for display.
    pub fn adjust(&mut self, increase: bool) -> f64 {
        let next = if increase {
            self.value * self.step
        } else {
            self.value / self.step
        };
        if next.is_finite() {
            self.value = next.clamp(self.min, self.max);
        }
        self.value
    }
}

impl Default for SensitivityGain {
    fn default() -> Self {
        Self::new(
            DEFAULT_SENSITIVITY,
            MIN_SENSITIVITY,
            MAX_SENSITIVITY,
            SENSITIVITY_STEP,
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Application layer: the integrator use case and the cursor capability it
//! depends on.

pub mod cursor_control;
pub mod integrate_motion;

pub use cursor_control::{CursorControl, CursorError};
pub use integrate_motion::{IntegratorConfig, IntegratorError, MotionIntegrator, MotionOutcome};

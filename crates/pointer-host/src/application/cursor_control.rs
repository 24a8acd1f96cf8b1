//! The host's cursor capability.
//!
//! The integrator never talks to the operating system directly.  Everything it
//! needs from the host environment goes through [`CursorControl`], which has a
//! native implementation per platform in `infrastructure::cursor` and a
//! recording mock for tests.

use pointer_core::{ClickButton, CursorPosition};
use thiserror::Error;

/// Error type for cursor capability calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The cursor primitive could not be reached or was never initialised.
    #[error("cursor control unavailable: {0}")]
    Unavailable(String),
    /// The OS accepted the call but reported a failure.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Synchronous access to the host's pointer.
///
/// Calls are assumed non-reentrant; the integrator never issues two moves at
/// the same time.
pub trait CursorControl: Send + Sync {
    /// Reads the current absolute cursor position.
    fn position(&self) -> Result<CursorPosition, CursorError>;

    /// Moves the cursor towards an absolute position and returns where it
    /// landed.  Backends that pin the pointer to the screen report the pinned
    /// point, not the requested one.
    fn move_to(&self, x: i32, y: i32) -> Result<CursorPosition, CursorError>;

    /// Presses and releases `button` at the current position.
    fn click(&self, button: ClickButton) -> Result<(), CursorError>;
}

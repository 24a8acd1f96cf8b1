//! Placeholder used when no cursor backend could be opened.
//!
//! The host still binds and answers requests so the controller gets a clear
//! server error from `/test` instead of a refused connection.

use pointer_core::{ClickButton, CursorPosition};

use crate::application::cursor_control::{CursorControl, CursorError};

/// A cursor whose every call fails with the reason the real one is missing.
#[derive(Debug, Clone)]
pub struct UnavailableCursor {
    reason: String,
}

impl UnavailableCursor {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn fail<T>(&self) -> Result<T, CursorError> {
        Err(CursorError::Unavailable(self.reason.clone()))
    }
}

impl CursorControl for UnavailableCursor {
    fn position(&self) -> Result<CursorPosition, CursorError> {
        self.fail()
    }

    fn move_to(&self, _x: i32, _y: i32) -> Result<CursorPosition, CursorError> {
        self.fail()
    }

    fn click(&self, _button: ClickButton) -> Result<(), CursorError> {
        self.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_call_reports_the_reason() {
        let cursor = UnavailableCursor::new("no display");
        let expected = Err(CursorError::Unavailable("no display".into()));
        assert_eq!(cursor.position(), expected);
        assert_eq!(cursor.move_to(1, 2), Err(CursorError::Unavailable("no display".into())));
        assert_eq!(cursor.click(ClickButton::Left), Err(CursorError::Unavailable("no display".into())));
    }
}

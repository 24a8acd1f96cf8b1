//! In-memory cursor for dry runs.
//!
//! Tracks a position on an imaginary screen of a fixed size and logs every
//! move and click instead of injecting them.  Useful for trying the host on a
//! headless machine or with a controller you do not trust yet.

use std::sync::Mutex;

use pointer_core::{ClickButton, CursorPosition};
use tracing::info;

use crate::application::cursor_control::{CursorControl, CursorError};

/// A cursor confined to a `width` × `height` screen, starting at its centre.
#[derive(Debug)]
pub struct VirtualCursor {
    width: i32,
    height: i32,
    position: Mutex<CursorPosition>,
}

impl VirtualCursor {
    pub fn new(width: u32, height: u32) -> Self {
        let width = i32::try_from(width.max(1)).unwrap_or(i32::MAX);
        let height = i32::try_from(height.max(1)).unwrap_or(i32::MAX);
        Self {
            width,
            height,
            position: Mutex::new(CursorPosition::new(width / 2, height / 2)),
        }
    }

    pub fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CursorPosition>, CursorError> {
        self.position
            .lock()
            .map_err(|_| CursorError::Platform("virtual cursor lock poisoned".into()))
    }
}

impl CursorControl for VirtualCursor {
    fn position(&self) -> Result<CursorPosition, CursorError> {
        Ok(*self.lock()?)
    }

    /// Moves to `(x, y)`, pinned to the screen edges like a real pointer.
    fn move_to(&self, x: i32, y: i32) -> Result<CursorPosition, CursorError> {
        let clamped = CursorPosition::new(x.clamp(0, self.width - 1), y.clamp(0, self.height - 1));
        *self.lock()? = clamped;
        Ok(clamped)
    }

    fn click(&self, button: ClickButton) -> Result<(), CursorError> {
        let at = self.position()?;
        info!(%button, x = at.x, y = at.y, "virtual click");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

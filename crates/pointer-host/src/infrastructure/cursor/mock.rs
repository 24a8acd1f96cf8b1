//! Recording cursor for tests.
//!
//! `MockCursor` keeps a position in memory, moves it when asked, and records
//! every call in a `Mutex<Vec<_>>` so tests can assert exactly what the
//! integrator asked the host to do, and in what order.
//!
//! ```ignore
//! let cursor = Arc::new(MockCursor::at(100, 200));
//! let integrator = MotionIntegrator::new(Arc::clone(&cursor) as Arc<dyn CursorControl>, cfg);
//!
//! integrator.handle_motion(10.0, 0.0).unwrap();
//!
//! assert_eq!(cursor.moves(), vec![(110, 200)]);
//! ```
//!
//! # Failure flags
//!
//! `should_fail` makes every call return [`CursorError::Unavailable`].
//! `fail_moves` only fails `move_to`, which lets tests exercise a failure
//! after the position read has already succeeded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pointer_core::{ClickButton, CursorPosition};

use crate::application::cursor_control::{CursorControl, CursorError};

/// A cursor that records calls without touching the OS.
#[derive(Debug, Default)]
pub struct MockCursor {
    /// Current position, updated by successful `move_to` calls.
    pub position: Mutex<CursorPosition>,
    /// Every `(x, y)` passed to `move_to`, in call order.
    pub moves: Mutex<Vec<(i32, i32)>>,
    /// Every button passed to `click`, in call order.
    pub clicks: Mutex<Vec<ClickButton>>,
    /// Number of `position` calls.
    pub position_reads: AtomicUsize,
    pub should_fail: bool,
    pub fail_moves: bool,
}

impl MockCursor {
    /// Creates a mock cursor at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock cursor at `(x, y)`.
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: Mutex::new(CursorPosition::new(x, y)),
            ..Self::default()
        }
    }

    /// Creates a mock cursor whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of recorded moves.
    pub fn moves(&self) -> Vec<(i32, i32)> {
        lock(&self.moves).clone()
    }

    /// Snapshot of recorded clicks.
    pub fn clicks(&self) -> Vec<ClickButton> {
        lock(&self.clicks).clone()
    }

    pub fn current(&self) -> CursorPosition {
        *lock(&self.position)
    }

    fn check(&self) -> Result<(), CursorError> {
        if self.should_fail {
            return Err(CursorError::Unavailable("mock failure".into()));
        }
        Ok(())
    }
}

impl CursorControl for MockCursor {
    fn position(&self) -> Result<CursorPosition, CursorError> {
        self.check()?;
        self.position_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.current())
    }

    fn move_to(&self, x: i32, y: i32) -> Result<CursorPosition, CursorError> {
        self.check()?;
        if self.fail_moves {
            return Err(CursorError::Platform("mock move failure".into()));
        }
        lock(&self.moves).push((x, y));
        let landed = CursorPosition::new(x, y);
        *lock(&self.position) = landed;
        Ok(landed)
    }

    fn click(&self, button: ClickButton) -> Result<(), CursorError> {
        self.check()?;
        lock(&self.clicks).push(button);
        Ok(())
    }
}

// A panicking test thread must not hide the calls it already recorded.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

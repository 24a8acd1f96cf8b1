//! Cursor backends.
//!
//! The native backend is selected at compile time via `#[cfg(target_os = ...)]`.
//! On Linux it additionally needs the `x11` cargo feature.

use std::sync::Arc;

use crate::application::cursor_control::{CursorControl, CursorError};

pub mod mock;
pub mod unavailable;
pub mod virtual_cursor;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(all(target_os = "linux", feature = "x11"))]
pub mod linux;

#[cfg(target_os = "macos")]
pub mod macos;

pub use mock::MockCursor;
pub use unavailable::UnavailableCursor;
pub use virtual_cursor::VirtualCursor;

/// Opens the platform's real cursor.
#[cfg(target_os = "windows")]
pub fn open_native() -> Result<Arc<dyn CursorControl>, CursorError> {
    Ok(Arc::new(windows::WindowsCursor::new()?))
}

/// Opens the platform's real cursor.
#[cfg(all(target_os = "linux", feature = "x11"))]
pub fn open_native() -> Result<Arc<dyn CursorControl>, CursorError> {
    Ok(Arc::new(linux::X11Cursor::open()?))
}

/// Opens the platform's real cursor.
#[cfg(target_os = "macos")]
pub fn open_native() -> Result<Arc<dyn CursorControl>, CursorError> {
    Ok(Arc::new(macos::MacosCursor::new()?))
}

/// Opens the platform's real cursor.
#[cfg(not(any(
    target_os = "windows",
    target_os = "macos",
    all(target_os = "linux", feature = "x11")
)))]
pub fn open_native() -> Result<Arc<dyn CursorControl>, CursorError> {
    Err(CursorError::Unavailable(
        "no native cursor backend in this build (on Linux, enable the `x11` feature)".into(),
    ))
}

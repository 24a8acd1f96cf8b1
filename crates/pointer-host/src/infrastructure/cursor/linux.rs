//! Linux X11 cursor control via Xlib and the XTest extension.
//!
//! - `XQueryPointer` on the root window reads the absolute position.
//! - `XTestFakeMotionEvent` moves the pointer to absolute root coordinates.
//! - `XTestFakeButtonEvent` presses and releases buttons 1 (left) and 3 (right).
//!
//! The display connection is opened once and kept behind a `Mutex`; Xlib
//! connections are not thread-safe, and the integrator already serialises
//! moves, so one lock around the pointer is enough.
//!
//! # Permissions
//!
//! The process needs access to the X display named by `DISPLAY`.  If that is
//! unset or the server refuses the connection, [`X11Cursor::open`] fails with
//! [`CursorError::Unavailable`] and the host keeps running without cursor
//! control.

use std::os::raw::{c_int, c_uint, c_ulong};
use std::ptr;
use std::sync::{Mutex, MutexGuard};

use pointer_core::{ClickButton, CursorPosition};
use x11::{xlib, xtest};

use crate::application::cursor_control::{CursorControl, CursorError};

// ── X11 constants ─────────────────────────────────────────────────────────────

/// `CurrentTime` for XTest delays: deliver immediately.
const CURRENT_TIME: c_ulong = 0;

/// `-1` tells `XTestFakeMotionEvent` to use the screen holding the pointer.
const SCREEN_DEFAULT: c_int = -1;

const BUTTON_LEFT: c_uint = 1;
const BUTTON_RIGHT: c_uint = 3;

struct DisplayHandle(*mut xlib::Display);

// SAFETY: the raw display pointer is only dereferenced by Xlib while the
// owning Mutex is held, so it is never used from two threads at once.
unsafe impl Send for DisplayHandle {}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        // SAFETY: the pointer came from XOpenDisplay and is closed exactly once
        unsafe {
            xlib::XCloseDisplay(self.0);
        }
    }
}

/// X11/XTest implementation of [`CursorControl`].
pub struct X11Cursor {
    display: Mutex<DisplayHandle>,
}

impl X11Cursor {
    /// Opens the default display and checks that XTest is available.
    pub fn open() -> Result<Self, CursorError> {
        // SAFETY: a null name means "use $DISPLAY"
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(CursorError::Unavailable(
                "cannot open X display (is DISPLAY set?)".into(),
            ));
        }
        let handle = DisplayHandle(display);

        let (mut event_base, mut error_base, mut major, mut minor) = (0, 0, 0, 0);
        // SAFETY: display is a live connection and the out-params are valid
        let has_xtest = unsafe {
            xtest::XTestQueryExtension(
                handle.0,
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        };
        if has_xtest == 0 {
            return Err(CursorError::Unavailable(
                "X server does not support the XTest extension".into(),
            ));
        }

        Ok(Self {
            display: Mutex::new(handle),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, DisplayHandle>, CursorError> {
        self.display
            .lock()
            .map_err(|_| CursorError::Unavailable("X display lock poisoned".into()))
    }
}

impl CursorControl for X11Cursor {
    fn position(&self) -> Result<CursorPosition, CursorError> {
        let display = self.lock()?;
        let (mut root_ret, mut child_ret) = (0, 0);
        let (mut root_x, mut root_y, mut win_x, mut win_y) = (0, 0, 0, 0);
        let mut mask: c_uint = 0;
        // SAFETY: display is a live connection; every out-param is a valid local
        let same_screen = unsafe {
            let root = xlib::XDefaultRootWindow(display.0);
            xlib::XQueryPointer(
                display.0,
                root,
                &mut root_ret,
                &mut child_ret,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            )
        };
        if same_screen == 0 {
            return Err(CursorError::Platform(
                "pointer is not on the default screen".into(),
            ));
        }
        Ok(CursorPosition::new(root_x, root_y))
    }

    fn move_to(&self, x: i32, y: i32) -> Result<CursorPosition, CursorError> {
        {
            let display = self.lock()?;
            // SAFETY: display is a live connection
            unsafe {
                xtest::XTestFakeMotionEvent(display.0, SCREEN_DEFAULT, x, y, CURRENT_TIME);
                xlib::XFlush(display.0);
            }
        }
        // XQueryPointer is a round trip, so the server has already applied
        // (and clipped) the fake motion when it answers.
        self.position()
    }

    fn click(&self, button: ClickButton) -> Result<(), CursorError> {
        let code = match button {
            ClickButton::Left => BUTTON_LEFT,
            ClickButton::Right => BUTTON_RIGHT,
        };
        let display = self.lock()?;
        // SAFETY: display is a live connection
        unsafe {
            xtest::XTestFakeButtonEvent(display.0, code, xlib::True, CURRENT_TIME);
            xtest::XTestFakeButtonEvent(display.0, code, xlib::False, CURRENT_TIME);
            xlib::XFlush(display.0);
        }
        Ok(())
    }
}

//! Windows cursor control.
//!
//! Position reads and absolute moves use `GetCursorPos` / `SetCursorPos`,
//! which work in virtual-screen pixels directly and need no normalisation.
//! Clicks are a down/up pair injected in one `SendInput` call so no other
//! input can interleave between them.

use pointer_core::{ClickButton, CursorPosition};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEINPUT, MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use crate::application::cursor_control::{CursorControl, CursorError};

/// Windows implementation of [`CursorControl`].
#[derive(Debug, Default)]
pub struct WindowsCursor;

impl WindowsCursor {
    /// Creates the backend and checks that the cursor can be read.
    pub fn new() -> Result<Self, CursorError> {
        let cursor = Self;
        cursor.position()?;
        Ok(cursor)
    }
}

impl CursorControl for WindowsCursor {
    fn position(&self) -> Result<CursorPosition, CursorError> {
        let mut point = POINT::default();
        // SAFETY: point is a valid, writable POINT on the stack
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| CursorError::Unavailable(format!("GetCursorPos failed: {e}")))?;
        Ok(CursorPosition::new(point.x, point.y))
    }

    fn move_to(&self, x: i32, y: i32) -> Result<CursorPosition, CursorError> {
        // SAFETY: SetCursorPos takes plain integers
        unsafe { SetCursorPos(x, y) }
            .map_err(|e| CursorError::Platform(format!("SetCursorPos failed: {e}")))?;
        // SetCursorPos clips to the virtual screen.
        self.position()
    }

    fn click(&self, button: ClickButton) -> Result<(), CursorError> {
        let (down, up) = match button {
            ClickButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            ClickButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
        };
        let inputs = [button_input(down), button_input(up)];
        // SAFETY: inputs is a valid array of INPUT structures
        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            return Err(CursorError::Platform(format!(
                "SendInput injected {sent} of {} events",
                inputs.len()
            )));
        }
        Ok(())
    }
}

fn button_input(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

//! macOS cursor control via CoreGraphics events.
//!
//! The current position is the location of an empty event created from a
//! `HIDSystemState` source.  Moves and clicks are synthesized mouse events
//! posted at the HID tap, the same level as physical input.
//!
//! CoreGraphics event coordinates use a top-left origin on the main display,
//! which matches the other backends, so no flipping is needed.
//!
//! # Accessibility permission
//!
//! Posting events requires the Accessibility permission (System Settings →
//! Privacy & Security → Accessibility).  Without it the post is silently
//! dropped by the OS; position reads still work.

use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use pointer_core::{ClickButton, CursorPosition};

use crate::application::cursor_control::{CursorControl, CursorError};

/// CoreGraphics implementation of [`CursorControl`].
///
/// Event sources are CoreFoundation objects that are not `Send`, so one is
/// created per call instead of being stored.
#[derive(Debug, Default)]
pub struct MacosCursor;

impl MacosCursor {
    /// Creates the backend and checks that an event source can be created.
    pub fn new() -> Result<Self, CursorError> {
        source()?;
        Ok(Self)
    }
}

impl CursorControl for MacosCursor {
    fn position(&self) -> Result<CursorPosition, CursorError> {
        let event = CGEvent::new(source()?)
            .map_err(|_| CursorError::Platform("CGEventCreate failed".into()))?;
        let point = event.location();
        Ok(CursorPosition::new(point.x.round() as i32, point.y.round() as i32))
    }

    fn move_to(&self, x: i32, y: i32) -> Result<CursorPosition, CursorError> {
        let point = CGPoint::new(f64::from(x), f64::from(y));
        post_mouse(CGEventType::MouseMoved, point, CGMouseButton::Left)?;
        // Posted events are delivered asynchronously; reading back here could
        // observe the previous location.
        Ok(CursorPosition::new(x, y))
    }

    fn click(&self, button: ClickButton) -> Result<(), CursorError> {
        let point = {
            let p = self.position()?;
            CGPoint::new(f64::from(p.x), f64::from(p.y))
        };
        let (down, up, cg_button) = match button {
            ClickButton::Left => (
                CGEventType::LeftMouseDown,
                CGEventType::LeftMouseUp,
                CGMouseButton::Left,
            ),
            ClickButton::Right => (
                CGEventType::RightMouseDown,
                CGEventType::RightMouseUp,
                CGMouseButton::Right,
            ),
        };
        post_mouse(down, point, cg_button)?;
        post_mouse(up, point, cg_button)
    }
}

fn source() -> Result<CGEventSource, CursorError> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|_| CursorError::Unavailable("cannot create CoreGraphics event source".into()))
}

fn post_mouse(kind: CGEventType, point: CGPoint, button: CGMouseButton) -> Result<(), CursorError> {
    let code = kind as u32;
    let event = CGEvent::new_mouse_event(source()?, kind, point, button)
        .map_err(|_| CursorError::Platform(format!("cannot create mouse event of type {code}")))?;
    event.post(CGEventTapLocation::HID);
    Ok(())
}

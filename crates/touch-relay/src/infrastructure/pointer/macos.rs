//! macOS pointer actuation via CoreGraphics events.
//!
//! # How CoreGraphics injection works (for beginners)
//!
//! `CGEventPost` injects a synthesized event into the HID event stream, the
//! same level as physical mouse input.  A mouse event always carries a
//! position, so button events need to know where the cursor currently is, and
//! motion while the button is held must be sent as a *drag* rather than a
//! plain move or applications will not see a drag gesture.  The actuator keeps
//! the last position and button state for that reason.
//!
//! Quartz event coordinates place the origin at the top-left of the main
//! display, matching the destination rectangle convention.
//!
//! # Accessibility permission
//!
//! Posting at the HID tap requires the Accessibility permission (System
//! Settings → Privacy & Security → Accessibility).  Without it the events are
//! silently dropped.

#![cfg(target_os = "macos")]

use std::sync::Mutex;

use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;

use crate::application::relay_touch::{ActuationError, PointerActuator};

#[derive(Debug, Clone, Copy)]
struct CursorState {
    position: CGPoint,
    pressed: bool,
}

/// CoreGraphics-backed [`PointerActuator`].
pub struct CoreGraphicsActuator {
    cursor: Mutex<CursorState>,
}

impl CoreGraphicsActuator {
    /// Checks that an HID event source can be created.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError::NotInitialized`] if CoreGraphics refuses to
    /// create an event source.
    pub fn new() -> Result<Self, ActuationError> {
        event_source().map_err(|e| ActuationError::NotInitialized(e.to_string()))?;
        Ok(Self {
            cursor: Mutex::new(CursorState {
                position: CGPoint::new(0.0, 0.0),
                pressed: false,
            }),
        })
    }

    fn with_cursor<F>(&self, update: F) -> Result<(), ActuationError>
    where
        F: FnOnce(&mut CursorState) -> (CGEventType, CGPoint),
    {
        let mut cursor = self
            .cursor
            .lock()
            .map_err(|_| ActuationError::Platform("cursor state lock poisoned".to_string()))?;
        let (event_type, position) = update(&mut cursor);
        post(event_type, position)
    }
}

impl PointerActuator for CoreGraphicsActuator {
    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError> {
        self.with_cursor(|cursor| {
            cursor.position = CGPoint::new(f64::from(x), f64::from(y));
            let event_type = if cursor.pressed {
                CGEventType::LeftMouseDragged
            } else {
                CGEventType::MouseMoved
            };
            (event_type, cursor.position)
        })
    }

    fn mouse_down(&self) -> Result<(), ActuationError> {
        self.with_cursor(|cursor| {
            cursor.pressed = true;
            (CGEventType::LeftMouseDown, cursor.position)
        })
    }

    fn mouse_up(&self) -> Result<(), ActuationError> {
        self.with_cursor(|cursor| {
            cursor.pressed = false;
            (CGEventType::LeftMouseUp, cursor.position)
        })
    }
}

fn event_source() -> Result<CGEventSource, ActuationError> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|()| ActuationError::Platform("CGEventSourceCreate failed".to_string()))
}

fn post(event_type: CGEventType, position: CGPoint) -> Result<(), ActuationError> {
    let source = event_source()?;
    let event = CGEvent::new_mouse_event(source, event_type, position, CGMouseButton::Left)
        .map_err(|()| ActuationError::Platform("CGEventCreateMouseEvent failed".to_string()))?;
    event.post(CGEventTapLocation::HID);
    Ok(())
}

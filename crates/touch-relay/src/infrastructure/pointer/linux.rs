//! Linux X11 pointer actuation via the XTest extension.
//!
//! # What is XTest? (for beginners)
//!
//! XTest is an X11 protocol extension that lets a process synthesize input as
//! if the user had physically used the hardware.  The receiving application
//! cannot tell the difference.  Two calls are enough for a touch relay:
//!
//! - `XTestFakeMotionEvent(display, screen, x, y, delay)` – move the cursor to
//!   absolute pixel coordinates.
//! - `XTestFakeButtonEvent(display, button, is_press, delay)` – press or
//!   release a mouse button.
//!
//! XTest calls are buffered by Xlib; `XFlush` pushes them to the server so the
//! cursor moves immediately rather than at the next round trip.
//!
//! # Threading
//!
//! An Xlib `Display` connection is not thread-safe.  The actuator keeps it
//! behind a `Mutex` so the `Send + Sync` contract of [`PointerActuator`] holds.
//!
//! # Permissions
//!
//! The process must be able to open the display named by `DISPLAY`.  If it
//! cannot, construction fails with `ActuationError::NotInitialized`.

use std::ptr::NonNull;
use std::sync::Mutex;

use x11::{xlib, xtest};

use crate::application::relay_touch::{ActuationError, PointerActuator};

// ── X11 constants ─────────────────────────────────────────────────────────────

/// `CurrentTime`: deliver the synthetic event without delay.
const CURRENT_TIME: std::os::raw::c_ulong = 0;

/// `-1` selects the screen that currently contains the pointer.
const SCREEN_DEFAULT: std::os::raw::c_int = -1;

/// X11 button number of the primary (left) button.
const BUTTON_LEFT: std::os::raw::c_uint = 1;

/// An open Xlib connection.
struct DisplayHandle(NonNull<xlib::Display>);

// SAFETY: the handle is only used while holding `XTestActuator::display`'s
// lock, so no two threads touch the connection at once.
unsafe impl Send for DisplayHandle {}

/// XTest-backed [`PointerActuator`].
pub struct XTestActuator {
    display: Mutex<DisplayHandle>,
}

impl XTestActuator {
    /// Opens the default X display and checks for the XTest extension.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError::NotInitialized`] if the display cannot be
    /// opened or the server lacks XTest.
    pub fn new() -> Result<Self, ActuationError> {
        // SAFETY: a null name means "use $DISPLAY"; the result is checked below.
        let raw = unsafe { xlib::XOpenDisplay(std::ptr::null()) };
        let display = NonNull::new(raw).ok_or_else(|| {
            let display_env =
                std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
            ActuationError::NotInitialized(format!("XOpenDisplay failed; DISPLAY={display_env}"))
        })?;

        let (mut event_base, mut error_base, mut major, mut minor) = (0, 0, 0, 0);
        // SAFETY: `display` is a live connection and the out-params are valid.
        let has_xtest = unsafe {
            xtest::XTestQueryExtension(
                display.as_ptr(),
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        };
        if has_xtest == 0 {
            // SAFETY: closing the connection we just opened.
            unsafe { xlib::XCloseDisplay(display.as_ptr()) };
            return Err(ActuationError::NotInitialized(
                "X server does not support the XTest extension".to_string(),
            ));
        }
        tracing::debug!("XTest {major}.{minor} available");

        Ok(Self {
            display: Mutex::new(DisplayHandle(display)),
        })
    }

    /// Runs one XTest request and flushes it to the server.
    fn submit<F>(&self, what: &str, request: F) -> Result<(), ActuationError>
    where
        F: FnOnce(*mut xlib::Display) -> std::os::raw::c_int,
    {
        let guard = self
            .display
            .lock()
            .map_err(|_| ActuationError::Platform("X display lock poisoned".to_string()))?;
        let display = guard.0.as_ptr();

        if request(display) == 0 {
            return Err(ActuationError::Platform(format!("{what} was rejected")));
        }
        // SAFETY: `display` is live for as long as the guard is held.
        unsafe { xlib::XFlush(display) };
        Ok(())
    }
}

impl Drop for XTestActuator {
    fn drop(&mut self) {
        if let Ok(guard) = self.display.get_mut() {
            // SAFETY: the connection was opened in `new` and is closed once.
            unsafe { xlib::XCloseDisplay(guard.0.as_ptr()) };
        }
    }
}

impl PointerActuator for XTestActuator {
    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError> {
        self.submit("XTestFakeMotionEvent", |display| {
            // SAFETY: `display` is a live connection guarded by the mutex.
            unsafe { xtest::XTestFakeMotionEvent(display, SCREEN_DEFAULT, x, y, CURRENT_TIME) }
        })
    }

    fn mouse_down(&self) -> Result<(), ActuationError> {
        self.submit("XTestFakeButtonEvent(press)", |display| {
            // SAFETY: as above.
            unsafe { xtest::XTestFakeButtonEvent(display, BUTTON_LEFT, xlib::True, CURRENT_TIME) }
        })
    }

    fn mouse_up(&self) -> Result<(), ActuationError> {
        self.submit("XTestFakeButtonEvent(release)", |display| {
            // SAFETY: as above.
            unsafe { xtest::XTestFakeButtonEvent(display, BUTTON_LEFT, xlib::False, CURRENT_TIME) }
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

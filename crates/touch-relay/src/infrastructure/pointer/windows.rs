//! Windows pointer actuation via the SendInput API.
//!
//! Absolute mouse input is sent with `MOUSEEVENTF_VIRTUALDESK`, so
//! `[0, 65535]` spans the whole virtual desktop.  Pixel targets are shifted by
//! the virtual-screen origin and rescaled by its size before each move, which
//! keeps regions on secondary monitors (including negative origins) reachable.

#![cfg(target_os = "windows")]

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MOVE, MOUSEEVENTF_VIRTUALDESK, MOUSEINPUT,
    MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
    SM_YVIRTUALSCREEN,
};

use crate::application::relay_touch::{ActuationError, PointerActuator};

/// Upper bound of the normalized absolute coordinate space.
const NORMALIZED_MAX: i64 = 65_535;

/// Windows implementation of [`PointerActuator`] using SendInput.
#[derive(Debug, Default)]
pub struct SendInputActuator;

impl SendInputActuator {
    pub fn new() -> Self {
        Self
    }
}

impl PointerActuator for SendInputActuator {
    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError> {
        // SAFETY: GetSystemMetrics has no preconditions.
        let (left, top, width, height) = unsafe {
            (
                GetSystemMetrics(SM_XVIRTUALSCREEN),
                GetSystemMetrics(SM_YVIRTUALSCREEN),
                GetSystemMetrics(SM_CXVIRTUALSCREEN),
                GetSystemMetrics(SM_CYVIRTUALSCREEN),
            )
        };
        let dx = normalize(x, left, width);
        let dy = normalize(y, top, height);
        send_mouse(
            MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_MOVE | MOUSEEVENTF_VIRTUALDESK,
            dx,
            dy,
        )
    }

    fn mouse_down(&self) -> Result<(), ActuationError> {
        send_mouse(MOUSEEVENTF_LEFTDOWN, 0, 0)
    }

    fn mouse_up(&self) -> Result<(), ActuationError> {
        send_mouse(MOUSEEVENTF_LEFTUP, 0, 0)
    }
}

/// Maps a desktop pixel coordinate onto `[0, 65535]` for a virtual screen
/// axis starting at `origin` and spanning `extent` pixels.
fn normalize(pixel: i32, origin: i32, extent: i32) -> i32 {
    if extent <= 0 {
        return 0;
    }
    let offset = i64::from(pixel) - i64::from(origin);
    let scaled = (offset * NORMALIZED_MAX / i64::from(extent)).clamp(0, NORMALIZED_MAX);
    // The clamp keeps the value within i32.
    scaled as i32
}

fn send_mouse(flags: MOUSE_EVENT_FLAGS, dx: i32, dy: i32) -> Result<(), ActuationError> {
    let input = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    // SAFETY: `input` is a fully initialized INPUT on the stack.
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent != 1 {
        return Err(ActuationError::Platform(format!(
            "SendInput injected {sent} of 1 events"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_maps_edges_of_screen() {
        assert_eq!(normalize(0, 0, 1920), 0);
        assert_eq!(normalize(1920, 0, 1920), 65_535);
        assert_eq!(normalize(960, 0, 1920), 32_767);
    }

    #[test]
    fn test_normalize_reaches_secondary_monitor() {
        // Arrange: two 1920-wide monitors side by side
        let (origin, extent) = (0, 3840);

        // Act
        let centre_of_second = normalize(2880, origin, extent);

        // Assert – three quarters across the virtual desktop, not clamped
        assert_eq!(centre_of_second, 49_151);
    }

    #[test]
    fn test_normalize_honours_negative_virtual_origin() {
        // Arrange: a monitor left of the primary puts the desktop origin at -1920
        let (origin, extent) = (-1920, 3840);

        // Act / Assert
        assert_eq!(normalize(-1920, origin, extent), 0);
        assert_eq!(normalize(-960, origin, extent), 16_383);
        assert_eq!(normalize(0, origin, extent), 32_767);
    }

    #[test]
    fn test_normalize_clamps_off_screen_targets() {
        assert_eq!(normalize(-50, 0, 1920), 0);
        assert_eq!(normalize(5000, 0, 1920), 65_535);
    }

    #[test]
    fn test_normalize_zero_extent_gives_zero() {
        assert_eq!(normalize(100, 0, 0), 0);
    }
}

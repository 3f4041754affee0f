//! Primary monitor size via `GetSystemMetrics`.

use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

use super::RegionProviderError;

pub(super) fn primary_screen_size() -> Result<(u32, u32), RegionProviderError> {
    // SAFETY: GetSystemMetrics has no preconditions; it returns 0 on failure.
    let (width, height) = unsafe {
        (
            GetSystemMetrics(SM_CXSCREEN),
            GetSystemMetrics(SM_CYSCREEN),
        )
    };

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(RegionProviderError::Platform(format!(
            "GetSystemMetrics reported {width}x{height}"
        ))),
    }
}

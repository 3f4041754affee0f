//! Primary screen size via Xlib.

use x11::xlib;

use super::RegionProviderError;

/// Width and height of the default X screen in pixels.
pub(super) fn primary_screen_size() -> Result<(u32, u32), RegionProviderError> {
    // SAFETY: a null name means "use $DISPLAY"; the result is checked below.
    let display = unsafe { xlib::XOpenDisplay(std::ptr::null()) };

    if display.is_null() {
        let display_env = std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
        return Err(RegionProviderError::Platform(format!(
            "XOpenDisplay failed; DISPLAY={display_env}"
        )));
    }

    // SAFETY: `display` is a live connection until XCloseDisplay below.
    let (width, height) = unsafe {
        let screen = xlib::XDefaultScreen(display);
        let size = (
            xlib::XDisplayWidth(display, screen),
            xlib::XDisplayHeight(display, screen),
        );
        xlib::XCloseDisplay(display);
        size
    };

    let width = u32::try_from(width)
        .map_err(|_| RegionProviderError::Platform(format!("negative screen width {width}")))?;
    let height = u32::try_from(height)
        .map_err(|_| RegionProviderError::Platform(format!("negative screen height {height}")))?;
    Ok((width, height))
}

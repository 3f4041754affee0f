//! Main display size via CoreGraphics.

use core_graphics::display::CGDisplay;

use super::RegionProviderError;

pub(super) fn primary_screen_size() -> Result<(u32, u32), RegionProviderError> {
    let bounds = CGDisplay::main().bounds();
    let (width, height) = (bounds.size.width, bounds.size.height);

    if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
        return Err(RegionProviderError::Platform(format!(
            "CGDisplayBounds reported {width}x{height}"
        )));
    }
    // Points, not pixels; CGEvent positions use the same unit.  Scaled modes
    // can report fractional sizes, which round to the nearest whole point.
    Ok((width.round() as u32, height.round() as u32))
}

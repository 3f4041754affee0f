//! Destination-rectangle providers.
//!
//! The relay projects device coordinates onto one host rectangle, chosen once
//! before the loop starts and never changed afterwards.  A provider supplies
//! that rectangle:
//!
//! - [`FixedRegion`] – a rectangle from the config file or `--region`.
//! - [`PrimaryScreenRegion`] – the primary screen's full extent, queried from
//!   the OS (`XDisplayWidth` on Linux, `GetSystemMetrics` on Windows,
//!   `CGDisplay::main().bounds()` on macOS).
//! - [`MockRegionProvider`] – always compiled, for tests.

use thiserror::Error;
use touch_core::{Rectangle, RegionError};

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "macos")]
mod macos;

/// Error type for destination-rectangle lookup.
#[derive(Debug, Error)]
pub enum RegionProviderError {
    /// The OS could not report the screen geometry.
    #[error("platform API error while reading screen geometry: {0}")]
    Platform(String),

    /// The reported geometry is not a usable rectangle.
    #[error("screen geometry is not a valid rectangle: {0}")]
    Invalid(#[from] RegionError),

    /// No screen query exists for this platform.
    #[error("no screen geometry source on {0}; configure a fixed region instead")]
    Unsupported(&'static str),
}

/// Produces the destination rectangle.
pub trait RegionProvider: Send + Sync {
    /// Returns the rectangle device coordinates should be projected onto.
    ///
    /// # Errors
    ///
    /// Returns a [`RegionProviderError`] if no valid rectangle is available.
    fn destination(&self) -> Result<Rectangle, RegionProviderError>;
}

// ── Fixed ─────────────────────────────────────────────────────────────────────

/// A rectangle known up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRegion(pub Rectangle);

impl RegionProvider for FixedRegion {
    fn destination(&self) -> Result<Rectangle, RegionProviderError> {
        self.0.validate()?;
        Ok(self.0)
    }
}

// ── Primary screen ────────────────────────────────────────────────────────────

/// The full extent of the primary screen, origin at its top-left corner.
///
/// The monitor under the cursor is not considered; other monitors are
/// reached through a [`FixedRegion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryScreenRegion;

impl PrimaryScreenRegion {
    pub fn new() -> Self {
        Self
    }
}

impl RegionProvider for PrimaryScreenRegion {
    fn destination(&self) -> Result<Rectangle, RegionProviderError> {
        let (width, height) = primary_screen_size()?;
        if width == 0 || height == 0 {
            return Err(RegionProviderError::Platform(format!(
                "primary screen reported a {width}x{height} size"
            )));
        }
        Ok(Rectangle::from_origin_size(0, 0, width, height)?)
    }
}

#[cfg(target_os = "linux")]
fn primary_screen_size() -> Result<(u32, u32), RegionProviderError> {
    linux::primary_screen_size()
}

#[cfg(target_os = "windows")]
fn primary_screen_size() -> Result<(u32, u32), RegionProviderError> {
    windows::primary_screen_size()
}

#[cfg(target_os = "macos")]
fn primary_screen_size() -> Result<(u32, u32), RegionProviderError> {
    macos::primary_screen_size()
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn primary_screen_size() -> Result<(u32, u32), RegionProviderError> {
    Err(RegionProviderError::Unsupported(std::env::consts::OS))
}

// ── Mock ──────────────────────────────────────────────────────────────────────

/// A provider returning a preset result, for tests.
#[derive(Debug, Clone, Default)]
pub struct MockRegionProvider {
    /// `None` makes [`RegionProvider::destination`] fail.
    pub rect: Option<Rectangle>,
}

impl MockRegionProvider {
    /// A provider that returns `rect`.
    pub fn new(rect: Rectangle) -> Self {
        Self { rect: Some(rect) }
    }

    /// A provider that always fails.
    pub fn failing() -> Self {
        Self { rect: None }
    }
}

impl RegionProvider for MockRegionProvider {
    fn destination(&self) -> Result<Rectangle, RegionProviderError> {
        self.rect
            .ok_or_else(|| RegionProviderError::Platform("mock failure".to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

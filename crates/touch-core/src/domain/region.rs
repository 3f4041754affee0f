//! Rectangles and the device-to-destination coordinate mapper.
//!
//! Device coordinates live in the *source* rectangle (the digitizer's native
//! absolute-axis extent).  Host pointer coordinates live in the *destination*
//! rectangle (a screen or a region of one).  [`map_point`] projects one onto
//! the other with an independent affine rescale per axis.
//!
//! # Rotation
//!
//! A tablet held in portrait orientation reports its long axis as X while the
//! screen's long axis is also X.  With `rotate = true` the axes are swapped
//! and the device X axis is mirrored:
//!
//! ```text
//! x_out = dst.x_min + (y - src.y_min) * dst.width  / src.height
//! y_out = dst.y_min + (src.x_max - x) * dst.height / src.width
//! ```
//!
//! # Integer semantics
//!
//! All arithmetic is integer; division truncates toward zero.  Intermediate
//! products are computed in `i128` so any `u32` device coordinate and any
//! `i32` screen span multiply without overflow.  Results beyond the `i32`
//! range saturate.  Points outside the source rectangle are *not* clamped:
//! they map to points outside the destination rectangle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Native absolute-axis extent of the supported tablet digitizer.
pub const DEVICE_SOURCE_RECT: Rectangle = Rectangle {
    x_min: 0,
    y_min: 0,
    x_max: 20966,
    y_max: 15725,
};

/// An axis of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Errors raised by rectangle construction and coordinate mapping.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegionError {
    /// The source rectangle has zero extent on `axis`, so nothing can be
    /// rescaled from it.
    #[error("degenerate rectangle: {axis} extent is zero ({min}..{max})")]
    DegenerateRectangle { axis: Axis, min: i32, max: i32 },

    /// A rectangle's minimum exceeds its maximum on some axis.
    #[error("invalid rectangle bounds: ({x_min}, {y_min})..({x_max}, {y_max})")]
    InvalidBounds {
        x_min: i32,
        y_min: i32,
        x_max: i32,
        y_max: i32,
    },
}

/// An axis-aligned rectangle with inclusive integer bounds.
///
/// Invariant: `x_min <= x_max` and `y_min <= y_max`.  [`Rectangle::new`]
/// enforces it; the struct literal does not, so values built by hand (or
/// deserialized) should go through [`Rectangle::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Rectangle {
    /// Creates a rectangle, rejecting inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidBounds`] if `x_min > x_max` or
    /// `y_min > y_max`.
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Result<Self, RegionError> {
        let rect = Self {
            x_min,
            y_min,
            x_max,
            y_max,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// Creates a rectangle from a top-left corner and a size.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidBounds`] if the far corner overflows `i32`.
    pub fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Result<Self, RegionError> {
        let invalid = RegionError::InvalidBounds {
            x_min: x,
            y_min: y,
            x_max: i32::MAX,
            y_max: i32::MAX,
        };
        let w = i32::try_from(width).map_err(|_| invalid.clone())?;
        let h = i32::try_from(height).map_err(|_| invalid.clone())?;
        let x_max = x.checked_add(w).ok_or_else(|| invalid.clone())?;
        let y_max = y.checked_add(h).ok_or(invalid)?;
        Self::new(x, y, x_max, y_max)
    }

    /// Checks the `min <= max` invariant on both axes.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidBounds`] when the invariant is broken.
    pub fn validate(&self) -> Result<(), RegionError> {
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(RegionError::InvalidBounds {
                x_min: self.x_min,
                y_min: self.y_min,
                x_max: self.x_max,
                y_max: self.y_max,
            });
        }
        Ok(())
    }

    /// Checks that the rectangle can serve as a mapping source: valid bounds
    /// and a non-zero extent on both axes.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidBounds`] or
    /// [`RegionError::DegenerateRectangle`].
    pub fn validate_source(&self) -> Result<(), RegionError> {
        self.validate()?;
        if self.x_max == self.x_min {
            return Err(RegionError::DegenerateRectangle {
                axis: Axis::X,
                min: self.x_min,
                max: self.x_max,
            });
        }
        if self.y_max == self.y_min {
            return Err(RegionError::DegenerateRectangle {
                axis: Axis::Y,
                min: self.y_min,
                max: self.y_max,
            });
        }
        Ok(())
    }

    /// Horizontal extent (`x_max - x_min`).
    pub fn width(&self) -> i64 {
        i64::from(self.x_max) - i64::from(self.x_min)
    }

    /// Vertical extent (`y_max - y_min`).
    pub fn height(&self) -> i64 {
        i64::from(self.y_max) - i64::from(self.y_min)
    }

    /// Returns `true` if `(x, y)` lies inside the rectangle, edges included.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        (i64::from(self.x_min)..=i64::from(self.x_max)).contains(&x)
            && (i64::from(self.y_min)..=i64::from(self.y_max)).contains(&y)
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})..({}, {})",
            self.x_min, self.y_min, self.x_max, self.y_max
        )
    }
}

impl std::str::FromStr for Rectangle {
    type Err = String;

    /// Parses `"x_min,y_min,x_max,y_max"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<i32> = s
            .split(',')
            .map(|p| p.trim().parse::<i32>().map_err(|e| format!("'{p}': {e}")))
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [x_min, y_min, x_max, y_max] => {
                Rectangle::new(*x_min, *y_min, *x_max, *y_max).map_err(|e| e.to_string())
            }
            _ => Err(format!(
                "expected four comma-separated integers (x_min,y_min,x_max,y_max), got {}",
                parts.len()
            )),
        }
    }
}

/// A point in destination-rectangle space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedPoint {
    pub x: i32,
    pub y: i32,
}

/// Projects the device point `(x, y)` from `src` onto `dst`.
///
/// # Errors
///
/// Returns [`RegionError::DegenerateRectangle`] if `src` has zero width or
/// height, and [`RegionError::InvalidBounds`] if either rectangle is inverted.
///
/// # Examples
///
/// ```rust
/// use touch_core::{map_point, Rectangle};
///
/// let src = Rectangle::new(0, 0, 100, 100).unwrap();
/// let dst = Rectangle::new(0, 0, 1920, 1080).unwrap();
/// let p = map_point(50, 50, &src, &dst, false).unwrap();
/// assert_eq!((p.x, p.y), (960, 540));
/// ```
pub fn map_point(
    x: i64,
    y: i64,
    src: &Rectangle,
    dst: &Rectangle,
    rotate: bool,
) -> Result<MappedPoint, RegionError> {
    src.validate_source()?;
    dst.validate()?;

    let (x_offset, x_src_span, y_offset, y_src_span) = if rotate {
        (
            y - i64::from(src.y_min),
            src.height(),
            i64::from(src.x_max) - x,
            src.width(),
        )
    } else {
        (
            x - i64::from(src.x_min),
            src.width(),
            y - i64::from(src.y_min),
            src.height(),
        )
    };

    Ok(MappedPoint {
        x: rescale(dst.x_min, x_offset, dst.width(), x_src_span),
        y: rescale(dst.y_min, y_offset, dst.height(), y_src_span),
    })
}

/// `base + offset * dst_span / src_span`, truncating, saturating to `i32`.
fn rescale(base: i32, offset: i64, dst_span: i64, src_span: i64) -> i32 {
    let scaled = i128::from(offset) * i128::from(dst_span) / i128::from(src_span);
    let value = i128::from(base) + scaled;
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

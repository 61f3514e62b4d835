//! Geometric primitives: `Size`, `Rect` and the rotated cover box.

use serde::{Deserialize, Serialize};

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scale size by a factor.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X position (left edge)
    pub x: f64,
    /// Y position (top edge)
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the center point of the rectangle as `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rectangle of `size` centered over `self`.
    #[must_use]
    pub fn centered(&self, size: Size) -> Self {
        let (cx, cy) = self.center();
        Self::new(
            cx - size.width / 2.0,
            cy - size.height / 2.0,
            size.width,
            size.height,
        )
    }
}

/// Axis-aligned bounding size of a `size` rectangle rotated by `degrees`.
#[must_use]
pub fn rotated_bounds(size: Size, degrees: f64) -> Size {
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    Size::new(
        size.width.mul_add(cos, size.height * sin),
        size.width.mul_add(sin, size.height * cos),
    )
}

/// Container that keeps a rotated, scaled background covering the viewport.
///
/// The viewport is scaled by `scale`, projected through the rotation and the
/// result is re-centered over the viewport.
#[must_use]
pub fn cover_box(viewport: Size, rotation_degrees: f64, scale: f64) -> Rect {
    let bounds = rotated_bounds(viewport.scale(scale), rotation_degrees);
    Rect::new(0.0, 0.0, viewport.width, viewport.height).centered(bounds)
}

//! Geometry primitives shared by the engine seam and the bridge.

use serde::{Deserialize, Serialize};

/// 2D affine transformation matrix.
///
/// The matrix represents the transformation:
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
///
/// Transformed point: (x', y') = (a*x + c*y + e, b*x + d*y + f)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Scale/rotate coefficient
    pub a: f32,
    /// Rotate/shear coefficient
    pub b: f32,
    /// Rotate/shear coefficient
    pub c: f32,
    /// Scale/rotate coefficient
    pub d: f32,
    /// Horizontal translation
    pub e: f32,
    /// Vertical translation
    pub f: f32,
}

impl Matrix {
    /// Create a new transformation matrix from its six coefficients.
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create an identity matrix (no transformation).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Create a translation matrix.
    pub fn translation(x: f32, y: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Create a uniform scale matrix.
    pub fn scale(factor: f32) -> Self {
        Self::scale_xy(factor, factor)
    }

    /// Create a non-uniform scale matrix.
    pub fn scale_xy(x: f32, y: f32) -> Self {
        Self::new(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Create a rotation matrix (angle in radians).
    pub fn rotation(radians: f32) -> Self {
        let cos = radians.cos();
        let sin = radians.sin();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Compose two transformations: apply `self`, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Whether this is the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// A page's intrinsic bounding box, in page-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBounds {
    /// Left boundary
    pub left: f32,
    /// Bottom boundary
    pub bottom: f32,
    /// Right boundary
    pub right: f32,
    /// Top boundary
    pub top: f32,
}

impl PageBounds {
    /// Create a new bounding box.
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Get the width of the box.
    pub fn width(&self) -> f32 {
        (self.right - self.left).abs()
    }

    /// Get the height of the box.
    pub fn height(&self) -> f32 {
        (self.top - self.bottom).abs()
    }

    /// Check if the box has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// The bounds as a `[left, bottom, right, top]` array.
    pub fn to_array(&self) -> [f32; 4] {
        [self.left, self.bottom, self.right, self.top]
    }
}

impl Default for PageBounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 612.0, 792.0) // US Letter
    }
}

/// The device-pixel rectangle a render targets.
///
/// Defines both the output buffer dimensions (`width() * height()` pixels)
/// and the raster origin: pixel (x0, y0) in device space maps to the first
/// pixel of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl ViewBox {
    /// Create a new viewbox from device-pixel corners.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width in pixels. Negative for an inverted box.
    ///
    /// Saturates instead of overflowing, so hostile corner values from an
    /// untrusted host stay representable and fail later extent checks
    /// rather than panicking.
    pub fn width(&self) -> i32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height in pixels. Negative for an inverted box.
    ///
    /// Saturates like [`ViewBox::width`].
    pub fn height(&self) -> i32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Number of pixels the target buffer must hold.
    pub fn pixel_count(&self) -> usize {
        if self.width() <= 0 || self.height() <= 0 {
            return 0;
        }
        self.width() as usize * self.height() as usize
    }
}

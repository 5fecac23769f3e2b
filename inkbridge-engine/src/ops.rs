//! The drawing-operation model engines emit and devices consume.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// One segment of a path outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSeg {
    /// Start a new subpath at (x, y).
    MoveTo(f32, f32),
    /// Straight line to (x, y).
    LineTo(f32, f32),
    /// Cubic bezier via two control points to (x3, y3).
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// Close the current subpath.
    Close,
}

/// A path outline with a process-unique identity.
///
/// The id is assigned at construction and never serialized; render caches
/// key converted/rasterizer-ready forms of the path on it, so one recorded
/// path is converted at most once no matter how many times it is replayed.
#[derive(Debug, Clone)]
pub struct PathData {
    id: u64,
    segments: Vec<PathSeg>,
}

static NEXT_PATH_ID: AtomicU64 = AtomicU64::new(1);

impl PathData {
    /// Create a path from its segments, assigning a fresh id.
    pub fn new(segments: Vec<PathSeg>) -> Self {
        Self {
            id: NEXT_PATH_ID.fetch_add(1, Ordering::Relaxed),
            segments,
        }
    }

    /// The cache identity of this path.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The path's segments.
    pub fn segments(&self) -> &[PathSeg] {
        &self.segments
    }

    /// Whether the path has any segments at all.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// An RGBA color, 8 bits per channel, non-premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Path fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    /// Non-zero winding rule (the common case).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

/// Stroke parameters for path stroking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke width in page-space units.
    pub width: f32,
}

impl StrokeStyle {
    /// A stroke of the given width.
    pub fn new(width: f32) -> Self {
        Self { width }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { width: 1.0 }
    }
}

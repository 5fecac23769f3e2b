//! The generic drawing sink engines draw into.

use crate::geom::Matrix;
use crate::ops::{Color, FillRule, PathData, StrokeStyle};

/// An abstract drawing sink.
///
/// A device receives drawing operations and turns them into an effect:
/// pixels (the raster device), or a recording (the display list). Engines
/// never know which kind they are driving.
///
/// Every operation carries the transform under which its coordinates are to
/// be interpreted, so recordings can be replayed later under a different
/// composed transform.
pub trait Device {
    /// Fill a path under the given transform.
    fn fill_path(&mut self, path: &PathData, rule: FillRule, ctm: &Matrix, color: Color);

    /// Stroke a path under the given transform.
    fn stroke_path(&mut self, path: &PathData, stroke: &StrokeStyle, ctm: &Matrix, color: Color);
}

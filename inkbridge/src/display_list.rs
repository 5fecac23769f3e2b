//! Record-once, replay-many display lists.

use inkbridge_engine::{Color, Device, FillRule, Matrix, PathData, StrokeStyle};

enum RecordedOp {
    Fill {
        path: PathData,
        rule: FillRule,
        ctm: Matrix,
        color: Color,
    },
    Stroke {
        path: PathData,
        stroke: StrokeStyle,
        ctm: Matrix,
        color: Color,
    },
}

/// A recorded, replayable sequence of drawing operations.
///
/// A display list is itself a [`Device`]: the registry hands it to the
/// engine's interpretation pass exactly once, at page-open time, under the
/// identity transform. Replay composes a replay-time transform onto each
/// recorded operation, so one recording serves any number of renders at
/// different zoom/pan/rotation without re-interpretation. Replay takes
/// `&self` and keeps no state across calls.
pub struct DisplayList {
    ops: Vec<RecordedOp>,
}

impl DisplayList {
    /// An empty recording.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Number of recorded operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether anything was recorded at all.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replay the recording into `device` with `ctm` composed onto every
    /// operation's recorded transform.
    pub fn replay(&self, device: &mut dyn Device, ctm: &Matrix) {
        for op in &self.ops {
            match op {
                RecordedOp::Fill {
                    path,
                    rule,
                    ctm: recorded,
                    color,
                } => device.fill_path(path, *rule, &recorded.then(ctm), *color),
                RecordedOp::Stroke {
                    path,
                    stroke,
                    ctm: recorded,
                    color,
                } => device.stroke_path(path, stroke, &recorded.then(ctm), *color),
            }
        }
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for DisplayList {
    fn fill_path(&mut self, path: &PathData, rule: FillRule, ctm: &Matrix, color: Color) {
        self.ops.push(RecordedOp::Fill {
            path: path.clone(),
            rule,
            ctm: *ctm,
            color,
        });
    }

    fn stroke_path(&mut self, path: &PathData, stroke: &StrokeStyle, ctm: &Matrix, color: Color) {
        self.ops.push(RecordedOp::Stroke {
            path: path.clone(),
            stroke: *stroke,
            ctm: *ctm,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkbridge_engine::PathSeg;

    struct Capture {
        ctms: Vec<Matrix>,
    }

    impl Device for Capture {
        fn fill_path(&mut self, _: &PathData, _: FillRule, ctm: &Matrix, _: Color) {
            self.ctms.push(*ctm);
        }
        fn stroke_path(&mut self, _: &PathData, _: &StrokeStyle, ctm: &Matrix, _: Color) {
            self.ctms.push(*ctm);
        }
    }

    fn square() -> PathData {
        PathData::new(vec![
            PathSeg::MoveTo(0.0, 0.0),
            PathSeg::LineTo(1.0, 0.0),
            PathSeg::LineTo(1.0, 1.0),
            PathSeg::Close,
        ])
    }

    #[test]
    fn records_and_replays_in_order() {
        let mut list = DisplayList::new();
        list.fill_path(&square(), FillRule::NonZero, &Matrix::identity(), Color::BLACK);
        list.stroke_path(
            &square(),
            &StrokeStyle::new(2.0),
            &Matrix::identity(),
            Color::BLACK,
        );
        assert_eq!(list.len(), 2);

        let mut capture = Capture { ctms: Vec::new() };
        list.replay(&mut capture, &Matrix::scale(2.0));
        assert_eq!(capture.ctms.len(), 2);
        assert_eq!(capture.ctms[0], Matrix::scale(2.0));
    }

    #[test]
    fn replay_composes_recorded_transform() {
        let mut list = DisplayList::new();
        list.fill_path(
            &square(),
            FillRule::NonZero,
            &Matrix::translation(10.0, 0.0),
            Color::BLACK,
        );

        let mut capture = Capture { ctms: Vec::new() };
        list.replay(&mut capture, &Matrix::scale(2.0));
        // translate(10,0) then scale(2) moves the origin to (20, 0)
        let (x, y) = capture.ctms[0].apply(0.0, 0.0);
        assert_eq!((x, y), (20.0, 0.0));
    }

    #[test]
    fn replay_is_stateless() {
        let mut list = DisplayList::new();
        list.fill_path(&square(), FillRule::NonZero, &Matrix::identity(), Color::BLACK);

        let mut first = Capture { ctms: Vec::new() };
        let mut second = Capture { ctms: Vec::new() };
        list.replay(&mut first, &Matrix::scale(3.0));
        list.replay(&mut second, &Matrix::scale(3.0));
        assert_eq!(first.ctms, second.ctms);
    }
}

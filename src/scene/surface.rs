use crate::foundation::core::{Color, Point};
use crate::path::buffer::{PathBuffer, PathSegment};

/// 2D drawing target with canvas-style path construction.
///
/// Ordering contract: a shape is drawn as `begin_path`, its path commands, then at most one
/// `fill` followed by at most one `stroke`, all against the path built since `begin_path`.
pub trait DrawSurface {
    /// Clear a rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Start a new, empty path.
    fn begin_path(&mut self);
    /// Start a sub-path.
    fn move_to(&mut self, x: f64, y: f64);
    /// Straight line from the current point.
    fn line_to(&mut self, x: f64, y: f64);
    /// Cubic Bezier from the current point.
    fn bezier_curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64);
    /// Close the current sub-path.
    fn close_path(&mut self);
    /// Fill the current path (non-zero rule).
    fn fill(&mut self, color: Color);
    /// Stroke the current path.
    fn stroke(&mut self, color: Color, line_width: f64);
}

/// Replay `path` on `surface` as a fresh path.
pub fn replay_path<S: DrawSurface + ?Sized>(surface: &mut S, path: &PathBuffer) {
    surface.begin_path();
    for seg in path.segments() {
        match seg {
            PathSegment::MoveTo(p) => surface.move_to(p.x, p.y),
            PathSegment::LineTo(p) => surface.line_to(p.x, p.y),
            PathSegment::CurveTo(c1, c2, p) => {
                surface.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
            }
            PathSegment::ClosePath => surface.close_path(),
        }
    }
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// `clear_rect`
    ClearRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// `begin_path`
    BeginPath,
    /// `move_to`
    MoveTo(Point),
    /// `line_to`
    LineTo(Point),
    /// `bezier_curve_to`
    CurveTo(Point, Point, Point),
    /// `close_path`
    ClosePath,
    /// `fill`
    Fill(Color),
    /// `stroke`
    Stroke {
        /// Stroke color.
        color: Color,
        /// Stroke width.
        line_width: f64,
    },
}

/// Surface that records every call, for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far, oldest first.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the recording empty.
    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl DrawSurface for RecordingSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.calls.push(DrawCall::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn begin_path(&mut self) {
        self.calls.push(DrawCall::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(DrawCall::MoveTo(Point::new(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.calls.push(DrawCall::LineTo(Point::new(x, y)));
    }

    fn bezier_curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) {
        self.calls.push(DrawCall::CurveTo(
            Point::new(cx1, cy1),
            Point::new(cx2, cy2),
            Point::new(x, y),
        ));
    }

    fn close_path(&mut self) {
        self.calls.push(DrawCall::ClosePath);
    }

    fn fill(&mut self, color: Color) {
        self.calls.push(DrawCall::Fill(color));
    }

    fn stroke(&mut self, color: Color, line_width: f64) {
        self.calls.push(DrawCall::Stroke { color, line_width });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/surface.rs"]
mod tests;

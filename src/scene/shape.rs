use crate::foundation::core::{BezPath, Color, Point, Vec2};
use crate::path::buffer::{PathBuffer, PathSegment};
use crate::path::parser::ARC_TOLERANCE;
use kurbo::{ParamCurveNearest, PathEl};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::f64::consts::TAU;

/// Paint attributes shared by all drawable shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualAttrs {
    /// Fill color; `None` skips filling.
    pub fill: Option<Color>,
    /// Stroke color; `None` skips stroking.
    pub stroke: Option<Color>,
    /// Stroke width.
    pub line_width: f64,
}

impl Default for VisualAttrs {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            line_width: 1.0,
        }
    }
}

impl VisualAttrs {
    /// Red fill with a black outline.
    pub const SOLID: Self = Self {
        fill: Some(Color::RED),
        stroke: Some(Color::BLACK),
        line_width: 1.0,
    };

    /// Replace the fill.
    pub fn with_fill(self, fill: impl Into<Option<Color>>) -> Self {
        Self {
            fill: fill.into(),
            ..self
        }
    }

    /// Replace the stroke.
    pub fn with_stroke(self, stroke: impl Into<Option<Color>>) -> Self {
        Self {
            stroke: stroke.into(),
            ..self
        }
    }

    /// Replace the stroke width.
    pub fn with_line_width(self, line_width: f64) -> Self {
        Self { line_width, ..self }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectShape {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Default for RectShape {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        }
    }
}

impl RectShape {
    /// Move the top-left corner.
    pub fn with_position(self, x: f64, y: f64) -> Self {
        Self { x, y, ..self }
    }

    /// Resize.
    pub fn with_size(self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    /// Closed outline, clockwise from the top-left corner.
    pub fn outline(&self) -> PathBuffer {
        let mut p = PathBuffer::new();
        p.move_to(self.x, self.y);
        p.line_to(self.x + self.width, self.y);
        p.line_to(self.x + self.width, self.y + self.height);
        p.line_to(self.x, self.y + self.height);
        p.close_path();
        p
    }
}

/// Circular arc with 2D-canvas angle semantics (radians, y axis down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcShape {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Radius.
    pub radius: f64,
    /// Start angle.
    pub start_angle: f64,
    /// End angle.
    pub end_angle: f64,
    /// Sweep direction.
    pub anticlockwise: bool,
}

impl Default for ArcShape {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: 10.0,
            start_angle: 0.0,
            end_angle: TAU,
            anticlockwise: false,
        }
    }
}

impl ArcShape {
    /// Move the center.
    pub fn with_center(self, x: f64, y: f64) -> Self {
        Self { x, y, ..self }
    }

    /// Change the radius.
    pub fn with_radius(self, radius: f64) -> Self {
        Self { radius, ..self }
    }

    /// Change the start and end angles.
    pub fn with_angles(self, start_angle: f64, end_angle: f64) -> Self {
        Self {
            start_angle,
            end_angle,
            ..self
        }
    }

    /// Change the sweep direction.
    pub fn with_anticlockwise(self, anticlockwise: bool) -> Self {
        Self {
            anticlockwise,
            ..self
        }
    }

    /// Signed sweep angle, following the canvas `arc()` rules: a difference of a full turn
    /// or more in the drawing direction is a full circle, anything else wraps into one turn.
    pub fn sweep(&self) -> f64 {
        if self.anticlockwise {
            let d = self.start_angle - self.end_angle;
            if d >= TAU { -TAU } else { -d.rem_euclid(TAU) }
        } else {
            let d = self.end_angle - self.start_angle;
            if d >= TAU { TAU } else { d.rem_euclid(TAU) }
        }
    }

    /// Open outline from the start angle to the end angle, approximated with cubics.
    pub fn outline(&self) -> PathBuffer {
        let center = Point::new(self.x, self.y);
        let r = self.radius.max(0.0);
        let mut p = PathBuffer::new();
        let start = center + Vec2::from_angle(self.start_angle) * r;
        p.move_to(start.x, start.y);

        let sweep = self.sweep();
        if r == 0.0 || sweep == 0.0 {
            return p;
        }
        let arc = kurbo::Arc {
            center,
            radii: Vec2::new(r, r),
            start_angle: self.start_angle,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        for el in arc.append_iter(ARC_TOLERANCE) {
            if let PathEl::CurveTo(c1, c2, end) = el {
                p.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
            }
        }
        p
    }
}

/// Geometry of a scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Pure container; draws nothing.
    Group,
    /// Rectangle.
    Rect(RectShape),
    /// Circular arc.
    Arc(ArcShape),
    /// Arbitrary path, e.g. a morph frame.
    Path(PathBuffer),
}

/// Drawable content of a scene node: geometry plus paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Geometry.
    pub kind: ShapeKind,
    /// Paint.
    pub visual: VisualAttrs,
}

impl Shape {
    /// A container node.
    pub fn group() -> Self {
        Self {
            kind: ShapeKind::Group,
            visual: VisualAttrs::default(),
        }
    }

    /// A rectangle, red with a black outline.
    pub fn rect(rect: RectShape) -> Self {
        Self {
            kind: ShapeKind::Rect(rect),
            visual: VisualAttrs::SOLID,
        }
    }

    /// An arc, red with a black outline.
    pub fn arc(arc: ArcShape) -> Self {
        Self {
            kind: ShapeKind::Arc(arc),
            visual: VisualAttrs::SOLID,
        }
    }

    /// A path without paint.
    pub fn path(path: PathBuffer) -> Self {
        Self {
            kind: ShapeKind::Path(path),
            visual: VisualAttrs::default(),
        }
    }

    /// Replace the paint.
    pub fn with_visual(self, visual: VisualAttrs) -> Self {
        Self { visual, ..self }
    }

    /// Outline to draw and hit-test, or `None` for groups.
    pub fn outline(&self) -> Option<Cow<'_, PathBuffer>> {
        match &self.kind {
            ShapeKind::Group => None,
            ShapeKind::Rect(r) => Some(Cow::Owned(r.outline())),
            ShapeKind::Arc(a) => Some(Cow::Owned(a.outline())),
            ShapeKind::Path(p) => Some(Cow::Borrowed(p)),
        }
    }

    /// Return `true` when `pt` lies inside the filled outline (non-zero rule, open
    /// sub-paths closed implicitly).
    pub fn hit_test(&self, pt: Point) -> bool {
        let Some(outline) = self.outline() else {
            return false;
        };
        kurbo::Shape::winding(&fill_path(&outline), pt) != 0
    }

    /// Return `true` when `pt` lies within half the line width of the outline.
    pub fn hit_test_stroke(&self, pt: Point) -> bool {
        let Some(outline) = self.outline() else {
            return false;
        };
        let half = self.visual.line_width.max(0.0) / 2.0;
        let path = outline.to_bezpath();
        if path.segments().next().is_none() {
            // A lone point (e.g. a zero-radius arc).
            return first_point(&outline).is_some_and(|p| p.distance(pt) <= half);
        }
        path.segments()
            .any(|seg| seg.nearest(pt, 1e-6).distance_sq <= half * half)
    }
}

fn first_point(path: &PathBuffer) -> Option<Point> {
    path.segments().find_map(|seg| match seg {
        PathSegment::MoveTo(p) | PathSegment::LineTo(p) => Some(p),
        PathSegment::CurveTo(_, _, p) => Some(p),
        PathSegment::ClosePath => None,
    })
}

/// Copy of `path` with every open sub-path closed.
fn fill_path(path: &PathBuffer) -> BezPath {
    let mut out = BezPath::new();
    let mut open = false;
    for el in path.to_bezpath().elements() {
        match el {
            PathEl::MoveTo(_) if open => out.close_path(),
            PathEl::ClosePath => open = false,
            _ => {}
        }
        if let PathEl::MoveTo(_) = el {
            open = true;
        }
        out.push(*el);
    }
    if open {
        out.close_path();
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shape.rs"]
mod tests;

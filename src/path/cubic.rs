use crate::foundation::core::Point;
use crate::foundation::error::{MorphError, MorphResult};
use crate::path::buffer::{PathBuffer, PathSegment};
use std::ops::Deref;

/// Distance under which the current point counts as already back at the sub-path start.
const CLOSE_EPSILON: f64 = 1e-9;

/// One connected run of absolute cubic segments, stored flat.
///
/// Layout: `x0, y0` followed by `cx1, cy1, cx2, cy2, x, y` per segment, so
/// `(len - 2) % 6 == 0` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicPath(Vec<f64>);

impl CubicPath {
    /// Wrap a flat coordinate list, checking the `2 + 6n` layout.
    pub fn new(coords: Vec<f64>) -> MorphResult<Self> {
        check_coordinate_count(coords.len())?;
        Ok(Self(coords))
    }

    fn start(p: Point) -> Self {
        Self(vec![p.x, p.y])
    }

    /// Flat coordinates.
    pub fn coords(&self) -> &[f64] {
        &self.0
    }

    /// Number of cubic segments.
    pub fn segment_count(&self) -> usize {
        (self.0.len() - 2) / 6
    }

    /// Coordinates as points (start point, then three points per segment).
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.0.chunks_exact(2).map(|xy| Point::new(xy[0], xy[1]))
    }

    /// Unwrap into the flat coordinate list.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    fn push(&mut self, c1: Point, c2: Point, p: Point) {
        self.0.extend_from_slice(&[c1.x, c1.y, c2.x, c2.y, p.x, p.y]);
    }
}

impl Deref for CubicPath {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

pub(crate) fn check_coordinate_count(len: usize) -> MorphResult<()> {
    if len < 2 || (len - 2) % 6 != 0 {
        return Err(MorphError::InvalidCoordinateCount(len));
    }
    Ok(())
}

/// Convert a path into one cubic sub-path per `MoveTo`-started run.
///
/// Lines become degenerate cubics whose control points sit on the line's end points, and a
/// `ClosePath` that is not already at the start point adds such a line back to it. Runs
/// without at least one segment are dropped.
pub fn to_cubic_paths(buffer: &PathBuffer) -> Vec<CubicPath> {
    let mut out = Vec::new();
    let mut run: Option<CubicPath> = None;
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;

    fn finish(run: &mut Option<CubicPath>, out: &mut Vec<CubicPath>) {
        if let Some(r) = run.take()
            && r.segment_count() > 0
        {
            out.push(r);
        }
    }

    for seg in buffer.segments() {
        match seg {
            PathSegment::MoveTo(p) => {
                finish(&mut run, &mut out);
                run = Some(CubicPath::start(p));
                start = p;
                current = p;
            }
            PathSegment::LineTo(p) => {
                // A drawing command after `Z` (or before any `M`) starts at `start`.
                run.get_or_insert_with(|| CubicPath::start(start))
                    .push(current, p, p);
                current = p;
            }
            PathSegment::CurveTo(c1, c2, p) => {
                run.get_or_insert_with(|| CubicPath::start(start))
                    .push(c1, c2, p);
                current = p;
            }
            PathSegment::ClosePath => {
                if let Some(r) = run.as_mut()
                    && current.distance(start) > CLOSE_EPSILON
                {
                    r.push(current, start, start);
                }
                finish(&mut run, &mut out);
                current = start;
            }
        }
    }
    finish(&mut run, &mut out);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/path/cubic.rs"]
mod tests;

use crate::foundation::core::{BezPath, Point};
use crate::foundation::error::MorphError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One absolute path primitive. Relative and shorthand SVG commands never reach a
/// [`PathBuffer`]; the parser resolves them first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathCommand {
    /// `M x,y`
    MoveTo,
    /// `L x,y`
    LineTo,
    /// `C x1,y1,x2,y2,x,y`
    CurveTo,
    /// `Z`
    ClosePath,
}

impl PathCommand {
    /// Number of parameters consumed from the flat parameter list.
    pub fn param_count(self) -> usize {
        match self {
            Self::MoveTo | Self::LineTo => 2,
            Self::CurveTo => 6,
            Self::ClosePath => 0,
        }
    }

    /// Absolute SVG command letter.
    pub fn letter(self) -> char {
        match self {
            Self::MoveTo => 'M',
            Self::LineTo => 'L',
            Self::CurveTo => 'C',
            Self::ClosePath => 'Z',
        }
    }
}

/// A decoded command with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Start a new sub-path.
    MoveTo(Point),
    /// Straight line to a point.
    LineTo(Point),
    /// Cubic Bezier: first control, second control, end point.
    CurveTo(Point, Point, Point),
    /// Close the current sub-path.
    ClosePath,
}

/// A path stored as parallel command and flat parameter lists.
///
/// Invariant: the sum of [`PathCommand::param_count`] over `commands` equals
/// `params.len()`. The mutation primitives are the only way to grow the buffer, so the
/// invariant holds by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPathBuffer")]
pub struct PathBuffer {
    commands: Vec<PathCommand>,
    params: Vec<f64>,
}

#[derive(Deserialize)]
struct RawPathBuffer {
    commands: Vec<PathCommand>,
    params: Vec<f64>,
}

impl TryFrom<RawPathBuffer> for PathBuffer {
    type Error = String;

    fn try_from(raw: RawPathBuffer) -> Result<Self, Self::Error> {
        let expected: usize = raw.commands.iter().map(|c| c.param_count()).sum();
        if expected != raw.params.len() {
            return Err(format!(
                "commands consume {expected} params but {} were given",
                raw.params.len()
            ));
        }
        Ok(Self {
            commands: raw.commands,
            params: raw.params,
        })
    }
}

impl PathBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `M x,y`.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo);
        self.params.extend_from_slice(&[x, y]);
    }

    /// Append `L x,y`.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo);
        self.params.extend_from_slice(&[x, y]);
    }

    /// Append `C cx1,cy1,cx2,cy2,x,y`.
    pub fn curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::CurveTo);
        self.params.extend_from_slice(&[cx1, cy1, cx2, cy2, x, y]);
    }

    /// Append `Z`.
    pub fn close_path(&mut self) {
        self.commands.push(PathCommand::ClosePath);
    }

    /// Overwrite the end point of the last drawing command, if any.
    pub(crate) fn set_end_point(&mut self, x: f64, y: f64) {
        if matches!(self.commands.last(), Some(c) if c.param_count() > 0) {
            let n = self.params.len();
            self.params[n - 2] = x;
            self.params[n - 1] = y;
        }
    }

    /// Drop all commands and parameters, keeping allocations.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.params.clear();
    }

    /// Command list in insertion order.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Flat parameter list in insertion order.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Return `true` when the buffer holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate commands together with their parameters.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            commands: self.commands.iter(),
            params: &self.params,
        }
    }

    /// Convert to a [`BezPath`] for geometric queries.
    ///
    /// Every sub-path in the result starts with an explicit `MoveTo`: drawing after `Z`
    /// restarts at the closed sub-path's start, drawing before any `M` starts at the origin.
    pub fn to_bezpath(&self) -> BezPath {
        let mut out = BezPath::new();
        let mut start = Point::ZERO;
        let mut open = false;
        for seg in self.segments() {
            if !open && !matches!(seg, PathSegment::MoveTo(_) | PathSegment::ClosePath) {
                out.move_to(start);
                open = true;
            }
            match seg {
                PathSegment::MoveTo(p) => {
                    out.move_to(p);
                    start = p;
                    open = true;
                }
                PathSegment::LineTo(p) => out.line_to(p),
                PathSegment::CurveTo(c1, c2, p) => out.curve_to(c1, c2, p),
                PathSegment::ClosePath => {
                    if open {
                        out.close_path();
                    }
                    open = false;
                }
            }
        }
        out
    }
}

/// Iterator returned by [`PathBuffer::segments`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    commands: std::slice::Iter<'a, PathCommand>,
    params: &'a [f64],
}

impl Iterator for Segments<'_> {
    type Item = PathSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let cmd = *self.commands.next()?;
        if self.params.len() < cmd.param_count() {
            return None;
        }
        let (p, rest) = self.params.split_at(cmd.param_count());
        self.params = rest;
        Some(match cmd {
            PathCommand::MoveTo => PathSegment::MoveTo(Point::new(p[0], p[1])),
            PathCommand::LineTo => PathSegment::LineTo(Point::new(p[0], p[1])),
            PathCommand::CurveTo => PathSegment::CurveTo(
                Point::new(p[0], p[1]),
                Point::new(p[2], p[3]),
                Point::new(p[4], p[5]),
            ),
            PathCommand::ClosePath => PathSegment::ClosePath,
        })
    }
}

impl fmt::Display for PathBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = self.params.iter();
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", cmd.letter())?;
            for k in 0..cmd.param_count() {
                let Some(&v) = params.next() else {
                    return Err(fmt::Error);
                };
                // x,y pairs are comma-joined, pairs are space-separated.
                if k > 0 {
                    f.write_str(if k % 2 == 1 { "," } else { " " })?;
                }
                write_number(f, v)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for PathBuffer {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::path::parser::parse_path(s)
    }
}

/// Write `v` as the shortest decimal that round-trips, normalizing `-0` to `0`.
pub(crate) fn write_number(out: &mut impl fmt::Write, v: f64) -> fmt::Result {
    if v == 0.0 {
        out.write_char('0')
    } else {
        write!(out, "{v}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/buffer.rs"]
mod tests;

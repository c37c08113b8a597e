use crate::foundation::error::{MorphError, MorphResult};
use crate::path::buffer::PathBuffer;
use crate::path::cubic::{CubicPath, to_cubic_paths};
use crate::path::parser::parse_path;
use crate::path::serialize::cubic_path_to_string;
use std::borrow::Cow;

/// Interpolation contract for plain numeric values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with factor `t` (may overshoot `[0, 1]`).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl<const N: usize> Lerp for [f64; N] {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        std::array::from_fn(|k| <f64 as Lerp>::lerp(&a[k], &b[k], t))
    }
}

/// The required step of an interpolation strategy: blend two normalized values.
pub trait Interpolate {
    /// Normalized intermediate representation.
    type Value;

    /// Compute the value between `a` and `b` at progress `t`.
    fn compute(&self, a: &Self::Value, b: &Self::Value, t: f64) -> Self::Value;
}

/// Optional first step: bring two raw inputs into a common normalized form.
///
/// Both inputs are normalized together because their relationship can matter.
pub trait Normalize: Interpolate {
    /// Raw input accepted by [`Normalize::normalize`].
    type Input<'a>;

    /// Normalize `a` and `b`.
    fn normalize(
        &self,
        a: Self::Input<'_>,
        b: Self::Input<'_>,
    ) -> MorphResult<(Self::Value, Self::Value)>;
}

/// Optional last step: turn a computed value into its usable form.
pub trait Serve: Interpolate {
    /// Usable output type.
    type Output;

    /// Convert a computed value.
    fn serve(&self, value: &Self::Value) -> MorphResult<Self::Output>;
}

/// Elementwise interpolation of numeric sequences of possibly different lengths.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayInterpolator;

impl Interpolate for ArrayInterpolator {
    type Value = Vec<f64>;

    fn compute(&self, a: &Vec<f64>, b: &Vec<f64>, t: f64) -> Vec<f64> {
        interpolate_array(a, b, t)
    }
}

/// Interpolate two sequences index by index.
///
/// The shorter side is clamped to its last element. A non-finite `b` counts as `0`; where
/// `a` is non-finite (including a missing side) `b` passes through unchanged, which models
/// elements entering or leaving during a morph.
pub fn interpolate_array(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    fn clamped(v: &[f64], i: usize) -> f64 {
        v.get(i.min(v.len().saturating_sub(1)))
            .copied()
            .unwrap_or(f64::NAN)
    }

    let n = a.len().max(b.len());
    (0..n)
        .map(|i| {
            let av = clamped(a, i);
            let mut bv = clamped(b, i);
            if !bv.is_finite() {
                bv = 0.0;
            }
            if av.is_finite() {
                <f64 as Lerp>::lerp(&av, &bv, t)
            } else {
                bv
            }
        })
        .collect()
}

/// Independent interpolation of four color components (`r, g, b, a`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorInterpolator;

impl Interpolate for ColorInterpolator {
    type Value = [f64; 4];

    fn compute(&self, a: &[f64; 4], b: &[f64; 4], t: f64) -> [f64; 4] {
        <[f64; 4]>::lerp(a, b, t)
    }
}

/// De-interleaved coordinates of one cubic sub-path.
///
/// Invariant: `x.len() == y.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathCoords {
    /// X coordinates, start point first.
    pub x: Vec<f64>,
    /// Y coordinates, start point first.
    pub y: Vec<f64>,
}

impl PathCoords {
    /// Split a flat `x, y, x, y, ...` list into its axes.
    pub fn from_flat(flat: &[f64]) -> Self {
        let (x, y) = flat.chunks_exact(2).map(|xy| (xy[0], xy[1])).unzip();
        Self { x, y }
    }

    /// Re-interleave into a flat `x, y, x, y, ...` list.
    pub fn to_flat(&self) -> Vec<f64> {
        self.x
            .iter()
            .zip(&self.y)
            .flat_map(|(&x, &y)| [x, y])
            .collect()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Return `true` when there are no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// A path given either as path data or as an already parsed buffer.
#[derive(Debug, Clone, Copy)]
pub enum PathInput<'a> {
    /// SVG path-data string.
    Data(&'a str),
    /// Parsed path.
    Buffer(&'a PathBuffer),
}

impl<'a> From<&'a str> for PathInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Data(s)
    }
}

impl<'a> From<&'a PathBuffer> for PathInput<'a> {
    fn from(p: &'a PathBuffer) -> Self {
        Self::Buffer(p)
    }
}

impl PathInput<'_> {
    fn first_cubic(self) -> MorphResult<CubicPath> {
        let buffer = match self {
            Self::Data(s) => Cow::Owned(parse_path(s)?),
            Self::Buffer(b) => Cow::Borrowed(b),
        };
        to_cubic_paths(&buffer)
            .into_iter()
            .next()
            .ok_or(MorphError::EmptyPath)
    }
}

/// Morphs between two single-contour paths.
///
/// Only the first cubic sub-path of each side takes part. Point counts are aligned by the
/// array clamping rule, not by resampling, so very different point distributions morph
/// unevenly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathInterpolator;

impl Interpolate for PathInterpolator {
    type Value = PathCoords;

    fn compute(&self, a: &PathCoords, b: &PathCoords, t: f64) -> PathCoords {
        PathCoords {
            x: interpolate_array(&a.x, &b.x, t),
            y: interpolate_array(&a.y, &b.y, t),
        }
    }
}

impl Normalize for PathInterpolator {
    type Input<'a> = PathInput<'a>;

    fn normalize(
        &self,
        a: PathInput<'_>,
        b: PathInput<'_>,
    ) -> MorphResult<(PathCoords, PathCoords)> {
        let a = a.first_cubic()?;
        let b = b.first_cubic()?;
        Ok((PathCoords::from_flat(&a), PathCoords::from_flat(&b)))
    }
}

impl Serve for PathInterpolator {
    type Output = String;

    fn serve(&self, value: &PathCoords) -> MorphResult<String> {
        if value.x.len() != value.y.len() {
            return Err(MorphError::MismatchedAxes {
                x: value.x.len(),
                y: value.y.len(),
            });
        }
        cubic_path_to_string(&value.to_flat())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;

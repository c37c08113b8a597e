//! pathmorph parses SVG path data, normalizes it to cubic Bezier form and morphs between
//! shapes frame by frame.
//!
//! The pipeline:
//!
//! - [`parse_path`] turns path data into an absolute [`PathBuffer`]
//! - [`to_cubic_paths`] splits a buffer into cubic sub-paths
//! - [`PathInterpolator`] aligns two shapes and blends them at progress `t`
//! - [`cubic_path_to_string`] writes the blended coordinates back as path data
//!
//! [`PathMorph`] drives that pipeline from a [`FrameScheduler`], and [`Scene`] is a small
//! retained shape tree that redraws onto a [`DrawSurface`] only when something changed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod frame;
pub(crate) mod path;
pub(crate) mod scene;

pub use crate::foundation::core::{BezPath, Color, Point, Vec2};
pub use crate::foundation::error::{MorphError, MorphResult};

pub use crate::animation::ease::{Ease, EaseCurve};
pub use crate::animation::interpolate::{
    ArrayInterpolator, ColorInterpolator, Interpolate, Lerp, Normalize, PathCoords, PathInput,
    PathInterpolator, Serve, interpolate_array,
};
pub use crate::animation::morph::{MorphDef, PathMorph};
pub use crate::frame::scheduler::{
    FrameCallback, FrameRequestId, FrameRequester, FrameScheduler, FrameTick, WeakFrameCallback,
    WeakFrameScheduler,
};
pub use crate::path::buffer::{PathBuffer, PathCommand, PathSegment, Segments};
pub use crate::path::cubic::{CubicPath, to_cubic_paths};
pub use crate::path::parser::parse_path;
pub use crate::path::serialize::cubic_path_to_string;
pub use crate::scene::graph::{NodeId, Scene, SceneOpts};
pub use crate::scene::shape::{ArcShape, RectShape, Shape, ShapeKind, VisualAttrs};
pub use crate::scene::surface::{DrawCall, DrawSurface, RecordingSurface, replay_path};

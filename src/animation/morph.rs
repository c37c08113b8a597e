use crate::animation::ease::Ease;
use crate::animation::interpolate::{Interpolate, Normalize, PathCoords, PathInterpolator, Serve};
use crate::foundation::error::{MorphError, MorphResult};
use crate::frame::scheduler::{FrameCallback, FrameScheduler, FrameTick, WeakFrameCallback};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;

/// JSON-facing description of one path morph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MorphDef {
    /// Path data of the start shape.
    pub from: String,
    /// Path data of the end shape.
    pub to: String,
    /// Time before the morph starts moving.
    #[serde(default)]
    pub delay_ms: f64,
    /// Time from first movement to the end shape.
    pub duration_ms: f64,
    /// Timing function, e.g. `"quadInOut"`.
    #[serde(default)]
    pub ease: Ease,
}

impl MorphDef {
    /// Parse a morph definition from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> MorphResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MorphError::config(format!("parse morph JSON: {e}")))
    }

    /// Parse a morph definition from a JSON string.
    pub fn from_json_str(s: &str) -> MorphResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a morph definition from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MorphResult<Self> {
        let path = path.as_ref();
        let f =
            File::open(path).with_context(|| format!("open morph JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check timing values. Path data is checked by [`PathMorph::from_def`].
    pub fn validate(&self) -> MorphResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(MorphError::config(format!(
                "duration_ms must be a positive number, got {}",
                self.duration_ms
            )));
        }
        if !self.delay_ms.is_finite() || self.delay_ms < 0.0 {
            return Err(MorphError::config(format!(
                "delay_ms must be a non-negative number, got {}",
                self.delay_ms
            )));
        }
        Ok(())
    }
}

/// A prepared morph between two paths, sampled by elapsed time.
#[derive(Debug, Clone)]
pub struct PathMorph {
    from: PathCoords,
    to: PathCoords,
    delay_ms: f64,
    duration_ms: f64,
    ease: Ease,
}

impl PathMorph {
    /// Validate `def` and normalize both paths once.
    #[tracing::instrument(skip(def), fields(duration_ms = def.duration_ms))]
    pub fn from_def(def: &MorphDef) -> MorphResult<Self> {
        def.validate()?;
        let (from, to) =
            PathInterpolator.normalize(def.from.as_str().into(), def.to.as_str().into())?;
        Ok(Self {
            from,
            to,
            delay_ms: def.delay_ms,
            duration_ms: def.duration_ms,
            ease: def.ease,
        })
    }

    /// Eased progress after `elapsed_ms`. Exactly `1.0` once the duration has passed, even
    /// for curves that do not land on 1.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        let t = ((elapsed_ms - self.delay_ms) / self.duration_ms).clamp(0.0, 1.0);
        if t >= 1.0 { 1.0 } else { self.ease.apply(t) }
    }

    /// Interpolated coordinates after `elapsed_ms`.
    pub fn coords_at(&self, elapsed_ms: f64) -> PathCoords {
        PathInterpolator.compute(&self.from, &self.to, self.progress(elapsed_ms))
    }

    /// Path data after `elapsed_ms`.
    pub fn sample(&self, elapsed_ms: f64) -> MorphResult<String> {
        PathInterpolator.serve(&self.coords_at(elapsed_ms))
    }

    /// Return `true` once the end shape has been reached.
    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms - self.delay_ms >= self.duration_ms
    }

    /// Run the morph on `scheduler`, handing each frame's path data to `on_frame`.
    ///
    /// Time starts at the first frame. The callback unregisters itself after delivering the
    /// end shape; pass the returned handle to [`FrameScheduler::remove`] to stop earlier.
    pub fn play<F>(self, scheduler: &FrameScheduler, mut on_frame: F) -> FrameCallback
    where
        F: FnMut(&str) + 'static,
    {
        let slot: Rc<RefCell<Option<WeakFrameCallback>>> = Rc::default();
        let me = slot.clone();
        let sched = scheduler.downgrade();
        let mut started: Option<f64> = None;

        let cb = FrameCallback::new(move |tick: &FrameTick| {
            let start = *started.get_or_insert(tick.now_ms);
            let elapsed = tick.now_ms - start;
            let done = match self.sample(elapsed) {
                Ok(d) => {
                    on_frame(&d);
                    self.is_finished(elapsed)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "morph frame failed, stopping");
                    true
                }
            };
            if !done {
                return;
            }
            let me = me.borrow().as_ref().and_then(WeakFrameCallback::upgrade);
            if let (Some(me), Some(sched)) = (me, sched.upgrade()) {
                sched.remove(&me);
            }
        });
        *slot.borrow_mut() = Some(cb.downgrade());
        scheduler.add(cb.clone());
        cb
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/morph.rs"]
mod tests;

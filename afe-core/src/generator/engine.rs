//! Interface to the modeling engine that owns sketches, planes and solids.

use serde::Serialize;

use crate::error::Result;
use crate::model::Curve;

/// Handle to a construction plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlaneId(pub usize);

/// Handle to a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SketchId(pub usize);

/// Handle to an extrude or cut feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureId(pub usize);

/// What an extrude does with the swept profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureOperation {
    /// Create a new solid body.
    NewBody,
    /// Remove material from existing bodies.
    Cut,
}

/// One extrude/cut request against a sketch profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtrudeRequest {
    pub sketch: SketchId,
    /// Index of the profile within the sketch.
    pub profile: usize,
    /// One-sided extent.
    pub distance: f64,
    pub operation: FeatureOperation,
    /// Name given to the resulting body, if any.
    pub body_name: Option<String>,
}

/// Operations the importer needs from a CAD/modeling host.
///
/// Every feature-producing call appends one entry to the host's timeline.
pub trait ModelingEngine {
    /// The plane all sketches are laid out on.
    fn base_plane(&self) -> PlaneId;

    /// Create a plane parallel to `base` at `offset`.
    fn add_offset_plane(&mut self, base: PlaneId, offset: f64) -> Result<PlaneId>;

    /// Create an empty named sketch on a plane.
    fn add_sketch(&mut self, plane: PlaneId, name: &str) -> Result<SketchId>;

    /// Suspend or resume incremental recompute of a sketch.
    fn set_compute_deferred(&mut self, sketch: SketchId, deferred: bool) -> Result<()>;

    /// Add one curve to a sketch.
    fn add_curve(&mut self, sketch: SketchId, curve: Curve) -> Result<()>;

    /// Number of closed profiles the sketch currently bounds.
    fn profile_count(&self, sketch: SketchId) -> Result<usize>;

    /// Extrude or cut one profile.
    fn extrude(&mut self, request: ExtrudeRequest) -> Result<FeatureId>;

    /// Current number of timeline entries.
    fn timeline_len(&self) -> usize;

    /// Collapse timeline entries `start..=end` into one group.
    fn group_timeline(&mut self, start: usize, end: usize) -> Result<()>;
}

/// Run `f` with the sketch's recompute deferred, then resume it.
///
/// Compute is resumed even if `f` fails; `f`'s error wins.
pub fn with_deferred_compute<E, T, F>(engine: &mut E, sketch: SketchId, f: F) -> Result<T>
where
    E: ModelingEngine + ?Sized,
    F: FnOnce(&mut E) -> Result<T>,
{
    engine.set_compute_deferred(sketch, true)?;
    let result = f(engine);
    let resumed = engine.set_compute_deferred(sketch, false);
    let value = result?;
    resumed?;
    Ok(value)
}

//! In-memory modeling engine that records every request.

use serde::Serialize;

use super::engine::{ExtrudeRequest, FeatureId, ModelingEngine, PlaneId, SketchId};
use crate::error::{ImportError, Result};
use crate::model::Curve;

/// A recorded construction plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedPlane {
    /// Absolute offset from the base plane.
    pub offset: f64,
}

/// A recorded sketch and its curves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedSketch {
    pub name: String,
    pub plane: PlaneId,
    pub curves: Vec<Curve>,
    /// Whether recompute is currently deferred.
    pub deferred: bool,
    /// Number of times recompute was deferred.
    pub batches: usize,
    /// Curves added while recompute was live.
    pub live_inserts: usize,
}

/// One entry of the recorded timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TimelineEntry {
    Plane(usize),
    Sketch(usize),
    Feature(usize),
}

/// Modeling engine that keeps everything in memory.
///
/// Closed profiles are counted per sketch: each circle is one profile and
/// each pair of arcs closes one stadium outline.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingEngine {
    pub planes: Vec<RecordedPlane>,
    pub sketches: Vec<RecordedSketch>,
    pub features: Vec<ExtrudeRequest>,
    pub timeline: Vec<TimelineEntry>,
    /// Timeline groups as inclusive `(start, end)` ranges.
    pub groups: Vec<(usize, usize)>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingEngine {
    /// Create an engine holding only the base plane.
    pub fn new() -> Self {
        Self {
            planes: vec![RecordedPlane { offset: 0.0 }],
            sketches: Vec::new(),
            features: Vec::new(),
            timeline: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Look up a sketch.
    pub fn sketch(&self, id: SketchId) -> Result<&RecordedSketch> {
        self.sketches.get(id.0).ok_or_else(|| ImportError::Engine {
            message: format!("unknown sketch {}", id.0),
        })
    }

    fn sketch_mut(&mut self, id: SketchId) -> Result<&mut RecordedSketch> {
        self.sketches.get_mut(id.0).ok_or_else(|| ImportError::Engine {
            message: format!("unknown sketch {}", id.0),
        })
    }

    /// Find a sketch by name.
    pub fn sketch_named(&self, name: &str) -> Option<&RecordedSketch> {
        self.sketches.iter().find(|s| s.name == name)
    }

    /// Offset of a plane from the base plane.
    pub fn plane_offset(&self, id: PlaneId) -> Result<f64> {
        self.planes
            .get(id.0)
            .map(|p| p.offset)
            .ok_or_else(|| ImportError::Engine {
                message: format!("unknown plane {}", id.0),
            })
    }
}

impl ModelingEngine for RecordingEngine {
    fn base_plane(&self) -> PlaneId {
        PlaneId(0)
    }

    fn add_offset_plane(&mut self, base: PlaneId, offset: f64) -> Result<PlaneId> {
        let base_offset = self.plane_offset(base)?;
        self.planes.push(RecordedPlane {
            offset: base_offset + offset,
        });
        let id = self.planes.len() - 1;
        self.timeline.push(TimelineEntry::Plane(id));
        Ok(PlaneId(id))
    }

    fn add_sketch(&mut self, plane: PlaneId, name: &str) -> Result<SketchId> {
        self.plane_offset(plane)?;
        self.sketches.push(RecordedSketch {
            name: name.to_string(),
            plane,
            curves: Vec::new(),
            deferred: false,
            batches: 0,
            live_inserts: 0,
        });
        let id = self.sketches.len() - 1;
        self.timeline.push(TimelineEntry::Sketch(id));
        Ok(SketchId(id))
    }

    fn set_compute_deferred(&mut self, sketch: SketchId, deferred: bool) -> Result<()> {
        let sketch = self.sketch_mut(sketch)?;
        if deferred && !sketch.deferred {
            sketch.batches += 1;
        }
        sketch.deferred = deferred;
        Ok(())
    }

    fn add_curve(&mut self, sketch: SketchId, curve: Curve) -> Result<()> {
        let sketch = self.sketch_mut(sketch)?;
        if !sketch.deferred {
            sketch.live_inserts += 1;
        }
        sketch.curves.push(curve);
        Ok(())
    }

    fn profile_count(&self, sketch: SketchId) -> Result<usize> {
        let sketch = self.sketch(sketch)?;
        let circles = sketch.curves.iter().filter(|c| c.is_closed()).count();
        let arcs = sketch
            .curves
            .iter()
            .filter(|c| matches!(c, Curve::Arc(_)))
            .count();
        Ok(circles + arcs / 2)
    }

    fn extrude(&mut self, request: ExtrudeRequest) -> Result<FeatureId> {
        let available = self.profile_count(request.sketch)?;
        if request.profile >= available {
            return Err(ImportError::Engine {
                message: format!(
                    "sketch {} has no profile {}",
                    request.sketch.0, request.profile
                ),
            });
        }
        self.features.push(request);
        let id = self.features.len() - 1;
        self.timeline.push(TimelineEntry::Feature(id));
        Ok(FeatureId(id))
    }

    fn timeline_len(&self) -> usize {
        self.timeline.len()
    }

    fn group_timeline(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end || end >= self.timeline.len() {
            return Err(ImportError::Engine {
                message: format!(
                    "invalid timeline group {}..={} (timeline has {} entries)",
                    start,
                    end,
                    self.timeline.len()
                ),
            });
        }
        self.groups.push((start, end));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::engine::{with_deferred_compute, FeatureOperation};
    use crate::model::{Arc, Point2D, Segment};
    use std::f64::consts::PI;

    fn line() -> Curve {
        Curve::Line(Segment::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)))
    }

    #[test]
    fn test_offset_planes_accumulate() {
        let mut engine = RecordingEngine::new();
        let base = engine.base_plane();
        let p1 = engine.add_offset_plane(base, 0.5).unwrap();
        let p2 = engine.add_offset_plane(p1, 0.25).unwrap();
        assert_eq!(engine.plane_offset(p2).unwrap(), 0.75);
        assert_eq!(engine.timeline_len(), 2);
    }

    #[test]
    fn test_deferred_batch_records_inserts() {
        let mut engine = RecordingEngine::new();
        let base = engine.base_plane();
        let sketch = engine.add_sketch(base, "S").unwrap();

        with_deferred_compute(&mut engine, sketch, |e| {
            e.add_curve(sketch, line())?;
            e.add_curve(sketch, line())
        })
        .unwrap();
        engine.add_curve(sketch, line()).unwrap();

        let recorded = engine.sketch(sketch).unwrap();
        assert!(!recorded.deferred);
        assert_eq!(recorded.batches, 1);
        assert_eq!(recorded.curves.len(), 3);
        assert_eq!(recorded.live_inserts, 1);
    }

    #[test]
    fn test_deferred_compute_resumes_on_error() {
        let mut engine = RecordingEngine::new();
        let base = engine.base_plane();
        let sketch = engine.add_sketch(base, "S").unwrap();

        let result: Result<()> = with_deferred_compute(&mut engine, sketch, |e| {
            e.add_curve(SketchId(42), line())
        });
        assert!(matches!(result, Err(ImportError::Engine { .. })));
        assert!(!engine.sketch(sketch).unwrap().deferred);
    }

    #[test]
    fn test_profile_count() {
        let mut engine = RecordingEngine::new();
        let base = engine.base_plane();
        let sketch = engine.add_sketch(base, "S").unwrap();
        let arc = Curve::Arc(Arc::new(Point2D::new(0.0, 0.0), Point2D::new(0.0, 1.0), PI));
        for curve in [line(), arc, line(), arc] {
            engine.add_curve(sketch, curve).unwrap();
        }
        engine
            .add_curve(
                sketch,
                Curve::Circle {
                    center: Point2D::new(0.0, 0.0),
                    radius: 0.1,
                },
            )
            .unwrap();
        assert_eq!(engine.profile_count(sketch).unwrap(), 2);
    }

    #[test]
    fn test_extrude_unknown_profile_fails() {
        let mut engine = RecordingEngine::new();
        let base = engine.base_plane();
        let sketch = engine.add_sketch(base, "S").unwrap();
        let result = engine.extrude(ExtrudeRequest {
            sketch,
            profile: 0,
            distance: 1.0,
            operation: FeatureOperation::NewBody,
            body_name: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_group_timeline_bounds() {
        let mut engine = RecordingEngine::new();
        let base = engine.base_plane();
        engine.add_offset_plane(base, 1.0).unwrap();
        engine.add_offset_plane(base, 2.0).unwrap();
        assert!(engine.group_timeline(0, 1).is_ok());
        assert!(engine.group_timeline(1, 2).is_err());
        assert!(engine.group_timeline(1, 0).is_err());
        assert_eq!(engine.groups, vec![(0, 1)]);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut engine = RecordingEngine::new();
        let base = engine.base_plane();
        let plane = engine.add_offset_plane(base, 0.5).unwrap();
        engine.add_sketch(plane, "Part - 0").unwrap();

        let json = serde_json::to_value(&engine).unwrap();
        assert_eq!(json["planes"][1]["offset"], 0.5);
        assert_eq!(json["sketches"][0]["name"], "Part - 0");
        assert_eq!(json["sketches"][0]["plane"], 1);
        assert_eq!(
            json["timeline"],
            serde_json::json!([{"kind": "plane", "id": 1}, {"kind": "sketch", "id": 0}])
        );
    }
}

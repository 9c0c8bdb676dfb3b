//! Geometry emission to a modeling engine, plus DXF export.

mod dxf;
mod emit;
mod engine;
mod recorder;

pub use dxf::{generate_dxf, layer_name, DxfColors, DxfWriter};
pub use emit::{emit_drawing, EmitSummary, HOLES_SKETCH, REFERENCE_SKETCH};
pub use engine::{
    with_deferred_compute, ExtrudeRequest, FeatureId, FeatureOperation, ModelingEngine, PlaneId,
    SketchId,
};
pub use recorder::{RecordedPlane, RecordedSketch, RecordingEngine, TimelineEntry};

//! Emission of the reference diagram and part geometry to a modeling engine.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::engine::{
    with_deferred_compute, ExtrudeRequest, FeatureOperation, ModelingEngine, SketchId,
};
use crate::error::Result;
use crate::model::{Curve, Model, PlacedOutline, Segment};
use crate::transform::{synthesize_all, LayoutPlanner};

/// Name of the sketch holding the original member lines.
pub const REFERENCE_SKETCH: &str = "Instructions";

/// Name of the sketch holding the joint hole circles.
pub const HOLES_SKETCH: &str = "PartsHoles";

/// What one emission run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmitSummary {
    /// Member lines drawn in the reference sketch.
    pub reference_lines: usize,
    /// Parts laid out on their own planes.
    pub parts: usize,
    /// New-body extrudes.
    pub extrudes: usize,
    /// Hole cuts.
    pub cuts: usize,
    /// Timeline range grouped into one unit, if any.
    pub timeline_group: Option<(usize, usize)>,
}

/// Draw the reference diagram and, if `extrude` is set, the parts.
///
/// Geometry is only generated for members whose joints resolve; others are
/// logged and skipped. Both passes walk the components in model order.
pub fn emit_drawing<E>(model: &Model, extrude: bool, engine: &mut E) -> Result<EmitSummary>
where
    E: ModelingEngine + ?Sized,
{
    let mut summary = EmitSummary {
        reference_lines: emit_reference(model, engine)?,
        ..Default::default()
    };

    if !extrude {
        info!(
            "Drew {} member line(s), extrusion disabled",
            summary.reference_lines
        );
        return Ok(summary);
    }

    let planner = LayoutPlanner::from_dimensions(&model.dimensions);
    let placed = planner.plan(synthesize_all(model));
    summary.parts = placed.len();

    let (part_sketches, holes) = emit_parts(model, &placed, engine)?;

    // Everything from here on is grouped on the timeline.
    let timeline_start = engine.timeline_len();

    for (plane_index, sketch) in &part_sketches {
        for profile in 0..engine.profile_count(*sketch)? {
            engine.extrude(ExtrudeRequest {
                sketch: *sketch,
                profile,
                distance: model.dimensions.extrude_distance,
                operation: FeatureOperation::NewBody,
                body_name: Some(format!("AFE Part - {}.{}", plane_index, profile)),
            })?;
            summary.extrudes += 1;
        }
    }

    let cut_depth = planner.cut_depth(part_sketches.len());
    for profile in 0..engine.profile_count(holes)? {
        engine.extrude(ExtrudeRequest {
            sketch: holes,
            profile,
            distance: cut_depth,
            operation: FeatureOperation::Cut,
            body_name: None,
        })?;
        summary.cuts += 1;
    }

    if let Some(timeline_end) = engine.timeline_len().checked_sub(1) {
        if timeline_end > timeline_start {
            engine.group_timeline(timeline_start, timeline_end)?;
            summary.timeline_group = Some((timeline_start, timeline_end));
        }
    }

    info!(
        "Drew {} member line(s), {} part(s), {} extrude(s), {} cut(s)",
        summary.reference_lines, summary.parts, summary.extrudes, summary.cuts
    );

    Ok(summary)
}

/// Draw one line per resolvable member on the base plane.
fn emit_reference<E>(model: &Model, engine: &mut E) -> Result<usize>
where
    E: ModelingEngine + ?Sized,
{
    let base = engine.base_plane();
    let sketch = engine.add_sketch(base, REFERENCE_SKETCH)?;

    with_deferred_compute(engine, sketch, |engine| {
        let mut lines = 0;
        for member in model.components.values() {
            match model.scaled_endpoints(member) {
                Ok((start, end)) => {
                    engine.add_curve(sketch, Curve::Line(Segment::new(start, end)))?;
                    lines += 1;
                }
                Err(diag) => warn!("Skipping component {}: {}", member.id, diag),
            }
        }
        Ok(lines)
    })
}

/// Draw each part on its own plane and all holes in one shared sketch.
///
/// Returns the part sketches with their plane index, and the holes sketch.
fn emit_parts<E>(
    model: &Model,
    placed: &[PlacedOutline],
    engine: &mut E,
) -> Result<(Vec<(usize, SketchId)>, SketchId)>
where
    E: ModelingEngine + ?Sized,
{
    let base = engine.base_plane();
    let holes = engine.add_sketch(base, HOLES_SKETCH)?;
    let hole_radius = model.dimensions.hole_radius();

    let part_sketches = with_deferred_compute(engine, holes, |engine| {
        let mut part_sketches = Vec::with_capacity(placed.len());

        for part in placed {
            let plane = engine.add_offset_plane(base, part.plane_offset)?;
            let sketch = engine.add_sketch(plane, &part.sketch_name())?;
            debug!(
                "Part {} (member {}) at offset {}",
                part.plane_index, part.outline.member_id, part.plane_offset
            );

            with_deferred_compute(engine, sketch, |engine| {
                for curve in part.outline.boundary() {
                    engine.add_curve(sketch, curve)?;
                }
                Ok(())
            })?;

            for center in part.outline.hole_centers() {
                engine.add_curve(
                    holes,
                    Curve::Circle {
                        center,
                        radius: hole_radius,
                    },
                )?;
            }

            part_sketches.push((part.plane_index, sketch));
        }

        Ok(part_sketches)
    })?;

    Ok((part_sketches, holes))
}

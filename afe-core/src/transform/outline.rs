//! Stadium outline synthesis for members.

use std::f64::consts::{FRAC_PI_2, PI};
use tracing::{debug, warn};

use crate::config::float_cmp::approx_zero;
use crate::model::{Arc, Component, Model, Outline, Point2D, Segment};

/// Build the outline of a strip of half-width `half_width` from `p0` to `p1`.
///
/// The edge offsets come from rotating `(half_width, 0)` about the
/// coordinate origin by the member angle ±90°, then adding the result to
/// each endpoint. Holes sit exactly on the endpoints.
pub fn outline_between(member_id: &str, p0: Point2D, p1: Point2D, half_width: f64) -> Outline {
    let angle = (p1.y - p0.y).atan2(p1.x - p0.x);

    let radial = Point2D::new(half_width, 0.0);
    let offset1 = radial.rotate_about(angle + FRAC_PI_2, Point2D::default());
    let offset2 = radial.rotate_about(angle - FRAC_PI_2, Point2D::default());

    let edge1 = Segment::new(p0 + offset1, p1 + offset1);
    let edge2 = Segment::new(p0 + offset2, p1 + offset2);

    Outline {
        member_id: member_id.to_string(),
        edge1,
        edge2,
        start_cap: Arc::new(p0, edge1.start, PI),
        end_cap: Arc::new(p1, edge2.end, PI),
        hole1_center: p0,
        hole2_center: p1,
    }
}

/// Synthesize the outline of one member using the model's scale.
///
/// Returns `None` (and logs) if either endpoint cannot be resolved.
pub fn synthesize(model: &Model, member: &Component, half_width: f64) -> Option<Outline> {
    let (p0, p1) = match model.scaled_endpoints(member) {
        Ok(points) => points,
        Err(diag) => {
            warn!("Skipping component {}: {}", member.id, diag);
            return None;
        }
    };

    if approx_zero(p0.distance_to(p1)) {
        debug!("Component {} has zero length", member.id);
    }

    Some(outline_between(&member.id, p0, p1, half_width))
}

/// Synthesize outlines for every resolvable member, in component order.
pub fn synthesize_all(model: &Model) -> Vec<Outline> {
    let half_width = model.dimensions.half_width();
    model
        .components
        .values()
        .filter_map(|member| synthesize(model, member, half_width))
        .collect()
}

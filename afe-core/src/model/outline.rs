//! Part outline for one member.

use serde::Serialize;

use super::{Arc, Curve, Point2D, Segment};

/// Stadium-shaped part outline with its two joint holes.
///
/// `edge1` and `edge2` run parallel to the member, `start_cap` and
/// `end_cap` are semicircles closing the ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outline {
    /// `ObjectId` of the member.
    pub member_id: String,
    pub edge1: Segment,
    pub edge2: Segment,
    pub start_cap: Arc,
    pub end_cap: Arc,
    pub hole1_center: Point2D,
    pub hole2_center: Point2D,
}

impl Outline {
    /// Boundary curves in drawing order: edge 1, start cap, edge 2, end cap.
    pub fn boundary(&self) -> [Curve; 4] {
        [
            Curve::Line(self.edge1),
            Curve::Arc(self.start_cap),
            Curve::Line(self.edge2),
            Curve::Arc(self.end_cap),
        ]
    }

    /// Hole centers, start joint first.
    pub fn hole_centers(&self) -> [Point2D; 2] {
        [self.hole1_center, self.hole2_center]
    }
}

/// An outline assigned to its own placement plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedOutline {
    pub outline: Outline,
    /// Position in the planned sequence, starting at 0.
    pub plane_index: usize,
    /// Offset of the part plane from the base plane.
    pub plane_offset: f64,
}

impl PlacedOutline {
    /// Sketch name for this part.
    pub fn sketch_name(&self) -> String {
        format!("Part - {}", self.plane_index)
    }
}

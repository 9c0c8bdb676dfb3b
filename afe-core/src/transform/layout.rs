//! Placement of part outlines on separate planes.

use crate::config::{Dimensions, PLANE_CLEARANCE_FACTOR};
use crate::model::{Outline, PlacedOutline};

/// Assigns each outline its own plane so extruded parts never touch.
///
/// Plane `i` sits at `i × extrude_distance × 1.2` from the base plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPlanner {
    plane_spacing: f64,
}

impl LayoutPlanner {
    /// Create a planner for parts of the given thickness.
    pub fn new(extrude_distance: f64) -> Self {
        Self {
            plane_spacing: extrude_distance * PLANE_CLEARANCE_FACTOR,
        }
    }

    /// Create a planner from the configured dimensions.
    pub fn from_dimensions(dimensions: &Dimensions) -> Self {
        Self {
            plane_spacing: dimensions.plane_spacing(),
        }
    }

    /// Distance between consecutive part planes.
    pub fn plane_spacing(&self) -> f64 {
        self.plane_spacing
    }

    /// Offset of the plane with the given index.
    pub fn plane_offset(&self, plane_index: usize) -> f64 {
        plane_index as f64 * self.plane_spacing
    }

    /// Depth of a hole cut that passes through all `part_count` planes.
    pub fn cut_depth(&self, part_count: usize) -> f64 {
        self.plane_offset(part_count + 1)
    }

    /// Place outlines in the order given; plane index = position.
    pub fn plan(&self, outlines: Vec<Outline>) -> Vec<PlacedOutline> {
        outlines
            .into_iter()
            .enumerate()
            .map(|(plane_index, outline)| PlacedOutline {
                outline,
                plane_index,
                plane_offset: self.plane_offset(plane_index),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point2D;
    use crate::transform::outline_between;

    const EPS: f64 = 1e-9;

    fn outlines(n: usize) -> Vec<Outline> {
        (0..n)
            .map(|i| {
                outline_between(
                    &format!("m{}", i),
                    Point2D::new(i as f64, 0.0),
                    Point2D::new(i as f64, 1.0),
                    0.25,
                )
            })
            .collect()
    }

    #[test]
    fn test_plan_indices_follow_input_order() {
        let placed = LayoutPlanner::new(0.3).plan(outlines(5));
        let indices: Vec<_> = placed.iter().map(|p| p.plane_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        let ids: Vec<_> = placed.iter().map(|p| p.outline.member_id.as_str()).collect();
        assert_eq!(ids, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn test_plan_offsets() {
        let planner = LayoutPlanner::new(0.5);
        let placed = planner.plan(outlines(3));
        assert!((placed[0].plane_offset - 0.0).abs() < EPS);
        assert!((placed[1].plane_offset - 0.6).abs() < EPS);
        assert!((placed[2].plane_offset - 1.2).abs() < EPS);
    }

    #[test]
    fn test_adjacent_parts_have_clearance() {
        let extrude = 0.3;
        let placed = LayoutPlanner::new(extrude).plan(outlines(4));
        for pair in placed.windows(2) {
            let gap = pair[1].plane_offset - (pair[0].plane_offset + extrude);
            assert!(gap > 0.0);
        }
    }

    #[test]
    fn test_plan_empty() {
        assert!(LayoutPlanner::new(1.0).plan(Vec::new()).is_empty());
    }

    #[test]
    fn test_cut_depth_spans_all_planes() {
        let planner = LayoutPlanner::from_dimensions(&Dimensions::default());
        assert!((planner.plane_spacing() - 0.36).abs() < EPS);
        assert!((planner.cut_depth(4) - 1.8).abs() < EPS);
    }

    #[test]
    fn test_from_dimensions_uses_extrude_distance() {
        let dims = Dimensions {
            extrude_distance: 2.5,
            ..Dimensions::default()
        };
        let planner = LayoutPlanner::from_dimensions(&dims);
        assert_eq!(planner, LayoutPlanner::new(2.5));
        assert!((planner.plane_offset(2) - 6.0).abs() < EPS);
    }

    #[test]
    fn test_sketch_names() {
        let placed = LayoutPlanner::new(1.0).plan(outlines(2));
        assert_eq!(placed[1].sketch_name(), "Part - 1");
    }
}

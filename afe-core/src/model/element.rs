//! Diagram elements: joints, components (members) and supports.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Point2D;

/// A labeled point on a joint, in the diagram's length unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub label: String,
    pub point: Point2D,
}

/// A pin/connection in the diagram.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Joint {
    /// `ObjectId` of the element.
    pub id: String,
    /// Points in source order. Labels need not be unique.
    pub points: Vec<LabeledPoint>,
}

impl Joint {
    /// Create a joint with no points.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            points: Vec::new(),
        }
    }

    /// Add a labeled point.
    pub fn with_point(mut self, label: impl Into<String>, x: f64, y: f64) -> Self {
        self.points.push(LabeledPoint {
            label: label.into(),
            point: Point2D::new(x, y),
        });
        self
    }

    /// Find the first point with an exactly matching label.
    pub fn point(&self, label: &str) -> Option<Point2D> {
        self.points
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.point)
    }
}

/// A straight structural member between two joints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Component {
    /// `ObjectId` of the element.
    pub id: String,
    /// `StartJoint.ObjId`
    pub start_joint: String,
    /// `EndJoint.ObjId`
    pub end_joint: String,
}

impl Component {
    pub fn new(
        id: impl Into<String>,
        start_joint: impl Into<String>,
        end_joint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start_joint: start_joint.into(),
            end_joint: end_joint.into(),
        }
    }
}

/// A boundary condition element, carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Support {
    /// `ObjectId` of the element.
    pub id: String,
    /// All attributes of the element, in source order.
    pub attributes: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lookup_exact_label() {
        let joint = Joint::new("3")
            .with_point("Load", 1.0, 1.0)
            .with_point("Origin", 2.0, 5.0);
        assert_eq!(joint.point("Origin"), Some(Point2D::new(2.0, 5.0)));
        assert_eq!(joint.point("origin"), None);
    }

    #[test]
    fn test_point_lookup_first_match_wins() {
        let joint = Joint::new("1")
            .with_point("Origin", 0.0, 0.0)
            .with_point("Origin", 9.0, 9.0);
        assert_eq!(joint.point("Origin"), Some(Point2D::new(0.0, 0.0)));
    }

    #[test]
    fn test_point_lookup_not_found() {
        assert_eq!(Joint::new("1").point("Origin"), None);
    }
}

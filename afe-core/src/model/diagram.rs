//! The in-memory diagram built from one AFE file.

use indexmap::IndexMap;
use serde::Serialize;

use super::{Component, Joint, Point2D, Support};
use crate::config::{Dimensions, LengthUnit, DEFAULT_TITLE, ORIGIN_LABEL};
use crate::error::{Diagnostic, Result};

/// Axis-aligned bounding box over all processed member endpoints.
///
/// Starts inverted (min = +inf, max = -inf) until a point is included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Bounds containing nothing.
    pub const EMPTY: Bounds = Bounds {
        x_min: f64::INFINITY,
        y_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        y_max: f64::NEG_INFINITY,
    };

    /// Grow to include a point.
    pub fn include(&mut self, p: Point2D) {
        self.x_min = self.x_min.min(p.x);
        self.y_min = self.y_min.min(p.y);
        self.x_max = self.x_max.max(p.x);
        self.y_max = self.y_max.max(p.y);
    }

    /// True until a point has been included.
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    pub fn width(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.x_max - self.x_min)
    }

    pub fn height(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.y_max - self.y_min)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Shortest and longest member length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthRange {
    pub min: f64,
    pub max: f64,
}

impl LengthRange {
    /// Range containing nothing.
    pub const EMPTY: LengthRange = LengthRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Widen to include a length.
    pub fn include(&mut self, len: f64) {
        self.min = self.min.min(len);
        self.max = self.max.max(len);
    }

    /// True until a length has been included.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A parsed ForceEffect diagram.
///
/// The element tables keep source order; every pass over `components`
/// sees members in the order they were read.
#[derive(Debug, Clone, Serialize)]
pub struct Model {
    /// Diagram title (`Title=`).
    pub title: String,
    /// Name of the file the diagram was read from.
    pub filename: String,
    /// Unit of all joint coordinates.
    pub length_unit: LengthUnit,
    /// Joints by `ObjectId`.
    pub joints: IndexMap<String, Joint>,
    /// Members by `ObjectId`.
    pub components: IndexMap<String, Component>,
    /// Supports by `ObjectId`.
    pub supports: IndexMap<String, Support>,
    /// Extents of all resolvable members, in centimeters.
    pub bounds: Bounds,
    /// Length extrema of all resolvable members, in centimeters.
    pub line_lengths: LengthRange,
    /// Part dimensions used when generating geometry.
    pub dimensions: Dimensions,
    /// Non-fatal problems found while building.
    pub diagnostics: Vec<Diagnostic>,
}

impl Model {
    /// Create an empty model.
    pub fn new(filename: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            filename: filename.into(),
            length_unit: LengthUnit::default(),
            joints: IndexMap::new(),
            components: IndexMap::new(),
            supports: IndexMap::new(),
            bounds: Bounds::EMPTY,
            line_lengths: LengthRange::EMPTY,
            dimensions,
            diagnostics: Vec::new(),
        }
    }

    /// Title shown for the generated drawing, e.g. `Truss(truss.afe)`.
    pub fn display_title(&self) -> String {
        format!("{}({})", self.title, self.filename)
    }

    /// True if no member could be resolved to two endpoints.
    pub fn is_empty(&self) -> bool {
        self.line_lengths.is_empty()
    }

    /// Replace the part dimensions after validating them.
    pub fn configure(mut self, dimensions: Dimensions) -> Result<Self> {
        dimensions.validate()?;
        self.dimensions = dimensions;
        Ok(self)
    }

    /// Resolve a member's `Origin` endpoints in centimeters, unscaled.
    pub fn canonical_endpoints(
        &self,
        component: &Component,
    ) -> std::result::Result<(Point2D, Point2D), Diagnostic> {
        let start = self.joint_origin(component, &component.start_joint)?;
        let end = self.joint_origin(component, &component.end_joint)?;
        Ok((start, end))
    }

    /// Resolve a member's endpoints in centimeters with the model scale applied.
    pub fn scaled_endpoints(
        &self,
        component: &Component,
    ) -> std::result::Result<(Point2D, Point2D), Diagnostic> {
        let (start, end) = self.canonical_endpoints(component)?;
        let scale = self.dimensions.scale;
        Ok((start.scaled(scale), end.scaled(scale)))
    }

    fn joint_origin(
        &self,
        component: &Component,
        joint_id: &str,
    ) -> std::result::Result<Point2D, Diagnostic> {
        let joint = self
            .joints
            .get(joint_id)
            .ok_or_else(|| Diagnostic::MissingReference {
                component_id: component.id.clone(),
                joint_id: joint_id.to_string(),
            })?;

        let p = joint
            .point(ORIGIN_LABEL)
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .ok_or_else(|| Diagnostic::MissingPoint {
                joint_id: joint.id.clone(),
                label: ORIGIN_LABEL.to_string(),
            })?;

        Ok(Point2D::new(
            self.length_unit.to_canonical(p.x),
            self.length_unit.to_canonical(p.y),
        ))
    }
}

//! Planar geometry primitives shared by outlines and sketches.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point in the sketch plane, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Uniformly scale about the coordinate origin.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Rotate about `origin` by `angle` radians (counter-clockwise).
    pub fn rotate_about(&self, angle: f64, origin: Point2D) -> Self {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;
        Self::new(cos * dx - sin * dy + origin.x, sin * dx + cos * dy + origin.y)
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Straight line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// Direction angle in radians.
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }
}

/// Circular arc given by center, start point and signed sweep.
///
/// Positive sweep runs counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2D,
    pub start: Point2D,
    pub sweep: f64,
}

impl Arc {
    pub fn new(center: Point2D, start: Point2D, sweep: f64) -> Self {
        Self {
            center,
            start,
            sweep,
        }
    }

    pub fn radius(&self) -> f64 {
        self.center.distance_to(self.start)
    }

    /// Angle of the start point as seen from the center, in radians.
    pub fn start_angle(&self) -> f64 {
        (self.start.y - self.center.y).atan2(self.start.x - self.center.x)
    }

    /// Point where the arc finishes.
    pub fn end(&self) -> Point2D {
        self.start.rotate_about(self.sweep, self.center)
    }
}

/// One curve in a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Curve {
    Line(Segment),
    Arc(Arc),
    Circle { center: Point2D, radius: f64 },
}

impl Curve {
    /// Check if this curve bounds a region on its own.
    pub fn is_closed(&self) -> bool {
        matches!(self, Curve::Circle { .. })
    }
}

//! Configuration constants and settings for the importer.

use crate::error::{ImportError, Result};
use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Files shorter than this cannot hold a binary header.
pub const MIN_FILE_LEN: usize = 20;

/// Number of leading bytes inspected to tell text from binary.
pub const SNIFF_LEN: usize = 16;

/// Offset of the little-endian markup length in a binary container.
pub const MARKUP_LEN_OFFSET: usize = 16;

/// Size of the fixed binary header preceding the markup.
pub const BINARY_HEADER_LEN: usize = 20;

/// Plane spacing as a multiple of the extrude distance.
pub const PLANE_CLEARANCE_FACTOR: f64 = 1.2;

/// Label of the joint point used as the member endpoint.
pub const ORIGIN_LABEL: &str = "Origin";

/// Title used when the file does not carry one.
pub const DEFAULT_TITLE: &str = "ForceEffect Import";

/// Default extrude distance in centimeters.
pub const DEFAULT_EXTRUDE_DISTANCE: f64 = 0.3;

/// Default strip width in centimeters.
pub const DEFAULT_COMPONENT_WIDTH: f64 = 0.5;

/// Default joint hole diameter in centimeters (1 mm).
pub const DEFAULT_JOINT_HOLE_DIAMETER: f64 = 0.1;

/// Conversion factor: foot to centimeter.
pub const CONV_FT_CM: f64 = 12.0 * 2.54;

/// Conversion factor: inch to centimeter.
pub const CONV_IN_CM: f64 = 2.54;

/// Conversion factor: millimeter to centimeter.
pub const CONV_MM_CM: f64 = 0.1;

/// Conversion factor: meter to centimeter.
pub const CONV_M_CM: f64 = 100.0;

/// Length unit declared by a diagram's `LengthUnit` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    Foot,
    Inch,
    Millimeter,
    Meter,
    /// Unrecognized unit string, values pass through unconverted.
    Other(String),
}

impl LengthUnit {
    /// Parse unit from the `LengthUnit=` attribute value.
    pub fn from_attr(s: &str) -> Self {
        match s {
            "ft" => LengthUnit::Foot,
            "in" => LengthUnit::Inch,
            "mm" => LengthUnit::Millimeter,
            "m" => LengthUnit::Meter,
            other => LengthUnit::Other(other.to_string()),
        }
    }

    /// Get the conversion factor from this unit to centimeters.
    ///
    /// Unknown units use a factor of 1.
    pub fn to_cm_factor(&self) -> f64 {
        match self {
            LengthUnit::Foot => CONV_FT_CM,
            LengthUnit::Inch => CONV_IN_CM,
            LengthUnit::Millimeter => CONV_MM_CM,
            LengthUnit::Meter => CONV_M_CM,
            LengthUnit::Other(_) => 1.0,
        }
    }

    /// Convert a value in this unit to canonical centimeters.
    pub fn to_canonical(&self, value: f64) -> f64 {
        match self {
            // Exact decimal division keeps 1 mm == 0.1 cm.
            LengthUnit::Millimeter => value / 10.0,
            _ => value * self.to_cm_factor(),
        }
    }

    /// Check if this unit was recognized.
    pub fn is_known(&self) -> bool {
        !matches!(self, LengthUnit::Other(_))
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthUnit::Foot => write!(f, "ft"),
            LengthUnit::Inch => write!(f, "in"),
            LengthUnit::Millimeter => write!(f, "mm"),
            LengthUnit::Meter => write!(f, "m"),
            LengthUnit::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Part dimensions, all in centimeters except the unitless scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Factor applied to the diagram when drawing.
    pub scale: f64,
    /// Full width of each member strip.
    pub component_width: f64,
    /// Thickness of each extruded part.
    pub extrude_distance: f64,
    /// Diameter of the pin holes at the joints.
    pub joint_hole_diameter: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            component_width: DEFAULT_COMPONENT_WIDTH,
            extrude_distance: DEFAULT_EXTRUDE_DISTANCE,
            joint_hole_diameter: DEFAULT_JOINT_HOLE_DIAMETER,
        }
    }
}

impl Dimensions {
    /// Reject any dimension that is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("scale", self.scale),
            ("component width", self.component_width),
            ("extrude distance", self.extrude_distance),
            ("joint hole diameter", self.joint_hole_diameter),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ImportError::Validation { field, value });
            }
        }

        Ok(())
    }

    /// Half the strip width, the offset of each outline edge.
    pub fn half_width(&self) -> f64 {
        self.component_width / 2.0
    }

    /// Distance between consecutive part planes.
    pub fn plane_spacing(&self) -> f64 {
        self.extrude_distance * PLANE_CLEARANCE_FACTOR
    }

    /// Radius of the joint hole circles.
    pub fn hole_radius(&self) -> f64 {
        self.joint_hole_diameter / 2.0
    }
}

/// Options collected by the front end for one import run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Part dimensions.
    pub dimensions: Dimensions,
    /// Whether to run the parts/extrusion pass.
    pub extrude: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            extrude: true,
        }
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }
}

/// Angle helpers.
pub mod angle {
    /// Normalize an angle in degrees to `[0, 360)`.
    #[inline]
    pub fn normalize_degrees(angle: f64) -> f64 {
        let a = angle.rem_euclid(360.0);
        if a >= 360.0 || a == 0.0 {
            0.0
        } else {
            a
        }
    }
}

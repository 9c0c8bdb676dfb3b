//! Data model types for ForceEffect import.

mod diagram;
mod element;
mod geometry;
mod outline;

pub use diagram::{Bounds, LengthRange, Model};
pub use element::{Component, Joint, LabeledPoint, Support};
pub use geometry::{Arc, Curve, Point2D, Segment};
pub use outline::{Outline, PlacedOutline};

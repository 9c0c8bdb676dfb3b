//! Geometry transformations from members to placed part outlines.

mod layout;
mod outline;

pub use layout::LayoutPlanner;
pub use outline::{outline_between, synthesize, synthesize_all};

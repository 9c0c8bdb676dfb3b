//! Validation of parsed models.

use crate::config::float_cmp;
use crate::model::Model;

/// Warnings found while inspecting a model.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Warning messages.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// True if nothing was worth reporting.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Inspect a built model.
///
/// Nothing here is fatal: members that cannot be drawn are already skipped
/// by emission, so problems only show up as warnings.
pub fn validate_model(model: &Model) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !model.length_unit.is_known() {
        result.add_warning(format!(
            "Unknown length unit '{}', coordinates used as-is",
            model.length_unit
        ));
    }

    for diagnostic in &model.diagnostics {
        result.add_warning(diagnostic.to_string());
    }

    for component in model.components.values() {
        if let Ok((start, end)) = model.canonical_endpoints(component) {
            if float_cmp::approx_zero(start.distance_to(end)) {
                result.add_warning(format!("Component {}: zero length", component.id));
            }
        }
    }

    if model.is_empty() {
        result.add_warning("Diagram has no drawable members");
    }

    result
}

//! afe-core - Core library for importing Autodesk ForceEffect diagrams.
//!
//! Reads `.afe` files (plain markup or the binary container), builds a model of
//! joints and members, and drives a [`ModelingEngine`] to draw the member
//! lines and, optionally, one extrudable stadium-shaped part per member with
//! joint holes cut through.
//!
//! # Example
//!
//! ```no_run
//! use afe_core::{import_afe_file, generate_dxf, ImportOptions, RecordingEngine};
//! use std::path::Path;
//!
//! let mut engine = RecordingEngine::new();
//! let options = ImportOptions::default();
//! let summary = import_afe_file(Path::new("truss.afe"), &options, &mut engine).unwrap();
//! println!("{} parts", summary.parts);
//! let dxf = generate_dxf(&engine, "truss").unwrap();
//! println!("{}", dxf);
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod transform;
pub mod validation;

// Re-exports for convenience
pub use config::{Dimensions, ImportOptions, LengthUnit};
pub use error::{Diagnostic, ImportError, Result};
pub use generator::{emit_drawing, generate_dxf, EmitSummary, ModelingEngine, RecordingEngine};
pub use model::{Component, Joint, Model, Outline, Point2D};
pub use parser::{parse_afe_bytes, parse_afe_file};
pub use validation::{validate_model, ValidationResult};

use std::path::Path;

/// Import an AFE file into a modeling engine.
///
/// This is the main high-level function that performs the full pipeline:
/// 1. Parse the file into a model with default dimensions
/// 2. Configure the model with the requested dimensions
/// 3. Draw the reference lines, then the parts if extrusion is enabled
///
/// Invalid dimensions fail in step 2, so nothing reaches the engine.
pub fn import_afe_file<E>(
    path: &Path,
    options: &ImportOptions,
    engine: &mut E,
) -> Result<EmitSummary>
where
    E: ModelingEngine + ?Sized,
{
    let model = parse_afe_file(path, Dimensions::default())?.configure(options.dimensions)?;

    let validation = validate_model(&model);
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }

    emit_drawing(&model, options.extrude, engine)
}

//! Model validation.

mod validate;

pub use validate::{validate_model, ValidationResult};

//! Error types for ForceEffect import.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for import processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found or unreadable (-1)
    Io = -1,
    /// Not a usable AFE container or markup (-2)
    InvalidFormat = -2,
    /// Markup has no Elements collection (-3)
    Decode = -3,
    /// Component references an unknown joint (E100)
    MissingReference = 100,
    /// Joint has no usable labeled point (E101)
    MissingPoint = 101,
    /// Dimension parameter out of range (E200)
    Validation = 200,
    /// Modeling engine rejected a request (E300)
    Engine = 300,
}

/// Fatal errors. Any of these aborts the import of a file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data file: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid {field}: must be > 0 (got {value})")]
    Validation { field: &'static str, value: f64 },

    #[error("Modeling engine error: {message}")]
    Engine { message: String },
}

impl ImportError {
    /// Shorthand for an [`ImportError::InvalidFormat`].
    pub fn invalid_format(message: impl Into<String>) -> Self {
        ImportError::InvalidFormat {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ImportError::FileNotFound { .. } | ImportError::Io(_) => ErrorCode::Io,
            ImportError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ImportError::Validation { .. } => ErrorCode::Validation,
            ImportError::Engine { .. } => ErrorCode::Engine,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

impl From<quick_xml::Error> for ImportError {
    fn from(err: quick_xml::Error) -> Self {
        ImportError::invalid_format(format!("markup decode failed: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for ImportError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ImportError::invalid_format(format!("bad attribute: {}", err))
    }
}

/// Non-fatal problems found while reading a diagram.
///
/// These are recorded on the model and logged; the affected member is
/// skipped and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("No Elements collection found, diagram is empty")]
    MissingElements,

    #[error("Component {component_id}: unable to find joint {joint_id}")]
    MissingReference {
        component_id: String,
        joint_id: String,
    },

    #[error("Joint {joint_id}: no usable '{label}' point")]
    MissingPoint { joint_id: String, label: String },
}

impl Diagnostic {
    /// Get the error code for this diagnostic.
    pub fn code(&self) -> ErrorCode {
        match self {
            Diagnostic::MissingElements => ErrorCode::Decode,
            Diagnostic::MissingReference { .. } => ErrorCode::MissingReference,
            Diagnostic::MissingPoint { .. } => ErrorCode::MissingPoint,
        }
    }
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # schemata-ir
//!
//! Instance representation and navigation for schema validation.
//!
//! Instances are read-only views over `serde_json::Value` trees. Each view
//! knows its identity URI and its JSON-pointer data path, so validation
//! errors can point back at the offending value. A missing property is
//! represented explicitly and is distinct from a JSON `null`.

/// Instance views with URI and pointer tracking.
pub mod instance;
/// Path navigation over raw values.
pub mod traversal;
/// Primitive type tags and value equality.
pub mod types;

/// Instance view over a raw value.
pub use instance::Instance;
/// Fragment and pointer navigation helpers.
pub use traversal::{
    Cursor, escape_pointer_token, extend_uri, fragment_segments, unescape_pointer_token,
};
/// Primitive type tags and numeric-aware equality.
pub use types::{PrimitiveType, json_equal};

use thiserror::Error;

/// Errors that can occur when navigating instances
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Value not found at path: {path}")]
    NotFound { path: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl Error {
    /// Build a not-found error with path context.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Crate-local result type for instance operations.
pub type Result<T> = std::result::Result<T, Error>;

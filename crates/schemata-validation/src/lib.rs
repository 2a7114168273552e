#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # schemata-validation
//!
//! Validates JSON instances against schemas held in a
//! [`schemata_schema::Environment`].
//!
//! Data problems never fail a call; they are collected into a
//! [`ValidationReport`] with the keyword, message, pointer and URIs of
//! every failed check.
//!
//! ## Example Usage
//!
//! ```rust
//! use schemata_schema::Draft;
//! use schemata_validation::ValidationEngine;
//! use serde_json::json;
//!
//! let mut env = Draft::Draft03.environment()?;
//! let engine = ValidationEngine::new();
//!
//! let schema = json!({"type": "object", "properties": {"age": {"type": "integer", "minimum": 0}}});
//! let report = engine.validate_value(&mut env, &json!({"age": -1}), &schema)?;
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.errors()[0].to_string(), "#/age: minimum: Number is less than the required minimum value");
//! # Ok::<(), schemata_validation::Error>(())
//! ```

pub mod engine;
pub mod formats;
pub mod reporter;
mod rules;

pub use engine::{INSTANCE_URI, KeywordValidator, SchemaRef, ValidationConfig, ValidationEngine};
pub use formats::{FormatCheck, FormatRegistry};
pub use reporter::{ValidationError, ValidationReport};

use thiserror::Error;

/// Errors that can occur during validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[from] schemata_schema::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Validate an instance against a raw schema in a fresh default-draft
/// environment
///
/// # Errors
///
/// Fails when the draft environment or the schema cannot be built.
pub fn validate(instance: &serde_json::Value, schema: &serde_json::Value) -> Result<ValidationReport> {
    let mut env = schemata_schema::Draft::default().environment()?;
    ValidationEngine::new().validate_value(&mut env, instance, schema)
}

#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # schemata-schema
//!
//! Schema model, attribute registry, environments and the built-in draft
//! meta-schemas.
//!
//! Schemas live in an [`Environment`]: an arena of [`SchemaNode`]s indexed
//! by URI. Each node is parsed with the keyword definitions of its
//! meta-schema, so the keywords a schema understands are themselves read
//! from a schema document. The drafts 00 to 03 are bootstrapped from their
//! own hyper-schemas:
//!
//! ```rust
//! use schemata_schema::{Draft, MetaSchema};
//! use serde_json::json;
//!
//! let mut env = Draft::Draft03.environment()?;
//! let id = env.create_schema(
//!     json!({"type": "string", "maxLength": 5}).into(),
//!     MetaSchema::Default,
//!     Some("http://example.com/short-string"),
//! )?;
//! assert_eq!(env.find_schema("http://example.com/short-string"), Some(id));
//! # Ok::<(), schemata_schema::Error>(())
//! ```

pub mod attributes;
pub mod drafts;
pub mod environment;
pub mod inheritance;
pub mod links;
pub mod loader;
pub mod model;
pub mod registry;

pub use attributes::{
    AcceptedType, AttributeDefinition, AttributeRegistry, AttributeValue, Dependency, Keyword,
    PatternSchema, TypeEntry, TypeName,
};
pub use drafts::{DEFAULT_ENVIRONMENT_ID, Draft, DraftSchemas};
pub use environment::{Environment, EnvironmentOptions, MetaSchema, SchemaSource};
pub use inheritance::{InheritanceGraph, inherits, merge_all, remove_keywords};
pub use links::Link;
pub use loader::SchemaLoader;
pub use model::{SchemaId, SchemaNode};
pub use registry::EnvironmentRegistry;

use thiserror::Error;

/// Errors that can occur when building or loading schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Inheritance error: {0}")]
    Inheritance(String),

    #[error("Schema nesting deeper than {depth} levels at {uri}")]
    DepthExceeded { uri: String, depth: usize },

    #[error("Unknown draft environment: {0}")]
    UnknownDraft(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

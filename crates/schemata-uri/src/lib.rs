#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # schemata-uri
//!
//! RFC 3986 URI handling for schema identifiers.
//!
//! Schema documents are keyed by absolute URIs, and every `$ref`, `id` or
//! link `href` has to be turned into one before lookup. This crate splits a
//! URI string into [`Components`], resolves a reference against a base, and
//! serializes components back into a canonical string (lowercase scheme and
//! host, dot segments removed, percent-encoding normalized).
//!
//! ```rust
//! use schemata_uri::{normalize, resolve};
//!
//! assert_eq!(
//!     resolve("http://example.com/a/b", "../c#x"),
//!     "http://example.com/c#x"
//! );
//! assert_eq!(normalize("HTTP://Example.COM/%7euser"), "http://example.com/~user");
//! ```

/// URI components and parsing options.
pub mod components;
/// Grammar-based parsing into components.
pub mod parser;
/// Reference resolution against a base URI.
pub mod resolver;
/// Serialization, dot-segment removal and percent-encoding.
pub mod serializer;

pub use components::{Components, ReferenceKind, UriOptions};
pub use parser::{parse, parse_with};
pub use resolver::{equal, normalize, resolve, resolve_components, resolve_with};
pub use serializer::{escape_component, remove_dot_segments, serialize, unescape_component};

use thiserror::Error;

/// Faults recorded while parsing a URI.
///
/// Parsing never fails outright; faults are collected on
/// [`Components::errors`] so tolerant callers can keep going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("URI is not strictly valid: {0}")]
    NotStrict(String),

    #[error("URI is not a {expected} reference")]
    UnexpectedReference { expected: ReferenceKind },

    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

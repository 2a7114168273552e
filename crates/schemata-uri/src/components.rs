//! URI component model

use crate::UriError;
use std::fmt;

/// Kind of reference a parsed URI represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceKind {
    /// Absolute URI with a fragment
    #[default]
    Uri,
    /// Absolute URI without a fragment
    Absolute,
    /// Relative reference (no scheme)
    Relative,
    /// Fragment-only reference such as `#foo`
    SameDocument,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::Uri => "uri",
            ReferenceKind::Absolute => "absolute",
            ReferenceKind::Relative => "relative",
            ReferenceKind::SameDocument => "same-document",
        };
        f.write_str(name)
    }
}

/// Parsing options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriOptions {
    /// Accept input outside the strict grammar without recording a fault
    pub tolerant: bool,
    /// Record a fault when the parsed reference is not of this kind
    pub reference: Option<ReferenceKind>,
}

impl Default for UriOptions {
    fn default() -> Self {
        Self {
            tolerant: true,
            reference: None,
        }
    }
}

impl UriOptions {
    /// Strict options: grammar violations are recorded as faults
    #[must_use]
    pub fn strict() -> Self {
        Self {
            tolerant: false,
            reference: None,
        }
    }

    /// Require a specific reference kind
    #[must_use]
    pub fn expect_reference(mut self, kind: ReferenceKind) -> Self {
        self.reference = Some(kind);
        self
    }
}

/// The parts of a URI reference
///
/// `host` is `Some` whenever the reference carried an authority (`//`),
/// even if the host itself is empty, as in `file:///etc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Components {
    pub scheme: Option<String>,
    pub authority: Option<String>,
    pub userinfo: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
    pub reference: ReferenceKind,
    pub errors: Vec<UriError>,
}

impl Components {
    /// Whether parsing recorded no faults
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the reference has an authority component
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.authority.is_some()
    }

    pub(crate) fn classify(&mut self) {
        let has_path = !self.path.is_empty();
        self.reference = if self.scheme.is_none()
            && self.authority.is_none()
            && !has_path
            && self.query.is_none()
        {
            ReferenceKind::SameDocument
        } else if self.scheme.is_none() {
            ReferenceKind::Relative
        } else if self.fragment.as_deref().is_none_or(str::is_empty) {
            ReferenceKind::Absolute
        } else {
            ReferenceKind::Uri
        };
    }
}

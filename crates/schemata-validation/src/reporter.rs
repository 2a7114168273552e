//! Validation reports

use schemata_ir::Instance;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// One failed keyword check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Keyword that failed, such as `type` or `minimum`
    pub keyword: String,
    pub message: String,
    /// Identity URI of the failing instance
    pub instance_uri: String,
    /// JSON pointer from the validated root to the failing instance
    pub pointer: String,
    /// URI of the schema holding the keyword
    pub schema_uri: String,
    /// What the keyword expected
    pub details: Value,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}: {}", self.pointer, self.keyword, self.message)
    }
}

/// Errors collected by one validation pass
///
/// The report also tracks which (instance, schema) pairs were already
/// walked, so a recursive schema is visited at most once per instance.
/// A [`ValidationReport::branch`] starts from a copy of that set; its pairs
/// reach the origin only through [`ValidationReport::merge`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
    #[serde(skip)]
    validated: HashSet<(String, String)>,
    #[serde(skip)]
    pub(crate) depth: usize,
}

impl ValidationReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty report starting from this report's validated pairs and depth
    #[must_use]
    pub fn branch(&self) -> Self {
        Self {
            errors: Vec::new(),
            validated: self.validated.clone(),
            depth: self.depth,
        }
    }

    /// Take over the errors and validated pairs of a branch
    pub fn merge(&mut self, branch: ValidationReport) {
        self.errors.extend(branch.errors);
        self.validated.extend(branch.validated);
    }

    /// Record an error for `instance`
    pub fn add_error(
        &mut self,
        instance: &Instance<'_>,
        schema_uri: &str,
        keyword: &str,
        message: impl Into<String>,
        details: Value,
    ) {
        self.errors.push(ValidationError {
            keyword: keyword.to_string(),
            message: message.into(),
            instance_uri: instance.uri().to_string(),
            pointer: instance.pointer().to_string(),
            schema_uri: schema_uri.to_string(),
            details,
        });
    }

    /// Mark a pair as validated; `false` when it already was
    pub(crate) fn mark_validated(&mut self, instance_uri: &str, schema_uri: &str) -> bool {
        self.validated
            .insert((instance_uri.to_string(), schema_uri.to_string()))
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors raised by `keyword`
    pub fn errors_for<'r>(&'r self, keyword: &'r str) -> impl Iterator<Item = &'r ValidationError> {
        self.errors.iter().filter(move |e| e.keyword == keyword)
    }
}

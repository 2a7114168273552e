//! Validation engine

use crate::formats::FormatRegistry;
use crate::reporter::ValidationReport;
use crate::rules;
use crate::{Error, Result};
use schemata_ir::Instance;
use schemata_schema::{Environment, Keyword, MetaSchema, SchemaId, SchemaNode};
use serde_json::{Value, json};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Identity URI of an instance passed to [`ValidationEngine::validate`]
pub const INSTANCE_URI: &str = "urn:schemata:instance#";

/// Validator for a keyword without built-in behaviour
///
/// Called with the instance, the schema holding the keyword and the
/// keyword's raw value.
pub type KeywordValidator =
    Arc<dyn Fn(&Instance<'_>, &SchemaNode, &Value, &mut ValidationReport) + Send + Sync>;

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Maximum schema nesting followed for one instance
    pub max_depth: usize,
    /// Check a schema against its meta-schema before using it in
    /// [`ValidationEngine::validate_value`]
    pub validate_schema_first: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            validate_schema_first: true,
        }
    }
}

impl ValidationConfig {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_validate_schema_first(mut self, enabled: bool) -> Self {
        self.validate_schema_first = enabled;
        self
    }
}

/// How to find the schema to validate against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaRef<'a> {
    Uri(&'a str),
    Id(SchemaId),
}

impl<'a> From<&'a str> for SchemaRef<'a> {
    fn from(uri: &'a str) -> Self {
        SchemaRef::Uri(uri)
    }
}

impl From<SchemaId> for SchemaRef<'_> {
    fn from(id: SchemaId) -> Self {
        SchemaRef::Id(id)
    }
}

/// Main validation engine
#[derive(Clone)]
pub struct ValidationEngine {
    config: ValidationConfig,
    formats: FormatRegistry,
    extensions: HashMap<String, KeywordValidator>,
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keywords: Vec<&String> = self.extensions.keys().collect();
        keywords.sort();
        f.debug_struct("ValidationEngine")
            .field("config", &self.config)
            .field("formats", &self.formats)
            .field("extensions", &keywords)
            .finish()
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Create an engine with default configuration and built-in formats
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create with specific configuration
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            formats: FormatRegistry::with_builtins(),
            extensions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    #[must_use]
    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    pub fn formats_mut(&mut self) -> &mut FormatRegistry {
        &mut self.formats
    }

    /// Register a validator for a keyword
    ///
    /// It runs for every schema whose raw document contains the keyword,
    /// after the built-in keywords.
    pub fn register_keyword<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: Fn(&Instance<'_>, &SchemaNode, &Value, &mut ValidationReport) + Send + Sync + 'static,
    {
        self.extensions.insert(name.into(), Arc::new(validator));
    }

    /// Validate an instance against a registered schema
    ///
    /// # Errors
    ///
    /// Fails when the schema URI is not registered or the handle does not
    /// belong to `env`. Data problems are reported, never returned as
    /// errors.
    pub fn validate<'s>(
        &self,
        env: &Environment,
        instance: &Value,
        schema: impl Into<SchemaRef<'s>>,
    ) -> Result<ValidationReport> {
        let id = match schema.into() {
            SchemaRef::Uri(uri) => env
                .find_schema(uri)
                .ok_or_else(|| schemata_schema::Error::NotFound(uri.to_string()))?,
            SchemaRef::Id(id) => {
                env.get(id)
                    .ok_or_else(|| Error::Validation(format!("{id} is not in this environment")))?;
                id
            }
        };

        let root = Instance::new(instance, INSTANCE_URI, env.options().default_fragment_delimiter);
        let mut report = ValidationReport::new();
        Validator { engine: self, env }.validate(&root, None, id, &mut report);
        debug!(schema = %env[id].uri(), errors = report.len(), "validated instance");
        Ok(report)
    }

    /// Validate a schema document against its meta-schema
    ///
    /// # Errors
    ///
    /// Fails when the handle does not belong to `env`.
    pub fn validate_schema(&self, env: &Environment, id: SchemaId) -> Result<ValidationReport> {
        let node = env
            .get(id)
            .ok_or_else(|| Error::Validation(format!("{id} is not in this environment")))?;
        let root = Instance::new(node.value(), node.uri(), node.fragment_delimiter());
        let mut report = ValidationReport::new();
        Validator { engine: self, env }.validate(&root, None, node.meta(), &mut report);
        debug!(schema = %node.uri(), errors = report.len(), "validated schema against its meta-schema");
        Ok(report)
    }

    /// Build a schema from a raw document and validate an instance with it
    ///
    /// When [`ValidationConfig::validate_schema_first`] is set and the
    /// schema itself is invalid, the schema's report is returned and the
    /// instance is not checked.
    ///
    /// # Errors
    ///
    /// Construction errors of the schema.
    pub fn validate_value(
        &self,
        env: &mut Environment,
        instance: &Value,
        schema: &Value,
    ) -> Result<ValidationReport> {
        let id = env.create_schema(schema.clone().into(), MetaSchema::Default, None)?;
        if self.config.validate_schema_first {
            let report = self.validate_schema(env, id)?;
            if !report.is_valid() {
                debug!(errors = report.len(), "schema is invalid, skipping instance");
                return Ok(report);
            }
        }
        self.validate(env, instance, id)
    }
}

/// One validation pass over an environment
pub(crate) struct Validator<'e> {
    pub engine: &'e ValidationEngine,
    pub env: &'e Environment,
}

impl Validator<'_> {
    pub fn formats(&self) -> &FormatRegistry {
        &self.engine.formats
    }

    /// Validate `instance` against schema `id`, appending to `report`
    pub fn validate(
        &self,
        instance: &Instance<'_>,
        parent: Option<&Instance<'_>>,
        id: SchemaId,
        report: &mut ValidationReport,
    ) {
        let schema = &self.env[id];
        if !report.mark_validated(instance.uri(), schema.uri()) {
            trace!(instance = instance.uri(), schema = schema.uri(), "already validated");
            return;
        }
        if report.depth >= self.engine.config.max_depth {
            report.add_error(
                instance,
                schema.uri(),
                "depth",
                "Maximum validation depth exceeded",
                json!(self.engine.config.max_depth),
            );
            return;
        }

        report.depth += 1;
        let meta = &self.env[schema.meta()];
        let keywords: BTreeSet<&Keyword> = schema
            .attributes()
            .keys()
            .filter(|k| schema.has_keyword(k.as_str()))
            .chain(meta.definitions().validation_required())
            .collect();

        for keyword in keywords {
            rules::check(
                self,
                &rules::Frame { instance, parent, schema },
                keyword,
                schema.attribute(keyword),
                report,
            );
        }

        if !self.engine.extensions.is_empty() {
            if let Some(raw) = schema.value().as_object() {
                for (name, value) in raw {
                    if let Some(validator) = self.engine.extensions.get(name) {
                        validator(instance, schema, value, report);
                    }
                }
            }
        }
        report.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_schema::Draft;

    #[test]
    fn test_unknown_schema_uri_is_an_error() {
        let env = Draft::Draft03.environment().unwrap();
        let engine = ValidationEngine::new();
        let result = engine.validate(&env, &json!(1), "http://example.com/nothing");
        assert!(matches!(
            result,
            Err(Error::Schema(schemata_schema::Error::NotFound(_)))
        ));
    }

    #[test]
    fn test_foreign_handle_is_an_error() {
        let env = Environment::new(schemata_schema::EnvironmentOptions::default());
        let engine = ValidationEngine::new();
        let result = engine.validate(&env, &json!(1), SchemaId::new(42));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_depth_limit_reports_once_per_path() {
        let mut env = Draft::Draft03.environment().unwrap();
        let id = env
            .create_schema(
                json!({"items": {"items": {"items": {"type": "string"}}}}).into(),
                MetaSchema::Default,
                None,
            )
            .unwrap();
        let engine = ValidationEngine::with_config(ValidationConfig::default().with_max_depth(2));
        let report = engine.validate(&env, &json!([[[1]]]), id).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].keyword, "depth");
        assert_eq!(report.errors()[0].pointer, "/0/0");
    }

    #[test]
    fn test_invalid_schema_stops_before_instance() {
        let mut env = Draft::Draft03.environment().unwrap();
        let engine = ValidationEngine::new();
        let report = engine
            .validate_value(&mut env, &json!("anything"), &json!({"minLength": "three"}))
            .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].keyword, "type");
        assert_eq!(report.errors()[0].pointer, "/minLength");
    }

    #[test]
    fn test_custom_keyword_validator() {
        let mut env = Draft::Draft03.environment().unwrap();
        let mut engine = ValidationEngine::new();
        engine.register_keyword("even", |instance, schema, raw, report| {
            let wants_even = raw.as_bool() == Some(true);
            let is_even = instance.value().and_then(Value::as_u64).is_some_and(|n| n % 2 == 0);
            if wants_even && !is_even {
                report.add_error(instance, schema.uri(), "even", "Number is not even", raw.clone());
            }
        });

        let schema = json!({"type": "integer", "even": true});
        let report = engine.validate_value(&mut env, &json!(3), &schema).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].keyword, "even");
        assert!(engine.validate_value(&mut env, &json!(4), &schema).unwrap().is_valid());
    }
}

//! Attribute registry: keyword definitions and parsed attribute values

use crate::Result;
use crate::environment::{Environment, MetaSchema};
use crate::links::Link;
use crate::model::SchemaId;
use regex::Regex;
use schemata_ir::{PrimitiveType, extend_uri};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// Schema keywords, in the order their validators run
///
/// Keywords a meta-schema defines but this crate has no built-in
/// behaviour for are carried as [`Keyword::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyword {
    Type,
    Properties,
    PatternProperties,
    Items,
    AdditionalItems,
    Optional,
    Required,
    AdditionalProperties,
    Requires,
    Dependencies,
    Minimum,
    Maximum,
    MinimumCanEqual,
    MaximumCanEqual,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MinItems,
    MaxItems,
    UniqueItems,
    Pattern,
    MinLength,
    MaxLength,
    Enum,
    Title,
    Description,
    Format,
    ContentEncoding,
    Default,
    DivisibleBy,
    MaxDecimal,
    Disallow,
    Extends,
    Links,
    FragmentResolution,
    Root,
    Readonly,
    PathStart,
    MediaType,
    Alternate,
    Custom(String),
}

impl Keyword {
    /// Every built-in keyword, in registry order
    pub const BUILTIN: [Keyword; 39] = [
        Keyword::Type,
        Keyword::Properties,
        Keyword::PatternProperties,
        Keyword::Items,
        Keyword::AdditionalItems,
        Keyword::Optional,
        Keyword::Required,
        Keyword::AdditionalProperties,
        Keyword::Requires,
        Keyword::Dependencies,
        Keyword::Minimum,
        Keyword::Maximum,
        Keyword::MinimumCanEqual,
        Keyword::MaximumCanEqual,
        Keyword::ExclusiveMinimum,
        Keyword::ExclusiveMaximum,
        Keyword::MinItems,
        Keyword::MaxItems,
        Keyword::UniqueItems,
        Keyword::Pattern,
        Keyword::MinLength,
        Keyword::MaxLength,
        Keyword::Enum,
        Keyword::Title,
        Keyword::Description,
        Keyword::Format,
        Keyword::ContentEncoding,
        Keyword::Default,
        Keyword::DivisibleBy,
        Keyword::MaxDecimal,
        Keyword::Disallow,
        Keyword::Extends,
        Keyword::Links,
        Keyword::FragmentResolution,
        Keyword::Root,
        Keyword::Readonly,
        Keyword::PathStart,
        Keyword::MediaType,
        Keyword::Alternate,
    ];

    /// Map a raw keyword name onto a keyword
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|k| k.as_str() == name)
            .cloned()
            .unwrap_or_else(|| Keyword::Custom(name.to_string()))
    }

    /// The keyword name as it appears in schema documents
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Keyword::Type => "type",
            Keyword::Properties => "properties",
            Keyword::PatternProperties => "patternProperties",
            Keyword::Items => "items",
            Keyword::AdditionalItems => "additionalItems",
            Keyword::Optional => "optional",
            Keyword::Required => "required",
            Keyword::AdditionalProperties => "additionalProperties",
            Keyword::Requires => "requires",
            Keyword::Dependencies => "dependencies",
            Keyword::Minimum => "minimum",
            Keyword::Maximum => "maximum",
            Keyword::MinimumCanEqual => "minimumCanEqual",
            Keyword::MaximumCanEqual => "maximumCanEqual",
            Keyword::ExclusiveMinimum => "exclusiveMinimum",
            Keyword::ExclusiveMaximum => "exclusiveMaximum",
            Keyword::MinItems => "minItems",
            Keyword::MaxItems => "maxItems",
            Keyword::UniqueItems => "uniqueItems",
            Keyword::Pattern => "pattern",
            Keyword::MinLength => "minLength",
            Keyword::MaxLength => "maxLength",
            Keyword::Enum => "enum",
            Keyword::Title => "title",
            Keyword::Description => "description",
            Keyword::Format => "format",
            Keyword::ContentEncoding => "contentEncoding",
            Keyword::Default => "default",
            Keyword::DivisibleBy => "divisibleBy",
            Keyword::MaxDecimal => "maxDecimal",
            Keyword::Disallow => "disallow",
            Keyword::Extends => "extends",
            Keyword::Links => "links",
            Keyword::FragmentResolution => "fragmentResolution",
            Keyword::Root => "root",
            Keyword::Readonly => "readonly",
            Keyword::PathStart => "pathStart",
            Keyword::MediaType => "mediaType",
            Keyword::Alternate => "alternate",
            Keyword::Custom(name) => name,
        }
    }

    /// Whether this keyword has built-in behaviour
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Keyword::Custom(_))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type name in `type` or `disallow`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Known(PrimitiveType),
    /// A name with no built-in predicate
    Unknown(String),
}

impl TypeName {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        PrimitiveType::from_name(name).map_or_else(|| TypeName::Unknown(name.to_string()), TypeName::Known)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TypeName::Known(t) => t.as_str(),
            TypeName::Unknown(name) => name,
        }
    }
}

/// One entry of a `type`/`disallow` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeEntry {
    Name(TypeName),
    Schema(SchemaId),
}

/// Types a keyword's raw value may take, as declared by the meta-schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptedType {
    Name(TypeName),
    /// A nested schema reference such as `{"$ref": "#"}`
    Schema,
}

/// Declarative record for one keyword, read from a meta-schema
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    pub keyword: Keyword,
    pub accepted_types: Vec<AcceptedType>,
    pub optional: bool,
    pub default: Option<Value>,
    pub requires: Option<String>,
    /// Run the validator even when the keyword is absent from the schema
    pub validation_required: bool,
}

impl AttributeDefinition {
    /// Read a definition from a property schema of a meta-schema
    #[must_use]
    pub fn from_value(name: &str, definition: &Value) -> Self {
        let accepted_types = match definition.get("type") {
            Some(Value::String(name)) => vec![AcceptedType::Name(TypeName::parse(name))],
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(name) => Some(AcceptedType::Name(TypeName::parse(name))),
                    Value::Object(_) => Some(AcceptedType::Schema),
                    _ => None,
                })
                .collect(),
            Some(Value::Object(_)) => vec![AcceptedType::Schema],
            _ => Vec::new(),
        };

        let flag = |key: &str| definition.get(key).and_then(Value::as_bool);
        let optional = flag("optional").unwrap_or_else(|| !flag("required").unwrap_or(false));

        Self {
            keyword: Keyword::from_name(name),
            accepted_types,
            optional,
            default: definition.get("default").cloned(),
            requires: definition
                .get("requires")
                .and_then(Value::as_str)
                .map(str::to_string),
            validation_required: flag("validationRequired").unwrap_or(false),
        }
    }

    /// Whether `value` has one of the accepted types
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        self.accepted_types.is_empty()
            || self.accepted_types.iter().any(|accepted| match accepted {
                AcceptedType::Name(TypeName::Known(t)) => t.matches(value),
                AcceptedType::Name(TypeName::Unknown(_)) => true,
                AcceptedType::Schema => value.is_object(),
            })
    }

    /// The default if it can be materialized without building schemas
    ///
    /// Object and array defaults (such as `{}` for `properties`) mean the
    /// same as an absent keyword and are not materialized.
    #[must_use]
    pub fn scalar_default(&self) -> Option<&Value> {
        self.default
            .as_ref()
            .filter(|d| !d.is_object() && !d.is_array())
    }
}

/// The ordered keyword → definition map a meta-schema offers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeRegistry {
    definitions: BTreeMap<Keyword, AttributeDefinition>,
}

impl AttributeRegistry {
    /// Build the registry from a schema's raw `properties` map
    #[must_use]
    pub fn from_schema_value(value: &Value) -> Self {
        let definitions = value
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .filter(|(_, definition)| definition.is_object())
                    .map(|(name, definition)| {
                        let definition = AttributeDefinition::from_value(name, definition);
                        (definition.keyword.clone(), definition)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { definitions }
    }

    #[must_use]
    pub fn get(&self, keyword: &Keyword) -> Option<&AttributeDefinition> {
        self.definitions.get(keyword)
    }

    #[must_use]
    pub fn contains(&self, keyword: &Keyword) -> bool {
        self.definitions.contains_key(keyword)
    }

    /// Definitions in registry order
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.definitions.values()
    }

    /// Keywords that are checked even when a schema omits them
    pub fn validation_required(&self) -> impl Iterator<Item = &Keyword> {
        self.definitions
            .values()
            .filter(|d| d.validation_required)
            .map(|d| &d.keyword)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// A `patternProperties` entry
#[derive(Debug, Clone)]
pub struct PatternSchema {
    pub source: String,
    /// Compiled pattern, or the compile error
    pub regex: std::result::Result<Regex, String>,
    pub schema: SchemaId,
}

/// A `dependencies` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    Properties(Vec<String>),
    Schema(SchemaId),
}

/// A keyword's parsed value
#[derive(Debug, Clone)]
pub enum AttributeValue {
    Types(Vec<TypeEntry>),
    Schema(SchemaId),
    SchemaList(Vec<SchemaId>),
    SchemaMap(BTreeMap<String, SchemaId>),
    Patterns(Vec<PatternSchema>),
    /// Literal `false` for `additionalProperties`/`additionalItems`
    Forbidden,
    Bool(bool),
    Number(Number),
    Integer(u64),
    String(String),
    /// Compiled `pattern`, or the compile error
    Pattern(std::result::Result<Regex, String>),
    Values(Vec<Value>),
    Links(Vec<Link>),
    Dependencies(BTreeMap<String, Dependency>),
    Raw(Value),
}

impl AttributeValue {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => n.as_f64(),
            #[allow(clippy::cast_precision_loss)]
            AttributeValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AttributeValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_schema(&self) -> Option<SchemaId> {
        match self {
            AttributeValue::Schema(id) => Some(*id),
            _ => None,
        }
    }

    /// Every schema handle this value refers to
    #[must_use]
    pub fn schema_ids(&self) -> Vec<SchemaId> {
        match self {
            AttributeValue::Types(entries) => entries
                .iter()
                .filter_map(|e| match e {
                    TypeEntry::Schema(id) => Some(*id),
                    TypeEntry::Name(_) => None,
                })
                .collect(),
            AttributeValue::Schema(id) => vec![*id],
            AttributeValue::SchemaList(ids) => ids.clone(),
            AttributeValue::SchemaMap(map) => map.values().copied().collect(),
            AttributeValue::Patterns(patterns) => patterns.iter().map(|p| p.schema).collect(),
            AttributeValue::Dependencies(deps) => deps
                .values()
                .filter_map(|d| match d {
                    Dependency::Schema(id) => Some(*id),
                    Dependency::Properties(_) => None,
                })
                .collect(),
            AttributeValue::Links(links) => links.iter().flat_map(Link::schema_ids).collect(),
            _ => Vec::new(),
        }
    }

    /// Replace every schema handle through `map`
    pub fn remap(&mut self, map: &impl Fn(SchemaId) -> SchemaId) {
        match self {
            AttributeValue::Types(entries) => {
                for entry in entries {
                    if let TypeEntry::Schema(id) = entry {
                        *id = map(*id);
                    }
                }
            }
            AttributeValue::Schema(id) => *id = map(*id),
            AttributeValue::SchemaList(ids) => ids.iter_mut().for_each(|id| *id = map(*id)),
            AttributeValue::SchemaMap(schemas) => {
                schemas.values_mut().for_each(|id| *id = map(*id));
            }
            AttributeValue::Patterns(patterns) => {
                patterns.iter_mut().for_each(|p| p.schema = map(p.schema));
            }
            AttributeValue::Dependencies(deps) => {
                for dep in deps.values_mut() {
                    if let Dependency::Schema(id) = dep {
                        *id = map(*id);
                    }
                }
            }
            AttributeValue::Links(links) => links.iter_mut().for_each(|l| l.remap(map)),
            _ => {}
        }
    }
}

/// Where nested schemas of one attribute are built
pub(crate) struct ParseContext {
    /// URI of the keyword inside the owning schema
    pub base_uri: String,
    pub delimiter: char,
    /// Meta-schema for nested schemas
    pub nested_meta: SchemaId,
}

impl ParseContext {
    fn child_uri(&self, key: &str) -> String {
        extend_uri(&self.base_uri, self.delimiter, key)
    }

    fn create(&self, env: &mut Environment, value: &Value, uri: &str) -> Result<SchemaId> {
        env.create_schema(
            value.clone().into(),
            MetaSchema::Schema(self.nested_meta),
            Some(uri),
        )
    }
}

fn parse_types(env: &mut Environment, ctx: &ParseContext, raw: &Value) -> Result<Option<AttributeValue>> {
    let entries = match raw {
        Value::String(name) => vec![TypeEntry::Name(TypeName::parse(name))],
        Value::Object(_) => vec![TypeEntry::Schema(ctx.create(env, raw, &ctx.base_uri)?)],
        Value::Array(items) => {
            let mut entries = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(name) => entries.push(TypeEntry::Name(TypeName::parse(name))),
                    Value::Object(_) => {
                        let uri = ctx.child_uri(&index.to_string());
                        entries.push(TypeEntry::Schema(ctx.create(env, item, &uri)?));
                    }
                    _ => {}
                }
            }
            entries
        }
        _ => return Ok(None),
    };
    Ok(Some(AttributeValue::Types(entries)))
}

fn parse_schema_or_list(
    env: &mut Environment,
    ctx: &ParseContext,
    raw: &Value,
) -> Result<Option<AttributeValue>> {
    match raw {
        Value::Object(_) => Ok(Some(AttributeValue::Schema(ctx.create(env, raw, &ctx.base_uri)?))),
        Value::Array(items) => {
            let mut ids = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                ids.push(ctx.create(env, item, &ctx.child_uri(&index.to_string()))?);
            }
            Ok(Some(AttributeValue::SchemaList(ids)))
        }
        _ => Ok(None),
    }
}

fn parse_schema_map(
    env: &mut Environment,
    ctx: &ParseContext,
    raw: &Value,
) -> Result<BTreeMap<String, SchemaId>> {
    let mut schemas = BTreeMap::new();
    if let Some(map) = raw.as_object() {
        for (key, value) in map {
            if value.is_object() {
                schemas.insert(key.clone(), ctx.create(env, value, &ctx.child_uri(key))?);
            }
        }
    }
    Ok(schemas)
}

fn parse_dependencies(
    env: &mut Environment,
    ctx: &ParseContext,
    raw: &Value,
) -> Result<Option<AttributeValue>> {
    let Some(map) = raw.as_object() else {
        return Ok(None);
    };
    let mut deps = BTreeMap::new();
    for (key, value) in map {
        let dep = match value {
            Value::String(name) => Dependency::Properties(vec![name.clone()]),
            Value::Array(names) => Dependency::Properties(
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Value::Object(_) => Dependency::Schema(ctx.create(env, value, &ctx.child_uri(key))?),
            _ => continue,
        };
        deps.insert(key.clone(), dep);
    }
    Ok(Some(AttributeValue::Dependencies(deps)))
}

fn parse_links(env: &mut Environment, ctx: &ParseContext, raw: &Value) -> Result<Option<AttributeValue>> {
    let Some(items) = raw.as_array() else {
        return Ok(None);
    };
    let mut links = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(mut link) = Link::from_value(item) else {
            trace!(index, "skipping malformed link");
            continue;
        };
        let link_uri = ctx.child_uri(&index.to_string());
        if let Some(properties) = item.get("properties") {
            let link_ctx = ParseContext {
                base_uri: extend_uri(&link_uri, ctx.delimiter, "properties"),
                delimiter: ctx.delimiter,
                nested_meta: ctx.nested_meta,
            };
            link.properties = parse_schema_map(env, &link_ctx, properties)?;
        }
        if let Some(target) = item.get("targetSchema").filter(|t| t.is_object()) {
            let uri = extend_uri(&link_uri, ctx.delimiter, "targetSchema");
            link.target_schema = Some(ctx.create(env, target, &uri)?);
        }
        links.push(link);
    }
    Ok(Some(AttributeValue::Links(links)))
}

fn non_negative_integer(raw: &Value) -> Option<u64> {
    raw.as_u64().or_else(|| {
        raw.as_f64()
            .filter(|f| *f >= 0.0 && f.is_finite())
            .map(|f| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let n = f.floor() as u64;
                n
            })
    })
}

/// Parse one keyword's raw value into its attribute representation
///
/// Returns `Ok(None)` when the raw value has a shape the keyword ignores.
pub(crate) fn parse_attribute(
    env: &mut Environment,
    ctx: &ParseContext,
    keyword: &Keyword,
    raw: &Value,
) -> Result<Option<AttributeValue>> {
    let parsed = match keyword {
        Keyword::Type | Keyword::Disallow => return parse_types(env, ctx, raw),
        Keyword::Items | Keyword::Extends => return parse_schema_or_list(env, ctx, raw),
        Keyword::Alternate => match raw {
            Value::Array(_) => return parse_schema_or_list(env, ctx, raw),
            _ => None,
        },
        Keyword::Properties => Some(AttributeValue::SchemaMap(parse_schema_map(env, ctx, raw)?)),
        Keyword::PatternProperties => {
            let schemas = parse_schema_map(env, ctx, raw)?;
            Some(AttributeValue::Patterns(
                schemas
                    .into_iter()
                    .map(|(source, schema)| PatternSchema {
                        regex: Regex::new(&source).map_err(|e| e.to_string()),
                        source,
                        schema,
                    })
                    .collect(),
            ))
        }
        Keyword::AdditionalProperties | Keyword::AdditionalItems => match raw {
            Value::Object(_) => Some(AttributeValue::Schema(ctx.create(env, raw, &ctx.base_uri)?)),
            Value::Bool(false) => Some(AttributeValue::Forbidden),
            _ => None,
        },
        Keyword::Requires => match raw {
            Value::String(name) => Some(AttributeValue::String(name.clone())),
            Value::Object(_) => Some(AttributeValue::Schema(ctx.create(env, raw, &ctx.base_uri)?)),
            _ => None,
        },
        Keyword::Dependencies => return parse_dependencies(env, ctx, raw),
        Keyword::Links => return parse_links(env, ctx, raw),
        Keyword::MinimumCanEqual | Keyword::MaximumCanEqual => {
            Some(AttributeValue::Bool(raw.as_bool().unwrap_or(true)))
        }
        Keyword::Optional
        | Keyword::Required
        | Keyword::ExclusiveMinimum
        | Keyword::ExclusiveMaximum
        | Keyword::UniqueItems
        | Keyword::Root
        | Keyword::Readonly => raw.as_bool().map(AttributeValue::Bool),
        Keyword::Minimum | Keyword::Maximum | Keyword::DivisibleBy => match raw {
            Value::Number(n) => Some(AttributeValue::Number(n.clone())),
            _ => None,
        },
        Keyword::MinItems | Keyword::MinLength => {
            Some(AttributeValue::Integer(non_negative_integer(raw).unwrap_or(0)))
        }
        Keyword::MaxItems | Keyword::MaxLength | Keyword::MaxDecimal => {
            non_negative_integer(raw).map(AttributeValue::Integer)
        }
        Keyword::Pattern => raw
            .as_str()
            .map(|source| AttributeValue::Pattern(Regex::new(source).map_err(|e| e.to_string()))),
        Keyword::Enum => raw.as_array().map(|values| AttributeValue::Values(values.clone())),
        Keyword::Title
        | Keyword::Description
        | Keyword::Format
        | Keyword::ContentEncoding
        | Keyword::FragmentResolution
        | Keyword::PathStart
        | Keyword::MediaType => raw.as_str().map(|s| AttributeValue::String(s.to_string())),
        Keyword::Default | Keyword::Custom(_) => Some(AttributeValue::Raw(raw.clone())),
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keyword_names_round_trip() {
        for keyword in Keyword::BUILTIN {
            assert_eq!(Keyword::from_name(keyword.as_str()), keyword);
        }
        assert_eq!(
            Keyword::from_name("x-vendor"),
            Keyword::Custom("x-vendor".to_string())
        );
    }

    #[test]
    fn test_keyword_order_puts_custom_last() {
        assert!(Keyword::Type < Keyword::Properties);
        assert!(Keyword::Optional < Keyword::Minimum);
        assert!(Keyword::Alternate < Keyword::Custom("a".to_string()));
    }

    #[test]
    fn test_definition_from_value() {
        let def = AttributeDefinition::from_value(
            "minimumCanEqual",
            &json!({"type": "boolean", "optional": true, "requires": "minimum", "default": true}),
        );
        assert_eq!(def.keyword, Keyword::MinimumCanEqual);
        assert!(def.optional);
        assert_eq!(def.requires.as_deref(), Some("minimum"));
        assert_eq!(def.scalar_default(), Some(&json!(true)));
        assert!(def.accepts(&json!(false)));
        assert!(!def.accepts(&json!("yes")));
    }

    #[test]
    fn test_definition_accepts_schema_entries() {
        let def = AttributeDefinition::from_value(
            "items",
            &json!({"type": [{"$ref": "#"}, "array"], "default": {}}),
        );
        assert!(def.accepts(&json!({})));
        assert!(def.accepts(&json!([])));
        assert!(!def.accepts(&json!(1)));
        assert_eq!(def.scalar_default(), None);
    }

    #[test]
    fn test_definition_required_flag() {
        let def = AttributeDefinition::from_value("href", &json!({"type": "string", "required": true}));
        assert!(!def.optional);
        let def = AttributeDefinition::from_value("rel", &json!({"type": "string"}));
        assert!(def.optional);
    }

    #[test]
    fn test_registry_from_schema_value() {
        let registry = AttributeRegistry::from_schema_value(&json!({
            "properties": {
                "optional": {"type": "boolean", "validationRequired": true},
                "type": {"type": ["string", "array"]},
                "x-note": {"type": "string"},
                "broken": 5
            }
        }));
        assert_eq!(registry.len(), 3);
        let order: Vec<&Keyword> = registry.iter().map(|d| &d.keyword).collect();
        assert_eq!(
            order,
            vec![
                &Keyword::Type,
                &Keyword::Optional,
                &Keyword::Custom("x-note".to_string())
            ]
        );
        let required: Vec<&Keyword> = registry.validation_required().collect();
        assert_eq!(required, vec![&Keyword::Optional]);
    }

    #[test]
    fn test_unknown_type_names() {
        assert_eq!(TypeName::parse("string"), TypeName::Known(PrimitiveType::String));
        assert_eq!(TypeName::parse("date"), TypeName::Unknown("date".to_string()));
        assert_eq!(TypeName::parse("date").as_str(), "date");
    }
}

//! Schema environment: node arena, URI index and schema construction

use crate::attributes::{AttributeValue, Keyword, ParseContext, parse_attribute};
use crate::inheritance::{InheritanceGraph, merge_all, remove_keywords};
use crate::model::{SchemaId, SchemaNode};
use crate::{Error, Result};
use schemata_ir::{Cursor, fragment_segments};
use schemata_uri::UriOptions;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::ops::Index;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Upper bound on `describedby` re-associations for one node
const MAX_REASSOCIATIONS: usize = 8;

/// URI under which the fallback empty meta-schema is registered
pub const EMPTY_SCHEMA_URI: &str = "urn:schemata:empty#";

/// Environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentOptions {
    /// Delimiter for documents whose meta-schema names no fragment resolution
    pub default_fragment_delimiter: char,
    /// Meta-schema used when a schema is created with [`MetaSchema::Default`]
    pub default_schema_uri: Option<String>,
    /// Accept URIs outside the strict RFC 3986 grammar
    pub tolerant_uris: bool,
    /// Maximum nesting of schema construction
    pub max_depth: usize,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self {
            default_fragment_delimiter: '/',
            default_schema_uri: None,
            tolerant_uris: true,
            max_depth: 128,
        }
    }
}

impl EnvironmentOptions {
    #[must_use]
    pub fn with_fragment_delimiter(mut self, delimiter: char) -> Self {
        self.default_fragment_delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_default_schema_uri(mut self, uri: impl Into<String>) -> Self {
        self.default_schema_uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn with_tolerant_uris(mut self, tolerant: bool) -> Self {
        self.tolerant_uris = tolerant;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// What to build a schema from
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// An existing node, returned unchanged
    Node(SchemaId),
    /// A raw schema document
    Value(Value),
}

impl From<Value> for SchemaSource {
    fn from(value: Value) -> Self {
        SchemaSource::Value(value)
    }
}

impl From<SchemaId> for SchemaSource {
    fn from(id: SchemaId) -> Self {
        SchemaSource::Node(id)
    }
}

/// Which schema describes a newly created node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSchema {
    /// The node describes itself
    SelfDescribed,
    Schema(SchemaId),
    /// The environment's default schema, or an empty schema if none is set
    Default,
}

/// Registry and configuration scope in which schemas are built and resolved
#[derive(Debug, Clone, Default)]
pub struct Environment {
    nodes: Vec<SchemaNode>,
    index: HashMap<String, SchemaId>,
    options: EnvironmentOptions,
    inheritance: InheritanceGraph,
    next_uri: usize,
    depth: usize,
}

impl Index<SchemaId> for Environment {
    type Output = SchemaNode;

    fn index(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.index()]
    }
}

impl Environment {
    /// Create an empty environment
    #[must_use]
    pub fn new(options: EnvironmentOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn options(&self) -> &EnvironmentOptions {
        &self.options
    }

    pub fn set_default_schema_uri(&mut self, uri: impl Into<String>) {
        self.options.default_schema_uri = Some(self.format_uri_lossy(&uri.into()));
    }

    pub fn set_default_fragment_delimiter(&mut self, delimiter: char) {
        self.options.default_fragment_delimiter = delimiter;
    }

    /// Node for a handle, if it belongs to this environment
    #[must_use]
    pub fn get(&self, id: SchemaId) -> Option<&SchemaNode> {
        self.nodes.get(id.index())
    }

    /// Number of nodes ever built, including replaced ones
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered URIs with their nodes, sorted by URI
    #[must_use]
    pub fn schemas(&self) -> BTreeMap<&str, SchemaId> {
        self.index.iter().map(|(uri, id)| (uri.as_str(), *id)).collect()
    }

    /// The default meta-schema, if one is registered
    #[must_use]
    pub fn default_schema(&self) -> Option<SchemaId> {
        self.options
            .default_schema_uri
            .as_deref()
            .and_then(|uri| self.find_schema(uri))
    }

    /// Normalize a URI into a lookup key
    ///
    /// The URI is re-serialized in canonical form and given a `#` if it has
    /// none.
    ///
    /// # Errors
    ///
    /// In strict mode ([`EnvironmentOptions::tolerant_uris`] unset) a URI
    /// outside the RFC 3986 grammar is rejected with [`Error::InvalidFormat`].
    pub fn format_uri(&self, uri: &str) -> Result<String> {
        let options = if self.options.tolerant_uris {
            UriOptions::default()
        } else {
            UriOptions::strict()
        };
        let components = schemata_uri::parse_with(uri, &options);
        match components.errors.first() {
            Some(fault) if !self.options.tolerant_uris => {
                return Err(Error::InvalidFormat(format!("{uri}: {fault}")));
            }
            _ => {}
        }
        Ok(with_fragment(schemata_uri::serialize(&components)))
    }

    fn format_uri_lossy(&self, uri: &str) -> String {
        with_fragment(schemata_uri::normalize(uri))
    }

    /// Look up a schema by URI
    #[must_use]
    pub fn find_schema(&self, uri: &str) -> Option<SchemaId> {
        self.index.get(&self.format_uri_lossy(uri)).copied()
    }

    /// Resolve a reference against a node's URI and format the result
    #[must_use]
    pub fn resolve_uri(&self, id: SchemaId, reference: &str) -> String {
        self.format_uri_lossy(&schemata_uri::resolve(&self[id].uri, reference))
    }

    /// Register an additional URI for an existing node
    ///
    /// # Errors
    ///
    /// Fails when the URI is rejected by [`Environment::format_uri`].
    pub fn register_alias(&mut self, uri: &str, id: SchemaId) -> Result<()> {
        let uri = self.format_uri(uri)?;
        debug!(uri = %uri, schema = %id, "registering schema alias");
        self.index.insert(uri, id);
        Ok(())
    }

    /// Build (or return) a schema node
    ///
    /// A [`SchemaSource::Node`] is returned unchanged. Otherwise a node is
    /// registered under `uri` (or a synthesized `urn:schemata:<n>#`),
    /// replacing any previous node there, its attributes are parsed with
    /// the meta-schema's definitions and the link initializer runs. The
    /// returned handle may differ from the freshly built node when a
    /// `full` link redirects to an existing schema.
    ///
    /// # Errors
    ///
    /// [`Error::DepthExceeded`] when nested construction exceeds
    /// [`EnvironmentOptions::max_depth`], [`Error::InvalidFormat`] for a
    /// rejected URI in strict mode.
    pub fn create_schema(
        &mut self,
        source: SchemaSource,
        meta: MetaSchema,
        uri: Option<&str>,
    ) -> Result<SchemaId> {
        let value = match source {
            SchemaSource::Node(id) => return Ok(id),
            SchemaSource::Value(value) => value,
        };

        if self.depth >= self.options.max_depth {
            return Err(Error::DepthExceeded {
                uri: uri.unwrap_or("<anonymous>").to_string(),
                depth: self.options.max_depth,
            });
        }

        self.depth += 1;
        let result = self.build(value, meta, uri);
        self.depth -= 1;
        result
    }

    fn build(&mut self, value: Value, meta: MetaSchema, uri: Option<&str>) -> Result<SchemaId> {
        let uri = match uri {
            Some(uri) => self.format_uri(uri)?,
            None => self.synthesize_uri(),
        };

        // The fallback meta-schema may be built here, so allocate after it.
        let meta = match meta {
            MetaSchema::Default => Some(self.default_meta()?),
            MetaSchema::Schema(meta) => Some(meta),
            MetaSchema::SelfDescribed => None,
        };
        let id = SchemaId::new(self.nodes.len());
        let meta = meta.unwrap_or(id);
        let delimiter = if meta == id {
            self.delimiter_of(&value)
        } else {
            self.delimiter_of(&self[meta].value)
        };

        trace!(uri = %uri, schema = %id, meta = %meta, "creating schema");
        self.nodes.push(SchemaNode::new(uri.clone(), value, meta, delimiter));
        // Registered before parsing so nested references back to this
        // document resolve to the node under construction.
        self.index.insert(uri.clone(), id);

        self.parse_attributes(id)?;
        let resolved = self.initialize(id)?;

        if resolved != id {
            self.index.insert(uri, resolved);
        }
        Ok(resolved)
    }

    fn synthesize_uri(&mut self) -> String {
        loop {
            self.next_uri += 1;
            let uri = format!("urn:schemata:{}#", self.next_uri);
            if !self.index.contains_key(&uri) {
                return uri;
            }
        }
    }

    fn default_meta(&mut self) -> Result<SchemaId> {
        if let Some(id) = self.default_schema() {
            return Ok(id);
        }
        if let Some(id) = self.index.get(EMPTY_SCHEMA_URI) {
            return Ok(*id);
        }
        debug!("no default schema registered, using the empty schema");
        self.create_schema(
            Value::Object(serde_json::Map::new()).into(),
            MetaSchema::SelfDescribed,
            Some(EMPTY_SCHEMA_URI),
        )
    }

    /// Fragment delimiter declared by a meta-schema's raw value
    fn delimiter_of(&self, meta_value: &Value) -> char {
        match meta_value.get("fragmentResolution").and_then(Value::as_str) {
            Some("dot-delimited") => '.',
            Some("slash-delimited") => '/',
            _ => self.options.default_fragment_delimiter,
        }
    }

    /// Meta-schema for schemas nested in a document described by `meta`
    ///
    /// A document-root meta is used as is; it may already be replaced in
    /// the index by a rebuild still under construction.
    fn nested_meta(&self, meta: SchemaId) -> SchemaId {
        let root = self.resolve_uri(meta, "#");
        if root == self[meta].uri {
            return meta;
        }
        self.find_schema(&root).unwrap_or(meta)
    }

    /// Parse every present or defaulted keyword of a node
    fn parse_attributes(&mut self, id: SchemaId) -> Result<()> {
        let meta = self[id].meta;
        let definitions = Arc::clone(&self[meta].definitions);
        let value = self[id].value.clone();
        let uri = self[id].uri.clone();
        let delimiter = self[id].fragment_delimiter;
        let nested_meta = self.nested_meta(meta);

        let mut attributes = BTreeMap::new();
        if value.is_object() {
            for definition in definitions.iter() {
                let keyword = &definition.keyword;
                let raw = match value.get(keyword.as_str()) {
                    Some(raw) => raw,
                    None => match definition.scalar_default() {
                        Some(default) => default,
                        None => continue,
                    },
                };
                if !definition.accepts(raw) {
                    trace!(uri = %uri, keyword = %keyword, "keyword value has an unaccepted type");
                    continue;
                }

                let ctx = ParseContext {
                    base_uri: schemata_ir::extend_uri(&uri, delimiter, keyword.as_str()),
                    delimiter,
                    nested_meta,
                };
                if let Some(parsed) = parse_attribute(self, &ctx, keyword, raw)? {
                    attributes.insert(keyword.clone(), parsed);
                }
            }
        }

        self.nodes[id.index()].attributes = attributes;
        Ok(())
    }

    /// Resolve a link of `rel` from the node's meta-schema against the node
    fn link_target(&self, id: SchemaId, rel: &str) -> Option<String> {
        let node = &self[id];
        match self[node.meta].attribute(&Keyword::Links) {
            Some(AttributeValue::Links(links)) => links
                .iter()
                .filter(|link| link.rel == rel)
                .find_map(|link| link.resolve(&node.value, &node.uri))
                .map(|target| self.format_uri_lossy(&target)),
            _ => None,
        }
    }

    /// Resolved link targets of `rel` for a node
    #[must_use]
    pub fn links(&self, id: SchemaId, rel: &str) -> Vec<String> {
        let node = &self[id];
        match self[node.meta].attribute(&Keyword::Links) {
            Some(AttributeValue::Links(links)) => links
                .iter()
                .filter(|link| link.rel == rel)
                .filter_map(|link| link.resolve(&node.value, &node.uri))
                .map(|target| self.format_uri_lossy(&target))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Post-construction link handling
    fn initialize(&mut self, id: SchemaId) -> Result<SchemaId> {
        let mut reassociations = 0;
        loop {
            if let Some(target) = self.link_target(id, "full") {
                if target != self[id].uri {
                    let found = match self.find_schema(&target) {
                        Some(found) => Some(found),
                        None => self.resolve_fragment(&target).ok(),
                    };
                    if let Some(found) = found {
                        trace!(from = %self[id].uri, to = %target, "following full link");
                        return Ok(found);
                    }
                }
            }

            if let Some(target) = self.link_target(id, "describedby") {
                let meta = self[id].meta;
                if target != self[meta].uri && reassociations < MAX_REASSOCIATIONS {
                    if let Some(found) = self.find_schema(&target).filter(|found| *found != meta) {
                        debug!(uri = %self[id].uri, meta = %target, "re-associating schema");
                        let delimiter = self.delimiter_of(&self[found].value);
                        let node = &mut self.nodes[id.index()];
                        node.meta = found;
                        node.fragment_delimiter = delimiter;
                        reassociations += 1;
                        self.parse_attributes(id)?;
                        continue;
                    }
                }
            }

            if let Some(AttributeValue::Schema(parent)) = self[id].attribute(&Keyword::Extends) {
                let parent = *parent;
                self.merge_extends(id, parent)?;
            }
            break;
        }

        if let Some(target) = self.link_target(id, "self") {
            if target != self[id].uri {
                debug!(from = %self[id].uri, to = %target, "updating schema identity from self link");
                self.nodes[id.index()].uri = target.clone();
                self.index.insert(target, id);
            }
        }
        Ok(id)
    }

    /// Merge a single `extends` parent into a node and rebuild it in place
    fn merge_extends(&mut self, id: SchemaId, parent: SchemaId) -> Result<()> {
        let child_uri = self[id].uri.clone();
        let parent_uri = self[parent].uri.clone();
        if parent == id || self.inheritance.would_create_cycle(&child_uri, &parent_uri) {
            warn!(child = %child_uri, parent = %parent_uri, "skipping cyclic extends merge");
            return Ok(());
        }
        self.inheritance.add_edge(child_uri.clone(), parent_uri);

        let mut merged = merge_all(&[&self[parent].value], &self[id].value);
        remove_keywords(&mut merged, &["extends"]);
        debug!(uri = %child_uri, parent = %parent, "merged extends parent");

        let node = &mut self.nodes[id.index()];
        node.definitions = Arc::new(crate::AttributeRegistry::from_schema_value(&merged));
        node.value = merged;
        node.extended_from.push(parent);
        self.parse_attributes(id)
    }

    /// Find a fragment URI, building it from the document root if needed
    ///
    /// The fragment is split on the root's delimiter and followed through
    /// the root's raw value; the schema found there is built with the
    /// root's meta-schema and registered under `uri`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when neither the URI nor its document root is
    /// registered, or the fragment path does not exist in the root.
    pub fn resolve_fragment(&mut self, uri: &str) -> Result<SchemaId> {
        let uri = self.format_uri(uri)?;
        if let Some(id) = self.index.get(&uri) {
            return Ok(*id);
        }

        let (base, fragment) = uri.split_once('#').unwrap_or((uri.as_str(), ""));
        if fragment.is_empty() {
            return Err(Error::NotFound(uri.clone()));
        }
        let root = self
            .find_schema(&format!("{base}#"))
            .ok_or_else(|| Error::NotFound(uri.clone()))?;

        let segments = fragment_segments(fragment, self[root].fragment_delimiter);
        let raw = Cursor::new(&self[root].value)
            .navigate(&segments)
            .map_err(|e| Error::NotFound(format!("{uri}: {e}")))?
            .value()
            .clone();

        debug!(uri = %uri, root = %root, "building schema from fragment");
        let meta = self[root].meta;
        self.create_schema(raw.into(), MetaSchema::Schema(meta), Some(&uri))
    }

    /// Replace node handles throughout the arena
    pub(crate) fn rewrite_handles(&mut self, replacements: &HashMap<SchemaId, SchemaId>) {
        let map = |id: SchemaId| replacements.get(&id).copied().unwrap_or(id);
        for node in &mut self.nodes {
            node.remap(&map);
        }
        for id in self.index.values_mut() {
            *id = map(*id);
        }
    }
}

fn with_fragment(uri: String) -> String {
    if uri.contains('#') { uri } else { uri + "#" }
}

//! Built-in meta-schemas for drafts 00 through 03
//!
//! Every draft is a triple of documents: the schema describing plain
//! schemas, the hyper-schema (schema plus link keywords) and the links
//! schema. Later drafts derive their documents from the previous draft.

mod draft00;
mod draft01;
mod draft02;
mod draft03;

use crate::environment::{Environment, EnvironmentOptions, MetaSchema};
use crate::inheritance::{inherits, merge_all};
use crate::model::SchemaId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Id of the environment used when none is named
pub const DEFAULT_ENVIRONMENT_ID: &str = "json-schema-draft-03";

/// A supported schema draft
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Draft {
    Draft00,
    Draft01,
    Draft02,
    #[default]
    Draft03,
}

/// Raw documents of one draft before they are built
pub(crate) struct DraftDocuments {
    pub schema: Value,
    /// Hyper-schema overlay, merged over `schema` when built
    pub hyper: Value,
    pub links: Value,
}

/// Handles of a built draft triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftSchemas {
    pub schema: SchemaId,
    pub hyper_schema: SchemaId,
    pub links: SchemaId,
}

impl Draft {
    pub const ALL: [Draft; 4] = [Draft::Draft00, Draft::Draft01, Draft::Draft02, Draft::Draft03];

    /// Environment id, e.g. `json-schema-draft-03`
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Draft::Draft00 => "json-schema-draft-00",
            Draft::Draft01 => "json-schema-draft-01",
            Draft::Draft02 => "json-schema-draft-02",
            Draft::Draft03 => "json-schema-draft-03",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Draft::Draft00 => "draft-00",
            Draft::Draft01 => "draft-01",
            Draft::Draft02 => "draft-02",
            Draft::Draft03 => "draft-03",
        }
    }

    /// Look a draft up by environment id
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id)
    }

    #[must_use]
    pub fn schema_uri(self) -> String {
        format!("http://json-schema.org/{}/schema#", self.slug())
    }

    #[must_use]
    pub fn hyper_schema_uri(self) -> String {
        format!("http://json-schema.org/{}/hyper-schema#", self.slug())
    }

    #[must_use]
    pub fn links_uri(self) -> String {
        format!("http://json-schema.org/{}/links#", self.slug())
    }

    pub(crate) fn uris(self) -> (String, String, String) {
        (self.schema_uri(), self.hyper_schema_uri(), self.links_uri())
    }

    /// Delimiter for fragment paths in this draft's documents
    #[must_use]
    pub fn fragment_delimiter(self) -> char {
        match self {
            Draft::Draft00 | Draft::Draft01 => '.',
            Draft::Draft02 | Draft::Draft03 => '/',
        }
    }

    pub(crate) fn documents(self) -> DraftDocuments {
        match self {
            Draft::Draft00 => draft00::documents(),
            Draft::Draft01 => draft01::documents(),
            Draft::Draft02 => draft02::documents(),
            Draft::Draft03 => draft03::documents(),
        }
    }

    /// Build a fresh environment holding this draft's meta-schemas
    ///
    /// # Errors
    ///
    /// Propagates construction failures of the built-in documents.
    pub fn environment(self) -> Result<Environment> {
        let options = EnvironmentOptions::default().with_fragment_delimiter(self.fragment_delimiter());
        let mut env = Environment::new(options);
        self.bootstrap(&mut env)?;
        Ok(env)
    }

    /// Register this draft's meta-schemas in `env` and make the
    /// hyper-schema its default schema
    ///
    /// # Errors
    ///
    /// Propagates construction failures of the built-in documents.
    pub fn bootstrap(self, env: &mut Environment) -> Result<DraftSchemas> {
        let (schema_uri, hyper_uri, links_uri) = self.uris();
        let documents = self.documents();

        // Provisional triple: the hyper-schema describes itself before any
        // of the links it relies on exist.
        let schema = env.create_schema(
            documents.schema.into(),
            MetaSchema::SelfDescribed,
            Some(&schema_uri),
        )?;
        let hyper_value = inherits(env[schema].value(), &documents.hyper);
        let hyper = env.create_schema(hyper_value.into(), MetaSchema::SelfDescribed, Some(&hyper_uri))?;
        env.set_default_schema_uri(hyper_uri.clone());
        let links = env.create_schema(
            documents.links.into(),
            MetaSchema::Schema(hyper),
            Some(&links_uri),
        )?;
        debug!(draft = self.id(), "built provisional meta-schemas");

        // Rebuild with every reference resolvable.
        let schema_value = env[schema].value().clone();
        let final_schema =
            env.create_schema(schema_value.into(), MetaSchema::Schema(hyper), Some(&schema_uri))?;
        let hyper_value = env[hyper].value().clone();
        let final_hyper =
            env.create_schema(hyper_value.into(), MetaSchema::Schema(hyper), Some(&hyper_uri))?;
        let links_value = env[links].value().clone();
        let final_links = env.create_schema(
            links_value.into(),
            MetaSchema::Schema(final_hyper),
            Some(&links_uri),
        )?;

        let replacements = HashMap::from([
            (schema, final_schema),
            (hyper, final_hyper),
            (links, final_links),
        ]);
        env.rewrite_handles(&replacements);

        for (name, id) in [
            ("schema", final_schema),
            ("hyper-schema", final_hyper),
            ("links", final_links),
        ] {
            env.register_alias(&format!("http://json-schema.org/{name}#"), id)?;
        }

        if env[final_hyper].meta() != final_hyper {
            return Err(Error::Inheritance(format!(
                "{hyper_uri} does not describe itself after bootstrap"
            )));
        }

        info!(draft = self.id(), nodes = env.len(), "bootstrapped draft meta-schemas");
        Ok(DraftSchemas {
            schema: final_schema,
            hyper_schema: final_hyper,
            links: final_links,
        })
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Draft {
    type Err = Error;

    /// Accepts the environment id (`json-schema-draft-03`) or the short
    /// form (`draft-03`)
    fn from_str(s: &str) -> Result<Self> {
        Self::from_id(s)
            .or_else(|| Self::ALL.into_iter().find(|d| d.slug() == s))
            .ok_or_else(|| Error::UnknownDraft(s.to_string()))
    }
}

/// Fold a previous draft's document and its changes under a new
/// `$schema`/`id` pair
pub(crate) fn derive(previous: &Value, changes: &Value, meta_uri: &str, id: &str) -> Value {
    merge_all(&[previous, changes], &json!({"$schema": meta_uri, "id": id}))
}

/// Links shared by every draft's hyper-schema
pub(crate) fn core_links() -> Value {
    json!([
        {"href": "{$ref}", "rel": "full"},
        {"href": "{$schema}", "rel": "describedby"},
        {"href": "{id}", "rel": "self"}
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Keyword;

    #[test]
    fn test_draft_ids_and_uris() {
        assert_eq!(Draft::default().id(), DEFAULT_ENVIRONMENT_ID);
        assert_eq!(Draft::from_id("json-schema-draft-01"), Some(Draft::Draft01));
        assert_eq!("draft-02".parse::<Draft>().unwrap(), Draft::Draft02);
        assert!("draft-09".parse::<Draft>().is_err());
        assert_eq!(
            Draft::Draft00.links_uri(),
            "http://json-schema.org/draft-00/links#"
        );
    }

    #[test]
    fn test_derive_folds_changes_under_new_identity() {
        let previous = json!({
            "$schema": "urn:old-hyper#",
            "id": "urn:old#",
            "properties": {"a": {"type": "string"}, "b": {"optional": true}}
        });
        let derived = derive(
            &previous,
            &json!({"properties": {"b": {"optional": false}, "c": {}}}),
            "urn:new-hyper#",
            "urn:new#",
        );
        assert_eq!(
            derived,
            json!({
                "$schema": "urn:new-hyper#",
                "id": "urn:new#",
                "properties": {"a": {"type": "string"}, "b": {"optional": false}, "c": {}}
            })
        );
    }

    #[test]
    fn test_derived_documents() {
        let draft02 = Draft::Draft02.documents();
        assert!(draft02.schema.pointer("/properties/maxDecimal").is_none());
        assert!(draft02.schema.pointer("/properties/divisibleBy").is_some());
        assert_eq!(draft02.schema["fragmentResolution"], "slash-delimited");
        assert_eq!(
            draft02.schema["id"],
            "http://json-schema.org/draft-02/schema#"
        );

        let draft03 = Draft::Draft03.documents();
        assert!(draft03.schema.pointer("/properties/optional").is_none());
        assert!(draft03.schema.pointer("/properties/requires").is_none());
        assert!(draft03.schema.pointer("/properties/type/optional").is_none());
        assert_eq!(draft03.schema["properties"]["required"]["validationRequired"], true);
        assert_eq!(draft03.links["properties"]["href"]["required"], true);
        assert_eq!(
            draft03.schema["properties"]["divisibleBy"]["exclusiveMinimum"],
            true
        );
    }

    #[test]
    fn test_bootstrap_hyper_schema_describes_itself() {
        for draft in Draft::ALL {
            let env = draft.environment().unwrap();
            let hyper = env.find_schema(&draft.hyper_schema_uri()).unwrap();
            let schema = env.find_schema(&draft.schema_uri()).unwrap();
            let links = env.find_schema(&draft.links_uri()).unwrap();

            assert_eq!(env[hyper].meta(), hyper, "{draft}");
            assert_eq!(env[schema].meta(), hyper, "{draft}");
            assert_eq!(env[links].meta(), hyper, "{draft}");
            assert_eq!(env.default_schema(), Some(hyper));
            assert_eq!(env.find_schema("http://json-schema.org/hyper-schema#"), Some(hyper));
            assert_eq!(env[hyper].fragment_delimiter(), draft.fragment_delimiter());
        }
    }

    #[test]
    fn test_links_items_point_at_final_links_schema() {
        let env = Draft::Draft03.environment().unwrap();
        let hyper = env.find_schema(&Draft::Draft03.hyper_schema_uri()).unwrap();
        let links = env.find_schema(&Draft::Draft03.links_uri()).unwrap();

        let definition = env
            .find_schema("http://json-schema.org/draft-03/hyper-schema#/properties/links")
            .unwrap();
        let items = env[definition]
            .attribute(&Keyword::Items)
            .and_then(crate::AttributeValue::as_schema)
            .unwrap();
        assert_eq!(items, links);
        assert!(env[hyper].definitions().contains(&Keyword::Links));
        assert!(env[hyper].definitions().contains(&Keyword::Required));
        assert!(!env[hyper].definitions().contains(&Keyword::Optional));
    }

    #[test]
    fn test_dot_delimited_fragments_in_draft_00() {
        let env = Draft::Draft00.environment().unwrap();
        assert!(
            env.find_schema("http://json-schema.org/draft-00/schema#properties.minimum")
                .is_some()
        );
    }
}

//! Schema document loader for JSON and YAML files

use crate::environment::{Environment, MetaSchema};
use crate::model::SchemaId;
use crate::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Extensions tried, in order, when a document is looked up by name
const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Reads schema and instance documents and registers schemas
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    search_paths: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a loader with the given search paths
    #[must_use]
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Add a search path for document files
    pub fn add_path(&mut self, path: PathBuf) {
        self.search_paths.push(path);
    }

    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Parse a JSON document
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] when the text is not valid JSON.
    pub fn parse_json(text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| Error::Parse(format!("JSON parse error: {e}")))
    }

    /// Parse a YAML document into the same value model as JSON
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] when the text is not valid YAML or has no JSON
    /// equivalent.
    pub fn parse_yaml(text: &str) -> Result<Value> {
        serde_yaml::from_str(text).map_err(|e| Error::Parse(format!("YAML parse error: {e}")))
    }

    /// Read a document, choosing the parser by file extension
    ///
    /// `.yaml` and `.yml` files are read as YAML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be read, [`Error::Parse`] when
    /// it cannot be parsed.
    pub fn load_file(&self, path: &Path) -> Result<Value> {
        trace!(path = %path.display(), "loading document");
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            Self::parse_yaml(&content)
        } else {
            Self::parse_json(&content)
        }
    }

    /// Locate a document by name in the search paths
    ///
    /// The name is tried as given, then with each supported extension.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no search path holds a matching file.
    pub fn find(&self, name: &str) -> Result<PathBuf> {
        for dir in &self.search_paths {
            let exact = dir.join(name);
            if exact.is_file() {
                trace!(path = %exact.display(), "found document");
                return Ok(exact);
            }
            for extension in EXTENSIONS {
                let candidate = dir.join(format!("{name}.{extension}"));
                if candidate.is_file() {
                    trace!(path = %candidate.display(), "found document");
                    return Ok(candidate);
                }
            }
        }

        Err(Error::NotFound(format!(
            "{name} not found in search paths: {:?}",
            self.search_paths
        )))
    }

    /// Load a document by name from the search paths
    ///
    /// # Errors
    ///
    /// As [`SchemaLoader::find`] and [`SchemaLoader::load_file`].
    pub fn load(&self, name: &str) -> Result<Value> {
        let path = self.find(name)?;
        self.load_file(&path)
    }

    /// Load a schema file and build it in `env` with the default
    /// meta-schema
    ///
    /// The schema is registered under `uri`, or the file's absolute
    /// `file://` URI when none is given.
    ///
    /// # Errors
    ///
    /// As [`SchemaLoader::load_file`], plus construction errors.
    pub fn load_into(&self, env: &mut Environment, path: &Path, uri: Option<&str>) -> Result<SchemaId> {
        let value = self.load_file(path)?;
        let uri = match uri {
            Some(uri) => uri.to_string(),
            None => file_uri(path)?,
        };

        debug!(path = %path.display(), uri = %uri, "registering schema document");
        let id = env.create_schema(value.into(), MetaSchema::Default, Some(&uri))?;
        info!(uri = %env[id].uri(), "loaded schema");
        Ok(id)
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new(vec![PathBuf::from(".")])
    }
}

/// `file://` URI of a path, made absolute against the working directory
///
/// # Errors
///
/// [`Error::Io`] when the working directory cannot be determined.
pub fn file_uri(path: &Path) -> Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let text = absolute.to_string_lossy().replace('\\', "/");
    let text = if text.starts_with('/') { text } else { format!("/{text}") };
    Ok(format!("file://{text}#"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json() {
        let value = SchemaLoader::parse_json(r#"{"type": "string", "maxLength": 3}"#).unwrap();
        assert_eq!(value, json!({"type": "string", "maxLength": 3}));
    }

    #[test]
    fn test_parse_json_invalid() {
        let result = SchemaLoader::parse_json("not valid json");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "type: object\nproperties:\n  name:\n    type: string\n";
        let value = SchemaLoader::parse_yaml(yaml).unwrap();
        assert_eq!(
            value,
            json!({"type": "object", "properties": {"name": {"type": "string"}}})
        );
    }

    #[test]
    fn test_parse_yaml_invalid() {
        let result = SchemaLoader::parse_yaml("type: [");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_file_uri() {
        let uri = file_uri(Path::new("/tmp/schemas/person.json")).unwrap();
        assert_eq!(uri, "file:///tmp/schemas/person.json#");
        assert!(file_uri(Path::new("person.json")).unwrap().starts_with("file:///"));
    }

    #[test]
    fn test_find_missing() {
        let loader = SchemaLoader::new(vec![PathBuf::from("does-not-exist")]);
        assert!(matches!(loader.find("person"), Err(Error::NotFound(_))));
    }
}

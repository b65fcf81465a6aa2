//! Serialization of generated documents to YAML or JSON.

use crate::error::Result;
use crate::generator::Document;
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Serializing document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes a document to pretty-printed JSON, suitable for human review
/// and version control.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing document to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Serializes any response value to pretty-printed JSON.
pub fn serialize_json_value<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Serializes any response value to YAML.
pub fn serialize_yaml_value<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn empty_document() -> Document {
        Document {
            apis: Vec::new(),
            models: IndexMap::new(),
        }
    }

    #[test]
    fn test_serialize_json_shape() {
        let json = serialize_json(&empty_document()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["apis"].is_array());
        assert!(value["models"].is_object());
    }

    #[test]
    fn test_serialize_yaml_shape() {
        let yaml = serialize_yaml(&empty_document()).unwrap();

        assert!(yaml.contains("apis"));
        assert!(yaml.contains("models"));
    }

    #[test]
    fn test_write_to_file_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/out.json");

        write_to_file("{}", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}

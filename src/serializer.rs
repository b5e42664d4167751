//! Serialization of documents to YAML or JSON.
//!
//! YAML output never emits anchors or aliases (serde_yaml does not generate
//! them); JSON output is pretty-printed with two-space indentation.

use crate::document::Document;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML.
pub fn serialize_yaml(document: &Document) -> Result<String> {
    debug!("Serializing document to YAML");
    serde_yaml::to_string(document).context("Failed to serialize document to YAML")
}

/// Serializes a document to pretty-printed JSON.
pub fn serialize_json(document: &Document) -> Result<String> {
    debug!("Serializing document to JSON");
    serde_json::to_string_pretty(document).context("Failed to serialize document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_document() -> Document {
        serde_json::from_value(json!({
            "openapi": "3.0.0",
            "info": {"title": "Test API", "version": "1.0.0"},
            "servers": [{"url": "https://api.example.com"}],
            "paths": {
                "/pets": {"get": {"operationId": "listPets"}}
            },
            "components": {"schemas": {"Pet": {"type": "object"}}}
        }))
        .unwrap()
    }

    #[test]
    fn yaml_output_contains_expected_fields() {
        let yaml = serialize_yaml(&test_document()).unwrap();
        assert!(yaml.contains("openapi: 3.0.0"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("/pets:"));
        // no anchors or aliases
        assert!(!yaml.contains('&'));
        assert!(!yaml.contains('*'));
    }

    #[test]
    fn json_output_is_pretty_printed() {
        let json = serialize_json(&test_document()).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("  \"openapi\""));
    }

    #[test]
    fn json_and_yaml_round_trips_are_structurally_equivalent() {
        let doc = test_document();

        let from_json: Document = serde_json::from_str(&serialize_json(&doc).unwrap()).unwrap();
        let from_yaml: Document = serde_yaml::from_str(&serialize_yaml(&doc).unwrap()).unwrap();

        assert_eq!(doc, from_json);
        assert_eq!(doc, from_yaml);
    }

    #[test]
    fn write_to_file_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("openapi.yaml");

        write_to_file("content", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn write_to_file_overwrites_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("openapi.yaml");

        write_to_file("initial", &path).unwrap();
        write_to_file("replaced", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "replaced");
    }
}

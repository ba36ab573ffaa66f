//! Serialization of generated documents to YAML or JSON, and file output.

use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::debug;
use std::fs;
use std::path::Path;

/// Output format of a generated document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Serializes a document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes a document to pretty-printed JSON.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

pub fn serialize(doc: &OpenApiDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serialize_yaml(doc),
        OutputFormat::Json => serialize_json(doc),
    }
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi_builder::{Info, Operation, PathItem, Response, Server, OPENAPI_VERSION};
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn create_test_document() -> OpenApiDocument {
        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: "OK".to_string(),
                content: None,
            },
        );
        let mut paths = IndexMap::new();
        paths.insert(
            "/api/Ping".to_string(),
            PathItem {
                get: Some(Operation {
                    operation_id: Some("Ping".to_string()),
                    responses,
                    ..Operation::default()
                }),
                ..PathItem::default()
            },
        );

        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: "Test API".to_string(),
                version: "1.0.0".to_string(),
                description: None,
            },
            servers: vec![Server {
                url: "https://example.com/api".to_string(),
            }],
            paths,
            components: None,
        }
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("openapi: 3.0.1"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("url: https://example.com/api"));
        assert!(yaml.contains("operationId: Ping"));
        assert!(!yaml.contains("components"));
        assert!(!yaml.contains("description: null"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize(&create_test_document(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["openapi"], "3.0.1");
        assert_eq!(value["servers"][0]["url"], "https://example.com/api");
        assert_eq!(value["paths"]["/api/Ping"]["get"]["responses"]["200"]["description"], "OK");
        assert!(value["paths"]["/api/Ping"].get("post").is_none());
    }

    #[test]
    fn test_no_servers_omitted() {
        let document = OpenApiDocument {
            servers: Vec::new(),
            ..create_test_document()
        };
        let json = serialize_json(&document).unwrap();
        assert!(!json.contains("servers"));
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docs/v1/openapi.yaml");

        write_to_file("openapi: 3.0.1\n", &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "openapi: 3.0.1\n");
    }

    #[test]
    fn test_write_to_file_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("openapi.json");

        write_to_file("first", &path).unwrap();
        write_to_file("second", &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}

//! Generator configuration.
//!
//! The configuration supplies the route prefix the functions are hosted under and the list
//! of OpenAPI documents to serve. It is read from a YAML or JSON file:
//!
//! ```yaml
//! route_prefix: api
//! documents:
//!   - name: v1
//!     title: Orders API
//!     version: "1.0"
//!     description: Order management functions
//! ```

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_ROUTE_PREFIX: &str = "api";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Prefix prepended to every function route
    pub route_prefix: String,
    /// Documents to generate; empty means a single default document
    pub documents: Vec<DocumentConfig>,
}

/// One OpenAPI document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub name: String,
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            documents: Vec::new(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            name: "v1".to_string(),
            title: "Open API Documentation".to_string(),
            version: "v1".to_string(),
            description: None,
        }
    }
}

impl GeneratorConfig {
    /// Loads a configuration file. YAML is a superset of JSON, so both formats are accepted.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            Error::SerializationError(message) => Error::ParseError {
                file: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn with_route_prefix(mut self, route_prefix: impl Into<String>) -> Self {
        self.route_prefix = route_prefix.into();
        self
    }

    /// The configured documents, or the default document when none are configured
    pub fn documents(&self) -> Vec<DocumentConfig> {
        if self.documents.is_empty() {
            vec![DocumentConfig::default()]
        } else {
            self.documents.clone()
        }
    }

    pub fn document(&self, name: &str) -> Option<DocumentConfig> {
        self.documents().into_iter().find(|d| d.name == name)
    }
}

//! Manifest loading.
//!
//! The CLI consumes a manifest file describing an API surface: pipeline
//! configuration, serializer type declarations and the route tree. JSON
//! and YAML are both accepted, chosen by file extension.

use crate::config::DocsConfig;
use crate::error::{Error, Result};
use crate::routes::RouteNode;
use crate::type_registry::{SchemaType, TypeRegistry};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A declarative description of one API surface.
#[derive(Debug, Deserialize)]
pub struct ApiManifest {
    /// Pipeline configuration; every knob has a default
    #[serde(default)]
    pub config: DocsConfig,
    /// Serializer type declarations
    #[serde(default)]
    pub types: Vec<SchemaType>,
    /// The routing configuration tree
    #[serde(default)]
    pub routes: Vec<RouteNode>,
}

impl ApiManifest {
    /// Loads a manifest from a JSON (`.json`) or YAML (anything else)
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse as a
    /// manifest.
    pub fn load(path: &Path) -> Result<ApiManifest> {
        debug!("Loading manifest from {}", path.display());
        let content = fs::read_to_string(path)?;

        let manifest = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(|e| Error::ManifestError {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| Error::ManifestError {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Ok(manifest)
    }

    /// Builds the type registry from the declared types.
    pub fn type_registry(&self) -> TypeRegistry {
        TypeRegistry::from_types(self.types.clone())
    }
}

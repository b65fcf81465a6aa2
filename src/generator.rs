//! Final document assembly.
//!
//! The generator composes route entries, the introspectors and the schema
//! registry into the document served to the documentation UI: one entry
//! per endpoint plus a deduplicated map of every referenced schema.

use crate::config::DocsConfig;
use crate::docparser::DocParser;
use crate::error::Result;
use crate::introspect::{OperationDescriptor, ViewIntrospector};
use crate::routes::RouteEntry;
use crate::schema::{SchemaDocument, SchemaRegistry};
use crate::type_registry::TypeRegistry;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

/// One documented endpoint of the final document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiDeclaration {
    /// Class-level description of the endpoint
    pub description: Option<String>,
    /// Fully-resolved path
    pub path: String,
    /// One entry per documented HTTP method
    pub operations: Vec<OperationDescriptor>,
}

/// The complete generated documentation document.
///
/// Serializes directly to the JSON shape the documentation UI consumes:
/// `apis` in route order and `models` keyed by schema id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Documented endpoints, in route order
    pub apis: Vec<ApiDeclaration>,
    /// Every referenced schema, expanded exactly once
    pub models: IndexMap<String, SchemaDocument>,
}

/// Generates documentation for flattened route entries.
pub struct DocumentationGenerator<'a> {
    config: &'a DocsConfig,
    types: &'a TypeRegistry,
    parser: Box<dyn DocParser>,
}

impl<'a> DocumentationGenerator<'a> {
    /// Creates a generator using the configured docstring parser.
    pub fn new(config: &'a DocsConfig, types: &'a TypeRegistry) -> Self {
        Self {
            config,
            types,
            parser: config.parser.parser(),
        }
    }

    /// Generates the document for the given entries.
    ///
    /// Schema state is scoped to this one call; nothing leaks into the
    /// next invocation. Structural handler errors abort the run, while
    /// content-level problems (missing docstrings, unresolvable
    /// overrides) degrade to absent fields.
    pub fn generate(&self, entries: &[RouteEntry]) -> Result<Document> {
        let mut registry = SchemaRegistry::new(self.types);
        let mut apis = Vec::with_capacity(entries.len());

        for entry in entries {
            debug!("Documenting {}", entry.path);
            let view = ViewIntrospector::new(entry, self.parser.as_ref(), self.types, self.config);
            let (operations, referenced) = view.list_operations()?;

            for name in referenced {
                registry.register(&name);
            }

            apis.push(ApiDeclaration {
                description: view.description().map(str::to_string),
                path: entry.path.clone(),
                operations,
            });
        }

        Ok(Document {
            apis,
            models: registry.generate(),
        })
    }
}

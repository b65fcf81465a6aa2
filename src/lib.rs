//! Swagger-from-routes - API documentation generated from route manifests.
//!
//! This library turns a declarative description of a web API - its route
//! tree, endpoint handlers and serializer types - into a machine-readable
//! documentation document consumable by an interactive documentation UI.
//! No HTTP serving is involved: the serving layer describes its surface,
//! the pipeline introspects the description in memory.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`manifest`] - Loads JSON/YAML manifests describing an API surface
//! 2. [`routes`] - Flattens the nested route tree into endpoint entries
//! 3. [`docparser`] - Parses endpoint docstrings into structured documents
//! 4. [`introspect`] - Produces one operation descriptor per HTTP method
//! 5. [`type_registry`] - Resolves serializer type names to declarations
//! 6. [`schema`] - Expands referenced types into schema documents
//! 7. [`generator`] - Assembles the final `apis` + `models` document
//! 8. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_routes::{
//!     generator::DocumentationGenerator,
//!     manifest::ApiManifest,
//!     routes::RouteCollector,
//!     serializer::serialize_json,
//! };
//! use std::path::Path;
//!
//! // Load a manifest describing routes and serializer types
//! let manifest = ApiManifest::load(Path::new("./api.yaml")).unwrap();
//! let types = manifest.type_registry();
//! let config = manifest.config.clone();
//!
//! // Flatten the route tree into endpoint entries
//! let collector = RouteCollector::new(manifest.routes);
//! let entries = collector.get_routes(&config.exclude_namespaces, None);
//!
//! // Generate the document and serialize it
//! let generator = DocumentationGenerator::new(&config, &types);
//! let document = generator.generate(&entries).unwrap();
//! let json = serialize_json(&document).unwrap();
//! println!("{}", json);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete
//! CLI application.

pub mod cli;
pub mod config;
pub mod docparser;
pub mod endpoint;
pub mod error;
pub mod generator;
pub mod introspect;
pub mod manifest;
pub mod routes;
pub mod schema;
pub mod serializer;
pub mod type_registry;

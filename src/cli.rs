//! Command-line interface for generating documentation from a manifest.

use crate::generator::Document;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;

/// Swagger-from-routes - Generate Swagger-style API documentation from a route manifest
#[derive(Parser, Debug)]
#[command(name = "swagger-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the API manifest file (JSON or YAML)
    #[arg(value_name = "MANIFEST")]
    pub manifest_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Only document endpoints whose path contains this substring
    #[arg(short = 'r', long = "resource", value_name = "PATH")]
    pub resource: Option<String>,

    /// Print the top-level resource index instead of the full document
    #[arg(long = "resources")]
    pub resources: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// The top-level resource index listing one path per first segment.
#[derive(Debug, Serialize)]
pub struct ResourceIndex {
    /// Version string from the pipeline configuration
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    /// Version of the documentation format
    #[serde(rename = "swaggerVersion")]
    pub swagger_version: String,
    /// Base path the API is mounted under
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// One entry per top-level resource
    pub apis: Vec<ResourcePath>,
}

/// One resource of the index.
#[derive(Debug, Serialize)]
pub struct ResourcePath {
    /// Path of the resource, rooted at the base path
    pub path: String,
}

/// The full documentation response: the generated document plus the base
/// path it is served under.
#[derive(Debug, Serialize)]
pub struct ApiDocResponse {
    /// The generated document
    #[serde(flatten)]
    pub document: Document,
    /// Base path the API is mounted under
    #[serde(rename = "basePath")]
    pub base_path: String,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.exists() {
        anyhow::bail!(
            "Manifest file does not exist: {}",
            args.manifest_path.display()
        );
    }
    if !args.manifest_path.is_file() {
        anyhow::bail!(
            "Manifest path is not a file: {}",
            args.manifest_path.display()
        );
    }

    info!("Manifest: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref resource) = args.resource {
        info!("Resource filter: {}", resource);
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::generator::DocumentationGenerator;
    use crate::manifest::ApiManifest;
    use crate::routes::{first_path_segment, RouteCollector};
    use crate::serializer::{serialize_json_value, serialize_yaml_value, write_to_file};

    info!("Starting documentation generation...");

    // Step 1: Load the manifest
    info!("Loading manifest...");
    let manifest = ApiManifest::load(&args.manifest_path)?;
    info!(
        "Manifest declares {} types and {} route nodes",
        manifest.types.len(),
        manifest.routes.len()
    );

    // Step 2: Build the type registry and flatten the route tree
    let types = manifest.type_registry();
    let config = manifest.config.clone();

    let collector = RouteCollector::new(manifest.routes);
    let entries = collector.get_routes(&config.exclude_namespaces, args.resource.as_deref());
    info!("Collected {} API endpoints", entries.len());

    // Step 3: Produce the requested document
    let content = if args.resources {
        info!("Building resource index...");
        let top_level = RouteCollector::get_top_level_apis(&entries);
        let index = ResourceIndex {
            api_version: config.api_version.clone(),
            swagger_version: "1.2".to_string(),
            base_path: config.base_path.trim_end_matches('/').to_string(),
            apis: top_level
                .iter()
                .map(|entry| ResourcePath {
                    path: format!("/{}", first_path_segment(&entry.path)),
                })
                .collect(),
        };
        match args.output_format {
            OutputFormat::Yaml => serialize_yaml_value(&index)?,
            OutputFormat::Json => serialize_json_value(&index)?,
        }
    } else {
        info!("Generating documentation...");
        let generator = DocumentationGenerator::new(&config, &types);
        let document = generator.generate(&entries)?;
        info!(
            "Documented {} endpoints referencing {} models",
            document.apis.len(),
            document.models.len()
        );

        let response = ApiDocResponse {
            document,
            base_path: config.base_path.trim_end_matches('/').to_string(),
        };
        match args.output_format {
            OutputFormat::Yaml => serialize_yaml_value(&response)?,
            OutputFormat::Json => serialize_json_value(&response)?,
        }
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote documentation to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");

    Ok(())
}

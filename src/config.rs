//! Explicit pipeline configuration.
//!
//! All knobs are plain values handed to the collector and generator at
//! construction time; nothing is read from ambient global state.

use crate::docparser::{DocParser, RstDocParser, SimpleDocParser};
use crate::endpoint::HttpMethod;
use serde::{Deserialize, Serialize};

/// Which docstring parsing strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserStrategy {
    /// Loose `name -- description` parameter lines
    #[default]
    Simple,
    /// Indentation-sensitive `:section:` markup
    Rst,
}

impl ParserStrategy {
    /// Instantiates the selected parser.
    pub fn parser(&self) -> Box<dyn DocParser> {
        match self {
            ParserStrategy::Simple => Box::new(SimpleDocParser),
            ParserStrategy::Rst => Box::new(RstDocParser),
        }
    }
}

/// Configuration for one documentation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Docstring parsing strategy
    pub parser: ParserStrategy,
    /// Namespaces whose route subtrees are left undocumented
    pub exclude_namespaces: Vec<String>,
    /// HTTP methods that show up in the documentation
    pub enabled_methods: Vec<HttpMethod>,
    /// Version string reported in the resource index
    pub api_version: String,
    /// Base path the documented API is mounted under
    pub base_path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            parser: ParserStrategy::default(),
            exclude_namespaces: Vec::new(),
            enabled_methods: vec![
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Put,
                HttpMethod::Patch,
                HttpMethod::Delete,
            ],
            api_version: String::new(),
            base_path: "/".to_string(),
        }
    }
}

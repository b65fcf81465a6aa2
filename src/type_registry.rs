//! Serializer type registry.
//!
//! Docstring overrides refer to serializer types by name. Instead of
//! parsing import paths at documentation time, every type the serving
//! layer knows about is registered up front under its declared name, and
//! lookups that miss simply resolve to "no override present".

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Registry of all serializer/deserializer types known to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, SchemaType>,
}

/// A serializer type as declared by the serving layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaType {
    /// Declared name; doubles as the schema id
    pub name: String,
    /// Declared fields, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// One declared field of a serializer type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// What the field holds
    pub kind: FieldKind,
    /// Whether a value must be supplied on input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Output-only fields are invisible to form parameters
    #[serde(default)]
    pub read_only: bool,
    /// Help text shown next to the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Minimum accepted length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum accepted length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Whether the field holds a list of its kind
    #[serde(default)]
    pub many: bool,
    /// Excluded fields are invisible to the documentation entirely
    #[serde(default)]
    pub excluded: bool,
}

/// The kind of value a field holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Plain text
    String,
    /// Whole number
    Integer,
    /// Floating-point number
    Float,
    /// True/false
    Boolean,
    /// Calendar date
    Date,
    /// Date and time
    DateTime,
    /// E-mail address
    Email,
    /// URL
    Url,
    /// One of a fixed set of literal values
    Choice {
        /// The allowed values, in declaration order
        choices: Vec<String>,
    },
    /// Reference to another entity by identifier
    Related,
    /// An embedded serializer type
    Nested {
        /// Name of the embedded type
        to: String,
    },
}

impl FieldKind {
    /// The primitive type label used in schemas and form parameters.
    /// Nested kinds are labelled with their target type's name.
    pub fn type_label(&self) -> &str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
            FieldKind::Choice { .. } => "string",
            FieldKind::Related => "integer",
            FieldKind::Nested { to } => to,
        }
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a list of declared types. Re-declared names
    /// overwrite earlier entries.
    pub fn from_types(types: Vec<SchemaType>) -> Self {
        debug!("Building type registry with {} types", types.len());
        let mut registry = Self::new();
        for ty in types {
            registry.insert(ty);
        }
        registry
    }

    /// Adds one type under its declared name.
    pub fn insert(&mut self, ty: SchemaType) {
        self.types.insert(ty.name.clone(), ty);
    }

    /// Looks up a type by declared name.
    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// Resolves a docstring override. A name that is not registered is
    /// treated as "no override present": the caller falls back to the next
    /// source in its resolution order.
    pub fn resolve_override(&self, name: &str) -> Option<&SchemaType> {
        let resolved = self.types.get(name);
        if resolved.is_none() {
            warn!("Serializer override '{}' does not resolve, ignoring", name);
        }
        resolved
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

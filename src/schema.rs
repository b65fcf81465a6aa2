//! Schema synthesis.
//!
//! Serializer types referenced by operations are expanded into schema
//! documents. Expansion is driven by a worklist: registering a type queues
//! it, draining the queue expands one type at a time, and nested references
//! discovered along the way are queued in turn. A type already expanded is
//! never expanded again, which keeps cyclic type graphs terminating and
//! every schema id unique.

use crate::type_registry::{FieldDef, FieldKind, SchemaType, TypeRegistry};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// A fully-expanded schema, keyed by the type's declared name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    /// The type's declared name
    pub id: String,
    /// One property per visible declared field, in declaration order
    pub properties: IndexMap<String, PropertySpec>,
}

/// One property of a schema document.
///
/// Only keys that carry a value survive serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySpec {
    /// Primitive name, `array`, or a schema id
    #[serde(rename = "type")]
    pub property_type: String,
    /// Whether input must supply the field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Whether the field is output-only
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// Help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Minimum accepted length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u64>,
    /// Maximum accepted length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u64>,
    /// Allowed literal values, for choice-like fields
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Element descriptor, for array properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsSpec>,
}

/// Element descriptor of an array property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemsSpec {
    /// Elements of a primitive type
    Type {
        /// The primitive type name
        #[serde(rename = "type")]
        ty: String,
    },
    /// Elements described by another schema
    Ref {
        /// The referenced schema id
        #[serde(rename = "$ref")]
        reference: String,
    },
}

/// Expands registered serializer types into schema documents.
///
/// A registry is scoped to a single generation run; create a fresh one per
/// call rather than sharing instances.
pub struct SchemaRegistry<'a> {
    types: &'a TypeRegistry,
    pending: VecDeque<String>,
    registered: HashSet<String>,
}

impl<'a> SchemaRegistry<'a> {
    /// Creates an empty registry resolving names against `types`.
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self {
            types,
            pending: VecDeque::new(),
            registered: HashSet::new(),
        }
    }

    /// Queues a type for expansion. Registering the same name twice is a
    /// no-op.
    pub fn register(&mut self, name: &str) {
        if self.registered.insert(name.to_string()) {
            debug!("Queued schema type '{}'", name);
            self.pending.push_back(name.to_string());
        }
    }

    /// Drains the worklist and returns one schema document per registered
    /// type, keyed by id, in registration order.
    pub fn generate(mut self) -> IndexMap<String, SchemaDocument> {
        let types = self.types;
        let mut done: IndexMap<String, SchemaDocument> = IndexMap::new();

        while let Some(name) = self.pending.pop_front() {
            if done.contains_key(&name) {
                continue;
            }
            let Some(ty) = types.get(&name) else {
                warn!("Registered schema type '{}' is not declared, skipping", name);
                continue;
            };
            let document = self.expand(ty);
            done.insert(name, document);
        }

        done
    }

    fn expand(&mut self, ty: &SchemaType) -> SchemaDocument {
        debug!("Expanding schema type '{}'", ty.name);
        let mut properties = IndexMap::new();

        for field in &ty.fields {
            if field.excluded {
                continue;
            }
            properties.insert(field.name.clone(), self.field_to_property(field));
        }

        SchemaDocument {
            id: ty.name.clone(),
            properties,
        }
    }

    fn field_to_property(&mut self, field: &FieldDef) -> PropertySpec {
        let mut property = PropertySpec {
            property_type: field.kind.type_label().to_string(),
            required: field.required,
            read_only: if field.read_only { Some(true) } else { None },
            description: field.help_text.clone(),
            default: field.default.clone(),
            minimum: field.min_length,
            maximum: field.max_length,
            enum_values: None,
            items: None,
        };

        match &field.kind {
            FieldKind::Choice { choices } => {
                property.enum_values = Some(choices.clone());
            }
            FieldKind::Nested { to } => {
                self.register(to);
            }
            _ => {}
        }

        if field.many {
            property.items = Some(match &field.kind {
                FieldKind::Nested { to } => ItemsSpec::Ref {
                    reference: to.clone(),
                },
                kind => ItemsSpec::Type {
                    ty: kind.type_label().to_string(),
                },
            });
            property.property_type = "array".to_string();
        }

        property
    }
}

//! Endpoint introspection.
//!
//! For each flattened route entry, the introspector works out which HTTP
//! methods the endpoint answers, parses class-level and method-level
//! docstrings, resolves the serializer and deserializer types, and emits
//! one operation descriptor per documented method.

use crate::config::DocsConfig;
use crate::docparser::{DocParser, ParamLocation, ParamSpec, ParsedDoc};
use crate::endpoint::{HandlerKind, HttpMethod};
use crate::error::{Error, Result};
use crate::routes::RouteEntry;
use crate::type_registry::{SchemaType, TypeRegistry};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::Serialize;

/// One documented status code of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMessage {
    /// Status code as written in the docstring
    pub code: String,
    /// Message shown next to the code
    pub message: String,
}

/// Everything the documentation UI needs to render one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    /// Uppercase HTTP method
    #[serde(rename = "httpMethod")]
    pub http_method: String,
    /// First sentence of the most specific docstring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Handler display name with spaces replaced
    pub nickname: String,
    /// Merged class and method description
    pub notes: String,
    /// Name of the response-serializing type
    #[serde(rename = "responseClass", skip_serializing_if = "Option::is_none")]
    pub response_type_name: Option<String>,
    /// Path, query and form/body parameters, in that order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParamSpec>,
    /// Documented status codes, in docstring order
    #[serde(rename = "responseMessages", skip_serializing_if = "Option::is_none")]
    pub response_messages: Option<Vec<ResponseMessage>>,
}

/// Introspects one route entry. The class-level docstring is parsed once
/// at construction and shared by every method of the endpoint.
pub struct ViewIntrospector<'a> {
    entry: &'a RouteEntry,
    parser: &'a dyn DocParser,
    types: &'a TypeRegistry,
    config: &'a DocsConfig,
    doc: ParsedDoc,
}

impl<'a> ViewIntrospector<'a> {
    /// Creates an introspector for `entry`, parsing its class docstring.
    pub fn new(
        entry: &'a RouteEntry,
        parser: &'a dyn DocParser,
        types: &'a TypeRegistry,
        config: &'a DocsConfig,
    ) -> Self {
        let doc = parser.parse(entry.handler.doc());
        Self {
            entry,
            parser,
            types,
            config,
            doc,
        }
    }

    /// Class-level description
    pub fn description(&self) -> Option<&str> {
        self.doc.description.as_deref()
    }

    /// First sentence of the first line of the class docstring
    pub fn summary(&self) -> Option<&str> {
        self.doc.summary.as_deref()
    }

    /// The endpoint's response-serializing type: the class docstring
    /// override if it resolves, else the handler's declared default.
    pub fn serializer(&self) -> Option<&SchemaType> {
        self.doc
            .serializer
            .as_deref()
            .and_then(|name| self.types.resolve_override(name))
            .or_else(|| {
                self.entry
                    .handler
                    .default_serializer()
                    .and_then(|name| self.types.get(name))
            })
    }

    /// The endpoint's request-deserializing type. Explicit overrides win;
    /// absent those, the handler's declared default, then the serializer.
    pub fn deserializer(&self) -> Option<&SchemaType> {
        self.doc
            .deserializer
            .as_deref()
            .and_then(|name| self.types.resolve_override(name))
            .or_else(|| {
                self.entry
                    .handler
                    .default_deserializer()
                    .and_then(|name| self.types.get(name))
            })
            .or_else(|| self.serializer())
    }

    /// One operation descriptor per documented HTTP method, plus the names
    /// of every serializer type the operations reference.
    pub fn list_operations(&self) -> Result<(Vec<OperationDescriptor>, Vec<String>)> {
        let mut operations = Vec::new();
        let mut referenced = Vec::new();

        for (http_method, attr) in self.method_bindings()? {
            debug!(
                "Introspecting {} {} ({})",
                http_method, self.entry.path, attr
            );
            let method = MethodIntrospector::new(self, http_method, &attr);

            if let Some(serializer) = method.serializer() {
                referenced.push(serializer.name.clone());
            }
            if http_method.is_mutating() {
                if let Some(deserializer) = method.deserializer() {
                    referenced.push(deserializer.name.clone());
                }
            }

            operations.push(method.operation());
        }

        Ok((operations, referenced))
    }

    /// Resolves the endpoint kind into (HTTP method, docstring attribute)
    /// pairs. OPTIONS carries no documentation value and is always
    /// dropped; methods outside the configured set are dropped too.
    fn method_bindings(&self) -> Result<Vec<(HttpMethod, String)>> {
        let enabled = &self.config.enabled_methods;

        match &self.entry.handler.kind {
            HandlerKind::SingleAction { methods } => Ok(methods
                .iter()
                .filter(|m| **m != HttpMethod::Options && enabled.contains(*m))
                .map(|m| (*m, m.attr_name().to_string()))
                .collect()),
            HandlerKind::ResourceAction { actions } => {
                if actions.is_empty() {
                    return Err(Error::ConfigurationError(format!(
                        "resource-action handler '{}' has no action bindings",
                        self.entry.handler.name
                    )));
                }
                Ok(actions
                    .iter()
                    .filter(|b| b.method != HttpMethod::Options && enabled.contains(&b.method))
                    .map(|b| (b.method, b.action.clone()))
                    .collect())
            }
        }
    }
}

/// Introspects one HTTP method of an endpoint.
pub struct MethodIntrospector<'a> {
    view: &'a ViewIntrospector<'a>,
    http_method: HttpMethod,
    doc: ParsedDoc,
}

impl<'a> MethodIntrospector<'a> {
    /// Creates a method introspector, parsing the docstring found under
    /// `attr` on the handler.
    pub fn new(view: &'a ViewIntrospector<'a>, http_method: HttpMethod, attr: &str) -> Self {
        let doc = view.parser.parse(view.entry.handler.method_doc(attr));
        Self {
            view,
            http_method,
            doc,
        }
    }

    /// The method's summary; falls back to the class summary when the
    /// method itself carries no docstring.
    pub fn summary(&self) -> Option<String> {
        self.doc
            .summary
            .clone()
            .or_else(|| self.view.summary().map(str::to_string))
    }

    /// Handler display name with spaces replaced by underscores.
    pub fn nickname(&self) -> String {
        self.view.entry.handler.display_name().replace(' ', "_")
    }

    /// Class description followed by the method description. Methods
    /// always inherit the class comments; paragraph gaps collapse to a
    /// single line break.
    pub fn notes(&self) -> String {
        let mut notes = String::new();

        if let Some(class_desc) = self.view.description() {
            notes.push_str(class_desc);
            notes.push('\n');
        }
        if let Some(method_desc) = self.doc.description.as_deref() {
            notes.push_str(method_desc);
        }

        notes.trim().replace("\n\n", "\n")
    }

    /// Response serializer: method docstring override, then the
    /// class-level resolution.
    pub fn serializer(&self) -> Option<&SchemaType> {
        self.doc
            .serializer
            .as_deref()
            .and_then(|name| self.view.types.resolve_override(name))
            .or_else(|| self.view.serializer())
    }

    /// Request deserializer: method docstring deserializer, then the
    /// method serializer override, then the class-level resolution.
    pub fn deserializer(&self) -> Option<&SchemaType> {
        self.doc
            .deserializer
            .as_deref()
            .and_then(|name| self.view.types.resolve_override(name))
            .or_else(|| {
                self.doc
                    .serializer
                    .as_deref()
                    .and_then(|name| self.view.types.resolve_override(name))
            })
            .or_else(|| self.view.deserializer())
    }

    /// Path parameters, then query parameters, then form or body
    /// parameters for methods that carry a request body.
    pub fn parameters(&self) -> Vec<ParamSpec> {
        let mut params = self.build_path_parameters();
        params.extend(self.build_query_parameters());

        if !self.http_method.is_mutating() {
            return params;
        }

        let form_params = self.build_form_parameters();
        if form_params.is_empty() {
            if let Some(body) = self.build_body_parameter() {
                params.push(body);
            }
        } else {
            params.extend(form_params);
        }

        params
    }

    /// Extracts `{name}` placeholders from the resolved path. Every path
    /// parameter is a required string.
    fn build_path_parameters(&self) -> Vec<ParamSpec> {
        let param_regex = Regex::new(r"/\{([^}]*)\}").expect("valid regex");

        param_regex
            .captures_iter(&self.view.entry.path)
            .map(|cap| ParamSpec {
                data_type: Some("string".to_string()),
                required: Some(true),
                ..ParamSpec::new(&cap[1], ParamLocation::Path)
            })
            .collect()
    }

    /// Method-level query parameters first, class-level ones after.
    fn build_query_parameters(&self) -> Vec<ParamSpec> {
        let mut params = Vec::new();

        if let Some(query) = &self.doc.query_params {
            params.extend(query.iter().cloned());
        }
        if let Some(query) = &self.view.doc.query_params {
            params.extend(query.iter().cloned());
        }

        params
    }

    /// The explicit `post` docstring list wins; otherwise form parameters
    /// are derived from the deserializer's writable fields.
    fn build_form_parameters(&self) -> Vec<ParamSpec> {
        if let Some(post) = &self.doc.post_params {
            return post.clone();
        }

        let Some(deserializer) = self.deserializer() else {
            return Vec::new();
        };

        deserializer
            .fields
            .iter()
            .filter(|f| !f.read_only && !f.excluded)
            .map(|f| ParamSpec {
                name: f.name.clone(),
                location: ParamLocation::Form,
                description: Some(f.help_text.clone().unwrap_or_default()),
                data_type: Some(f.kind.type_label().to_string()),
                required: f.required,
                enum_values: match &f.kind {
                    crate::type_registry::FieldKind::Choice { choices } => Some(choices.clone()),
                    _ => None,
                },
                minimum: f.min_length.map(|v| v as f64),
                maximum: f.max_length.map(|v| v as f64),
                default: f.default.clone(),
            })
            .collect()
    }

    /// A single body parameter named after the deserializer.
    fn build_body_parameter(&self) -> Option<ParamSpec> {
        let deserializer = self.deserializer()?;
        Some(ParamSpec {
            data_type: Some(deserializer.name.clone()),
            ..ParamSpec::new(deserializer.name.clone(), ParamLocation::Body)
        })
    }

    /// Class-level response notes first, overridden or extended by the
    /// method's own.
    pub fn response_messages(&self) -> Option<Vec<ResponseMessage>> {
        let mut merged: IndexMap<String, String> = IndexMap::new();

        if let Some(notes) = &self.view.doc.response_notes {
            merged.extend(notes.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(notes) = &self.doc.response_notes {
            merged.extend(notes.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if merged.is_empty() {
            return None;
        }
        Some(
            merged
                .into_iter()
                .map(|(code, message)| ResponseMessage { code, message })
                .collect(),
        )
    }

    /// Assembles the final operation descriptor for this method.
    pub fn operation(&self) -> OperationDescriptor {
        OperationDescriptor {
            http_method: self.http_method.as_str().to_string(),
            summary: self.summary(),
            nickname: self.nickname(),
            notes: self.notes(),
            response_type_name: self.serializer().map(|s| s.name.clone()),
            parameters: self.parameters(),
            response_messages: self.response_messages(),
        }
    }
}

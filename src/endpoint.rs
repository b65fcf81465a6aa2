//! Endpoint handler descriptions consumed by the documentation pipeline.
//!
//! The serving layer does not hand us live view objects; it describes each
//! endpoint with an [`ApiHandler`] value carrying everything the pipeline may
//! ask of a handler: its display name, its docstrings, how HTTP methods map
//! to handler code, and its default serializer/deserializer types. The
//! capability queries of the introspection layer are inherent methods on
//! this type, and the two endpoint kinds are a closed [`HandlerKind`]
//! variant dispatched explicitly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods known to the documentation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
}

impl HttpMethod {
    /// The uppercase wire form used in operation descriptors
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// The lowercase verb used to look up per-method docstrings on a
    /// single-action handler
    pub fn attr_name(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }

    /// Whether requests with this method carry a request body worth
    /// documenting. GET and DELETE (and HEAD/OPTIONS) do not.
    pub fn is_mutating(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route target as declared by the serving layer.
///
/// Only `Api` handlers are documentable; anything else is carried through
/// route flattening so the collector can skip it silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Handler {
    /// A documentable API endpoint
    Api(ApiHandler),
    /// A non-API view (plain page, static file handler, ...)
    Other(OpaqueHandler),
}

impl Handler {
    /// Returns the API handler description, if this target is documentable
    pub fn as_api(&self) -> Option<&ApiHandler> {
        match self {
            Handler::Api(api) => Some(api),
            Handler::Other(_) => None,
        }
    }
}

/// A named but undocumentable route target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpaqueHandler {
    /// Display name of the view, kept for logging only
    pub name: String,
}

/// Description of a documentable endpoint handler.
///
/// `method_docs` is keyed by the attribute name a docstring lives under:
/// the lowercase HTTP verb for single-action handlers, the action name
/// (`list`, `create`, ...) for resource-action handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHandler {
    /// Display name of the handler class
    pub name: String,
    /// Class-level docstring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// How HTTP methods are dispatched to handler code
    pub kind: HandlerKind,
    /// Per-method docstrings, keyed by attribute name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub method_docs: IndexMap<String, String>,
    /// Name of the default response-serializing type, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serializer: Option<String>,
    /// Name of the default request-deserializing type, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deserializer: Option<String>,
}

impl ApiHandler {
    /// Display name of the handler
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Class-level docstring
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Docstring attached to the named method attribute, if present
    pub fn method_doc(&self, attr: &str) -> Option<&str> {
        self.method_docs.get(attr).map(String::as_str)
    }

    /// Name of the default response-serializing type
    pub fn default_serializer(&self) -> Option<&str> {
        self.serializer.as_deref()
    }

    /// Name of the default request-deserializing type
    pub fn default_deserializer(&self) -> Option<&str> {
        self.deserializer.as_deref()
    }

    /// Whether GET is the only method this handler answers to
    pub fn is_get_only(&self) -> bool {
        match &self.kind {
            HandlerKind::SingleAction { methods } => methods == &[HttpMethod::Get],
            HandlerKind::ResourceAction { actions } => {
                !actions.is_empty() && actions.iter().all(|a| a.method == HttpMethod::Get)
            }
        }
    }
}

/// The two endpoint kinds the pipeline knows how to introspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    /// One view class answering a fixed set of HTTP methods, each handled
    /// by a method named after the lowercase verb
    SingleAction {
        /// The HTTP methods this view allows
        methods: Vec<HttpMethod>,
    },
    /// A resource view-set bound to a mapping from HTTP method to a named
    /// action (GET -> "list", POST -> "create", ...)
    ResourceAction {
        /// The method-to-action bindings, in declaration order
        actions: Vec<ActionBinding>,
    },
}

/// One entry of a resource view-set's action map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionBinding {
    /// The HTTP method this binding answers
    pub method: HttpMethod,
    /// The named action handling it
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_strings() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
        assert_eq!(HttpMethod::Get.attr_name(), "get");
        assert_eq!(HttpMethod::Delete.attr_name(), "delete");
    }

    #[test]
    fn test_mutating_methods() {
        assert!(HttpMethod::Post.is_mutating());
        assert!(HttpMethod::Put.is_mutating());
        assert!(HttpMethod::Patch.is_mutating());
        assert!(!HttpMethod::Get.is_mutating());
        assert!(!HttpMethod::Delete.is_mutating());
        assert!(!HttpMethod::Options.is_mutating());
    }

    #[test]
    fn test_handler_deserializes_untagged() {
        let api: Handler = serde_json::from_str(
            r#"{"name": "UserView", "kind": {"single_action": {"methods": ["get", "post"]}}}"#,
        )
        .unwrap();
        assert!(api.as_api().is_some());

        let other: Handler = serde_json::from_str(r#"{"name": "LoginPage"}"#).unwrap();
        assert!(other.as_api().is_none());
    }

    #[test]
    fn test_get_only_detection() {
        let handler = ApiHandler {
            name: "ApiRoot".to_string(),
            doc: None,
            kind: HandlerKind::SingleAction {
                methods: vec![HttpMethod::Get],
            },
            method_docs: IndexMap::new(),
            serializer: None,
            deserializer: None,
        };
        assert!(handler.is_get_only());

        let handler = ApiHandler {
            kind: HandlerKind::SingleAction {
                methods: vec![HttpMethod::Get, HttpMethod::Post],
            },
            ..handler
        };
        assert!(!handler.is_get_only());
    }
}

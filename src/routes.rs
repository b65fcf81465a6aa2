//! Route tree flattening.
//!
//! The serving layer's routing configuration is a tree of leaf routes and
//! nested includes. The collector walks it depth-first, concatenates path
//! prefixes, prunes excluded namespaces, drops undocumentable handlers,
//! and emits one [`RouteEntry`] per reachable API endpoint.

use crate::endpoint::{ApiHandler, Handler};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One node of the routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteNode {
    /// A nested sub-tree mounted under a path prefix
    Include {
        /// Path prefix prepended to every route in the sub-tree
        #[serde(default)]
        prefix: String,
        /// Namespace label, matched against exclusion filters
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        /// The nested nodes
        include: Vec<RouteNode>,
    },
    /// A leaf route with a handler
    Route {
        /// The route's own URL pattern
        pattern: String,
        /// The target handler
        handler: Handler,
        /// Optional route name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

/// A fully-resolved endpoint produced by route flattening.
///
/// Entries live only for the duration of one documentation run.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Concatenation of all ancestor prefixes plus the leaf pattern
    pub path: String,
    /// The leaf's own, unresolved pattern
    pub pattern: String,
    /// The documentable handler behind the route
    pub handler: ApiHandler,
    /// Route name, if one was declared
    pub name: Option<String>,
}

/// Walks a routing configuration and flattens it into endpoint entries.
pub struct RouteCollector {
    routes: Vec<RouteNode>,
}

impl RouteCollector {
    /// Creates a collector over the given route tree.
    pub fn new(routes: Vec<RouteNode>) -> Self {
        Self { routes }
    }

    /// Flattens the route tree into one entry per reachable API endpoint.
    ///
    /// Includes whose namespace appears in `exclude_namespaces` are pruned
    /// with their whole subtree. Handlers that are not documentable APIs
    /// are skipped silently, as are auto-wired router root listings. With
    /// `filter_path`, only entries whose resolved path contains the given
    /// substring are retained.
    pub fn get_routes(
        &self,
        exclude_namespaces: &[String],
        filter_path: Option<&str>,
    ) -> Vec<RouteEntry> {
        let mut entries = Vec::new();
        Self::flatten(&self.routes, "", exclude_namespaces, &mut entries);
        debug!("Flattened route tree into {} API entries", entries.len());

        if let Some(filter) = filter_path {
            entries.retain(|entry| entry.path.contains(filter));
            debug!("{} entries remain after path filter '{}'", entries.len(), filter);
        }

        entries
    }

    fn flatten(
        nodes: &[RouteNode],
        prefix: &str,
        exclude_namespaces: &[String],
        out: &mut Vec<RouteEntry>,
    ) {
        for node in nodes {
            match node {
                RouteNode::Include {
                    prefix: sub_prefix,
                    namespace,
                    include,
                } => {
                    if let Some(ns) = namespace {
                        if exclude_namespaces.iter().any(|e| e == ns) {
                            debug!("Pruning excluded namespace '{}'", ns);
                            continue;
                        }
                    }
                    let joined = format!("{}{}", prefix, sub_prefix);
                    Self::flatten(include, &joined, exclude_namespaces, out);
                }
                RouteNode::Route {
                    pattern,
                    handler,
                    name,
                } => {
                    let Some(api) = handler.as_api() else {
                        continue;
                    };
                    if is_router_root(pattern, api) {
                        debug!("Skipping auto-wired root listing at '{}{}'", prefix, pattern);
                        continue;
                    }
                    out.push(RouteEntry {
                        path: normalize_path(&format!("{}{}", prefix, pattern)),
                        pattern: pattern.clone(),
                        handler: api.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
    }

    /// Collapses entries sharing a first path segment into one
    /// representative entry per segment, in first-seen order.
    pub fn get_top_level_apis(entries: &[RouteEntry]) -> Vec<RouteEntry> {
        let mut seen = HashSet::new();
        let mut top_level = Vec::new();

        for entry in entries {
            let segment = first_path_segment(&entry.path).to_string();
            if seen.insert(segment) {
                top_level.push(entry.clone());
            }
        }

        top_level
    }
}

/// The first segment of a resolved path, without slashes.
pub fn first_path_segment(path: &str) -> &str {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or("")
}

/// Ensures a single leading slash and collapses duplicate slashes.
fn normalize_path(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    out.push('/');
    let mut prev_slash = true;
    for c in raw.chars() {
        if c == '/' {
            if !prev_slash {
                out.push('/');
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Resource routers auto-wire a GET-only listing view at their own base
/// path. Such a leaf contributes no path segment of its own and would only
/// duplicate the resource index, so it is not documented.
fn is_router_root(pattern: &str, handler: &ApiHandler) -> bool {
    pattern.trim_matches('/').is_empty() && handler.is_get_only()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{ActionBinding, HandlerKind, HttpMethod, OpaqueHandler};
    use indexmap::IndexMap;

    fn api_handler(name: &str, methods: Vec<HttpMethod>) -> Handler {
        Handler::Api(ApiHandler {
            name: name.to_string(),
            doc: None,
            kind: HandlerKind::SingleAction { methods },
            method_docs: IndexMap::new(),
            serializer: None,
            deserializer: None,
        })
    }

    fn route(pattern: &str, handler: Handler) -> RouteNode {
        RouteNode::Route {
            pattern: pattern.to_string(),
            handler,
            name: None,
        }
    }

    fn test_tree() -> Vec<RouteNode> {
        vec![
            route("a-view/", api_handler("MockApiView", vec![HttpMethod::Get])),
            route(
                "a-view/child/",
                api_handler("MockApiView", vec![HttpMethod::Get]),
            ),
            route(
                "a-view/child2/",
                api_handler("MockApiView", vec![HttpMethod::Get]),
            ),
            route(
                "another-view/",
                api_handler("MockApiView", vec![HttpMethod::Get]),
            ),
        ]
    }

    #[test]
    fn test_flatten_route_tree() {
        let collector = RouteCollector::new(test_tree());
        let entries = collector.get_routes(&[], None);

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].path, "/a-view/");
        assert_eq!(entries[3].path, "/another-view/");
    }

    #[test]
    fn test_flatten_with_include_prefix() {
        let tree = vec![RouteNode::Include {
            prefix: "api/base/path/".to_string(),
            namespace: None,
            include: test_tree(),
        }];
        let collector = RouteCollector::new(tree);
        let entries = collector.get_routes(&[], None);

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].path, "/api/base/path/a-view/");
    }

    #[test]
    fn test_flatten_with_filter() {
        let collector = RouteCollector::new(test_tree());
        let entries = collector.get_routes(&[], Some("a-view"));

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.path.contains("a-view")));
    }

    #[test]
    fn test_filter_is_a_subset() {
        let collector = RouteCollector::new(test_tree());
        let all: Vec<String> = collector
            .get_routes(&[], None)
            .into_iter()
            .map(|e| e.path)
            .collect();
        let filtered = collector.get_routes(&[], Some("child"));

        assert!(filtered.iter().all(|e| all.contains(&e.path)));
    }

    #[test]
    fn test_excluded_namespace_prunes_subtree() {
        let tree = vec![RouteNode::Include {
            prefix: "api/base/path/".to_string(),
            namespace: Some("exclude".to_string()),
            include: test_tree(),
        }];
        let collector = RouteCollector::new(tree);
        let entries = collector.get_routes(&["exclude".to_string()], None);

        assert!(entries.is_empty());
    }

    #[test]
    fn test_excluded_namespace_prunes_nested_includes() {
        let fuzzy = vec![RouteNode::Include {
            prefix: "api/".to_string(),
            namespace: Some("api_fuzzy_app".to_string()),
            include: vec![RouteNode::Route {
                pattern: "item/".to_string(),
                handler: api_handler("FuzzyApiView", vec![HttpMethod::Get]),
                name: Some("find_me".to_string()),
            }],
        }];
        let shiny = vec![RouteNode::Include {
            prefix: "api/".to_string(),
            namespace: Some("api_shiny_app".to_string()),
            include: vec![RouteNode::Route {
                pattern: "item/".to_string(),
                handler: api_handler("ShinyApiView", vec![HttpMethod::Get]),
                name: Some("hide_me".to_string()),
            }],
        }];
        let tree = vec![
            RouteNode::Include {
                prefix: "my_fuzzy_app/".to_string(),
                namespace: None,
                include: fuzzy,
            },
            RouteNode::Include {
                prefix: "my_shiny_app/".to_string(),
                namespace: None,
                include: shiny,
            },
        ];

        let collector = RouteCollector::new(tree);
        let entries = collector.get_routes(&["api_shiny_app".to_string()], None);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name.as_deref(), Some("find_me"));
        assert_eq!(entries[0].path, "/my_fuzzy_app/api/item/");
    }

    #[test]
    fn test_non_api_handler_is_skipped() {
        let tree = vec![
            route("something/", Handler::Other(OpaqueHandler {
                name: "NonApiView".to_string(),
            })),
            route("real/", api_handler("MockApiView", vec![HttpMethod::Get])),
        ];
        let collector = RouteCollector::new(tree);
        let entries = collector.get_routes(&[], None);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "/real/");
    }

    #[test]
    fn test_router_root_is_excluded() {
        let viewset = Handler::Api(ApiHandler {
            name: "MyViewSet".to_string(),
            doc: None,
            kind: HandlerKind::ResourceAction {
                actions: vec![
                    ActionBinding {
                        method: HttpMethod::Get,
                        action: "list".to_string(),
                    },
                    ActionBinding {
                        method: HttpMethod::Post,
                        action: "create".to_string(),
                    },
                ],
            },
            method_docs: IndexMap::new(),
            serializer: Some("CommentSerializer".to_string()),
            deserializer: None,
        });
        let tree = vec![RouteNode::Include {
            prefix: "api/".to_string(),
            namespace: None,
            include: vec![
                route("", api_handler("ApiRoot", vec![HttpMethod::Get])),
                route("test/", viewset.clone()),
                route("test/{pk}/", viewset),
            ],
        }];

        let collector = RouteCollector::new(tree);
        let entries = collector.get_routes(&[], None);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "/api/test/");
        assert_eq!(entries[1].path, "/api/test/{pk}/");
    }

    #[test]
    fn test_duplicate_slashes_collapse() {
        let tree = vec![RouteNode::Include {
            prefix: "/api/".to_string(),
            namespace: None,
            include: vec![route(
                "/users/",
                api_handler("UserView", vec![HttpMethod::Get]),
            )],
        }];
        let collector = RouteCollector::new(tree);
        let entries = collector.get_routes(&[], None);

        assert_eq!(entries[0].path, "/api/users/");
    }

    #[test]
    fn test_top_level_collapses_by_first_segment() {
        let collector = RouteCollector::new(test_tree());
        let entries = collector.get_routes(&[], None);
        let top_level = RouteCollector::get_top_level_apis(&entries);

        assert_eq!(top_level.len(), 2);
        assert_eq!(first_path_segment(&top_level[0].path), "a-view");
        assert_eq!(first_path_segment(&top_level[1].path), "another-view");
    }
}

//! Route table: compiled patterns and request path resolution.
//!
//! # Responsibilities
//! - Compile every builder's routes into one ordered table
//! - Reject duplicate patterns at startup
//! - Resolve a request path to a builder, its route id and captured parameters
//!
//! # Design Decisions
//! - Immutable after construction (shared across requests without locks)
//! - Ordered by priority descending, then pattern text descending
//! - First match wins; a not-found builder catches everything else
//! - Paths are matched app-relative (`~/…`) and case-insensitively

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::compose::{PageBuilder, PathData};
use crate::error::ConfigurationError;
use crate::registry::Implementation;
use crate::routing::pattern::{expand_routes, RouteDecl};
use crate::template::scanner::normalize_app_root;

/// A builder type that can serve a route.
pub type Handler = Arc<Implementation<dyn PageBuilder>>;

/// A compiled route.
pub struct Route {
    id: i32,
    priority: i32,
    pattern: String,
    regex: Regex,
    handler: Handler,
}

impl Route {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Named captures for `path`, or `None` if the route does not match.
    /// Groups that did not participate are recorded as empty strings.
    fn capture(&self, path: &str) -> Option<PathData> {
        let captures = self.regex.captures(path)?;
        let mut data = PathData::new();
        for name in self.regex.capture_names().flatten() {
            let value = captures.name(name).map_or("", |m| m.as_str());
            data.insert(name, value);
        }
        Some(data)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("pattern", &self.pattern)
            .field("handler", &self.handler.type_name())
            .finish()
    }
}

/// Matching settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOptions {
    /// Absolute application root, ending in `/`.
    pub app_root: String,
    pub lowercase_paths: bool,
}

impl RouteOptions {
    pub fn new(virtual_path: &str, lowercase_paths: bool) -> Self {
        Self {
            app_root: normalize_app_root(virtual_path),
            lowercase_paths,
        }
    }
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self::new("/", true)
    }
}

/// Result of resolving a request path.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route_id: i32,
    pub priority: i32,
    /// Matched pattern; `None` for the not-found builder.
    pub pattern: Option<String>,
    pub handler: Handler,
    pub path_data: PathData,
    pub fallback: bool,
}

/// Ordered, immutable route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Option<Handler>,
    options: RouteOptions,
}

impl RouteTable {
    /// Compile the routes of every builder type.
    pub fn build<I>(builders: I, options: RouteOptions) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (Handler, Vec<RouteDecl>)>,
    {
        let mut seen = HashSet::new();
        let mut routes = Vec::new();

        for (handler, declared) in builders {
            for decl in expand_routes(handler.type_name(), &declared) {
                if !seen.insert(decl.pattern.clone()) {
                    return Err(ConfigurationError::DuplicatePattern {
                        type_name: handler.type_name().to_string(),
                        pattern: decl.pattern,
                    });
                }
                let regex = RegexBuilder::new(&decl.pattern)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map_err(|source| ConfigurationError::InvalidPattern {
                        type_name: handler.type_name().to_string(),
                        pattern: decl.pattern.clone(),
                        source,
                    })?;
                routes.push(Route {
                    id: decl.id,
                    priority: decl.priority,
                    pattern: decl.pattern,
                    regex,
                    handler: Arc::clone(&handler),
                });
            }
        }

        routes.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.pattern.cmp(&a.pattern))
        });

        for route in &routes {
            tracing::debug!(
                pattern = %route.pattern,
                priority = route.priority,
                route_id = route.id,
                builder = route.handler.type_name(),
                "Compiled route"
            );
        }

        Ok(Self {
            routes,
            fallback: None,
            options,
        })
    }

    /// Serve unmatched paths with `handler`.
    pub fn with_fallback(mut self, handler: Handler) -> Self {
        self.fallback = Some(handler);
        self
    }

    pub fn fallback(&self) -> Option<&Handler> {
        self.fallback.as_ref()
    }

    /// Routes in match order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    /// `/app/Forums` → `~/forums` (for app root `/app/`), or `None` outside the app.
    pub fn app_relative_path(&self, path: &str) -> Option<String> {
        let root = self.options.app_root.as_str();
        let rest = match path.get(..root.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(root) => &path[root.len()..],
            _ if path.eq_ignore_ascii_case(root.trim_end_matches('/')) => "",
            _ => return None,
        };
        let relative = format!("~/{rest}");
        Some(if self.options.lowercase_paths {
            relative.to_lowercase()
        } else {
            relative
        })
    }

    /// Resolve a request path to the first matching route, else the not-found builder.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        if let Some(relative) = self.app_relative_path(path) {
            for route in &self.routes {
                if let Some(path_data) = route.capture(&relative) {
                    return Some(RouteMatch {
                        route_id: route.id,
                        priority: route.priority,
                        pattern: Some(route.pattern.clone()),
                        handler: Arc::clone(&route.handler),
                        path_data,
                        fallback: false,
                    });
                }
            }
        }

        self.fallback.as_ref().map(|handler| RouteMatch {
            route_id: 0,
            priority: 0,
            pattern: None,
            handler: Arc::clone(handler),
            path_data: PathData::new(),
            fallback: true,
        })
    }
}

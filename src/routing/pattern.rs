//! Route declarations and their expansion into concrete patterns.
//!
//! # Responsibilities
//! - Derive a builder's route stem from its type name
//! - Expand relative fragments (`/{slug}`) under the stem
//! - Supply default routes for builders that declare none

/// Suffix stripped from builder type names to form the stem.
pub const BUILDER_SUFFIX: &str = "Builder";
/// The builder that serves the application root by default.
pub const HOME_BUILDER: &str = "HomeBuilder";
/// Priority of the default home route.
pub const HOME_PRIORITY: i32 = 10;
/// Priority of every other default route.
pub const DEFAULT_PRIORITY: i32 = 9;

/// A route declared on a builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDecl {
    pub id: i32,
    pub pattern: String,
    pub priority: i32,
}

impl RouteDecl {
    pub fn new(id: i32, pattern: impl Into<String>, priority: i32) -> Self {
        Self {
            id,
            pattern: pattern.into(),
            priority,
        }
    }
}

/// `ForumsBuilder` → `forums`. Names without the suffix are used whole.
pub fn builder_stem(type_name: &str) -> String {
    let stem = match type_name.len().checked_sub(BUILDER_SUFFIX.len()) {
        Some(split)
            if type_name.is_char_boundary(split)
                && type_name[split..].eq_ignore_ascii_case(BUILDER_SUFFIX) =>
        {
            &type_name[..split]
        }
        _ => type_name,
    };
    stem.to_lowercase()
}

/// The concrete routes a builder type contributes.
pub fn expand_routes(type_name: &str, declared: &[RouteDecl]) -> Vec<RouteDecl> {
    let stem = builder_stem(type_name);

    if declared.is_empty() {
        let default = if type_name.eq_ignore_ascii_case(HOME_BUILDER) {
            RouteDecl::new(0, "^~/$", HOME_PRIORITY)
        } else {
            RouteDecl::new(0, format!("^~/{stem}/?$"), DEFAULT_PRIORITY)
        };
        return vec![default];
    }

    declared
        .iter()
        .map(|decl| {
            let pattern = if decl.pattern.starts_with('/') {
                format!("^~/{stem}{}", decl.pattern)
            } else {
                decl.pattern.clone()
            };
            RouteDecl::new(decl.id, pattern, decl.priority)
        })
        .collect()
}

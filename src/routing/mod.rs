//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     builder types + declared routes
//!     → pattern.rs (default routes, stem expansion)
//!     → router.rs (duplicate check, regex compile, sort)
//!     → Freeze as immutable RouteTable
//!
//! Incoming request path
//!     → app-relative, lower-cased form (`~/forums/42`)
//!     → first matching route, else the not-found builder
//!     → RouteMatch (builder, route id, path parameters)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by priority, then pattern)

pub mod pattern;
pub mod router;

pub use pattern::{builder_stem, expand_routes, RouteDecl};
pub use router::{Handler, Route, RouteMatch, RouteOptions, RouteTable};

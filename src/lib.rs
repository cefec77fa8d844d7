//! Server-side page composition.
//!
//! Pages are assembled per request by builders. A builder picks a master
//! template and registers views and nested builders under the tag names the
//! template contains. Rendering streams the template through a placeholder
//! scanner and resolves each tag into the output as it is met.
//!
//! # Architecture Overview
//!
//! ```text
//!     request path
//!         → routing (RouteTable: app-relative regex match, priority order)
//!         → registry (instantiate the matched builder)
//!         → compose (initialize → model → compose → render)
//!             → template (scan master template: literals + tags)
//!             → resolver (page view | page builder | site builder | nothing)
//!         → output sink
//!
//!     cross-cutting: config, error, observability, lifecycle, http (axum host)
//! ```

// Core subsystems
pub mod compose;
pub mod registry;
pub mod routing;
pub mod site;
pub mod template;

// Hosting
pub mod http;
pub mod lifecycle;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;

pub use compose::{
    build_page, Context, Model, Page, PageBuilder, PathData, RequestContext, View,
};
pub use config::SiteConfig;
pub use error::{ConfigurationError, Error, ErrorKind, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::{CreateArgs, Implementation, Registry, Signature};
pub use site::{BuilderDefinition, Dispatch, Site, SiteBuilder};

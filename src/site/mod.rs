//! The assembled site: configuration, registries, templates and routes.
//!
//! # Data Flow
//! ```text
//! SiteBuilder (startup.rs)
//!     → register views and named builders
//!     → compile the route table
//!     → Site (immutable, shared by every request)
//!
//! Site::handle(request, sink)
//!     → RouteTable::resolve
//!     → instantiate builder (path data, route id)
//!     → build_page into the sink
//! ```

pub mod startup;

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use crate::compose::{build_page, Context, PageBuilder, RequestContext, View};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::observability::metrics;
use crate::registry::{CreateArgs, Registry};
use crate::routing::RouteTable;
use crate::template::{ScanOptions, TemplateProvider};

pub use startup::{BuilderDefinition, SiteBuilder};

/// Outcome of a handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub route_id: i32,
    pub builder: String,
    /// Served by the not-found builder.
    pub fallback: bool,
}

/// Everything a request needs, built once at startup.
pub struct Site {
    config: SiteConfig,
    templates: Arc<dyn TemplateProvider>,
    views: Registry<dyn View>,
    builders: Registry<dyn PageBuilder>,
    routes: RouteTable,
    text_options: ScanOptions,
    template_options: ScanOptions,
}

impl Site {
    pub fn builder(config: SiteConfig) -> SiteBuilder {
        SiteBuilder::new(config)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn templates(&self) -> &dyn TemplateProvider {
        self.templates.as_ref()
    }

    /// Folder template lookups start from.
    pub fn search_root(&self) -> &Path {
        &self.config.templates.search_root
    }

    pub fn views(&self) -> &Registry<dyn View> {
        &self.views
    }

    pub fn builders(&self) -> &Registry<dyn PageBuilder> {
        &self.builders
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Scanner options for inline text.
    pub fn text_scan_options(&self) -> &ScanOptions {
        &self.text_options
    }

    /// Scanner options for template files.
    pub fn template_scan_options(&self) -> &ScanOptions {
        &self.template_options
    }

    /// Route `request` and render the page into `out`.
    ///
    /// Returns `Ok(None)` when neither a route nor a not-found builder exists.
    /// On error, whatever was written before the failure stays in `out`.
    pub fn handle(&self, request: Arc<RequestContext>, out: &mut dyn Write) -> Result<Option<Dispatch>> {
        let Some(matched) = self.routes.resolve(request.path()) else {
            tracing::debug!(path = %request.path(), "No handler for path");
            metrics::record_route_miss(false);
            return Ok(None);
        };

        if matched.fallback {
            metrics::record_route_miss(true);
        }

        let dispatch = Dispatch {
            route_id: matched.route_id,
            builder: matched.handler.type_name().to_string(),
            fallback: matched.fallback,
        };
        tracing::debug!(
            path = %request.path(),
            route_id = dispatch.route_id,
            builder = %dispatch.builder,
            fallback = dispatch.fallback,
            "Resolved route"
        );

        let args = CreateArgs::new(Arc::clone(&request))
            .with_path_data(matched.path_data)
            .with_route_id(matched.route_id);
        let mut builder = self.builders.instantiate(&matched.handler, args)?;

        let ctx = Context::new(self, &request);
        build_page(builder.as_mut(), &ctx, out)?;
        Ok(Some(dispatch))
    }

    /// Render a request into a new string.
    pub fn render(&self, request: RequestContext) -> Result<(Option<Dispatch>, String)> {
        let mut out = String::new();
        let dispatch = self.handle(Arc::new(request), &mut out)?;
        Ok((dispatch, out))
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("views", &self.views.identifiers())
            .field("builders", &self.builders.identifiers())
            .field("routes", &self.routes.len())
            .finish()
    }
}

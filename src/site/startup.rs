//! Site assembly.
//!
//! # Responsibilities
//! - Collect builder types, their identifiers and declared routes
//! - Register views and named builders
//! - Compile the route table and freeze everything into a `Site`
//!
//! # Design Decisions
//! - Every builder type contributes routes, named or not
//! - Configuration errors surface here, before any request is served

use std::sync::Arc;

use crate::compose::{PageBuilder, View};
use crate::config::SiteConfig;
use crate::error::ConfigurationError;
use crate::registry::{Implementation, Registry};
use crate::routing::{RouteDecl, RouteOptions, RouteTable};
use crate::site::Site;
use crate::template::{FileTemplateProvider, ScanOptions, TemplateProvider};

/// A builder type as declared to the site.
pub struct BuilderDefinition {
    implementation: Implementation<dyn PageBuilder>,
    identifier: Option<String>,
    routes: Vec<RouteDecl>,
}

impl BuilderDefinition {
    pub fn new(implementation: Implementation<dyn PageBuilder>) -> Self {
        Self {
            implementation,
            identifier: None,
            routes: Vec::new(),
        }
    }

    /// Register the builder under `identifier` so templates can refer to it by tag.
    /// An empty identifier means the type name.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Declare a route. Patterns starting with `/` are placed under the builder's stem.
    pub fn route(mut self, id: i32, pattern: impl Into<String>, priority: i32) -> Self {
        self.routes.push(RouteDecl::new(id, pattern, priority));
        self
    }
}

/// Collects everything a `Site` is built from.
pub struct SiteBuilder {
    config: SiteConfig,
    templates: Option<Arc<dyn TemplateProvider>>,
    builders: Vec<BuilderDefinition>,
    views: Vec<(String, Implementation<dyn View>)>,
    not_found: Option<Implementation<dyn PageBuilder>>,
}

impl SiteBuilder {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            templates: None,
            builders: Vec::new(),
            views: Vec::new(),
            not_found: None,
        }
    }

    /// Template source; defaults to files under the configured folders.
    pub fn templates(mut self, provider: impl TemplateProvider + 'static) -> Self {
        self.templates = Some(Arc::new(provider));
        self
    }

    pub fn shared_templates(mut self, provider: Arc<dyn TemplateProvider>) -> Self {
        self.templates = Some(provider);
        self
    }

    pub fn builder(mut self, definition: BuilderDefinition) -> Self {
        self.builders.push(definition);
        self
    }

    pub fn view(mut self, identifier: impl Into<String>, implementation: Implementation<dyn View>) -> Self {
        self.views.push((identifier.into(), implementation));
        self
    }

    /// Builder that serves paths no route matches.
    pub fn not_found(mut self, implementation: Implementation<dyn PageBuilder>) -> Self {
        self.not_found = Some(implementation);
        self
    }

    pub fn build(self) -> Result<Site, ConfigurationError> {
        let config = self.config;

        let views = Registry::new("view");
        for (identifier, implementation) in self.views {
            views.register(identifier, implementation)?;
        }

        let builders = Registry::new("builder");
        let mut routed = Vec::with_capacity(self.builders.len());
        for definition in self.builders {
            let implementation = Arc::new(definition.implementation);
            if let Some(identifier) = definition.identifier {
                let identifier = if identifier.is_empty() {
                    implementation.type_name().to_string()
                } else {
                    identifier
                };
                builders.register_shared(identifier, Arc::clone(&implementation))?;
            }
            routed.push((implementation, definition.routes));
        }

        let options = RouteOptions::new(&config.app.virtual_path, config.routing.lowercase_paths);
        let mut routes = RouteTable::build(routed, options)?;
        if let Some(not_found) = self.not_found {
            routes = routes.with_fallback(Arc::new(not_found));
        }

        let templates = self.templates.unwrap_or_else(|| {
            Arc::new(FileTemplateProvider::new(config.templates.root_folder.clone()))
        });

        let text_options = ScanOptions::from_config(
            &config.scanner,
            &config.app.virtual_path,
            config.scanner.strip_line_breaks_in_text,
        );
        let template_options = ScanOptions::from_config(
            &config.scanner,
            &config.app.virtual_path,
            config.scanner.strip_line_breaks_in_templates,
        );

        tracing::info!(
            routes = routes.len(),
            builders = builders.len(),
            views = views.len(),
            not_found = routes.fallback().is_some(),
            virtual_path = %config.app.virtual_path,
            "Site assembled"
        );

        Ok(Site {
            config,
            templates,
            views,
            builders,
            routes,
            text_options,
            template_options,
        })
    }
}

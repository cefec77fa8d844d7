//! Tag resolution: decide what a tag in a master template stands for.
//!
//! # Design Decisions
//! - Precedence: page view, page builder, site builder registry
//! - Unresolved tags are swallowed silently; nothing is written or logged
//! - Factory builders start with empty path parameters

use std::fmt::Write;

use crate::compose::builder::{build_page, PageBuilder};
use crate::compose::context::Context;
use crate::compose::page::{Component, ViewRegistry};
use crate::error::Result;
use crate::observability::metrics;
use crate::registry::{CreateArgs, Registry};

/// What a tag resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A view registered on the page.
    SubView,
    /// A builder registered on the page.
    SubBuilder,
    /// A builder registered with the site under the tag's name.
    Builder,
    /// Nothing; the tag is dropped.
    Unresolved,
}

pub fn classify(tag: &str, views: &ViewRegistry, builders: &Registry<dyn PageBuilder>) -> Resolution {
    match views.get(tag) {
        Some(Component::View(_)) => Resolution::SubView,
        Some(Component::Builder(_)) => Resolution::SubBuilder,
        None if builders.contains(tag) => Resolution::Builder,
        None => Resolution::Unresolved,
    }
}

/// Resolve one tag and write its output to `out`.
pub fn render_tag(
    tag: &str,
    views: &mut ViewRegistry,
    ctx: &Context<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    match views.get_mut(tag) {
        Some(Component::View(view)) => view.render(ctx, out),
        Some(Component::Builder(builder)) => {
            tracing::trace!(tag, builder = builder.name(), "Building nested page builder");
            metrics::record_nested_build("page");
            build_page(builder.as_mut(), ctx, out)
        }
        None => {
            let builders = ctx.site().builders();
            let Some(implementation) = builders.get(tag) else {
                return Ok(());
            };
            tracing::trace!(tag, builder = implementation.type_name(), "Building registered builder");
            metrics::record_nested_build("registry");
            let args = CreateArgs::new(ctx.shared_request());
            let mut builder = builders.instantiate(&implementation, args)?;
            build_page(builder.as_mut(), ctx, out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::model::Model;
    use crate::compose::page::Page;
    use crate::compose::view::ContentView;
    use crate::registry::Implementation;

    struct Sidebar;

    impl PageBuilder for Sidebar {
        fn compose(&mut self, _ctx: &Context<'_>, _model: Option<Model>, page: &mut Page) -> Result<()> {
            page.set_master_text("side");
            Ok(())
        }
    }

    #[test]
    fn test_classification_precedence() {
        let builders: Registry<dyn PageBuilder> = Registry::new("builder");
        builders
            .register("Sidebar", Implementation::builder(|_| Sidebar))
            .unwrap();
        builders
            .register("Menu", Implementation::builder(|_| Sidebar))
            .unwrap();

        let mut views = ViewRegistry::new();
        views.insert("Sidebar", Component::View(Box::new(ContentView::new("x"))));
        views.insert("Nested", Component::Builder(Box::new(Sidebar)));

        assert_eq!(classify("Sidebar", &views, &builders), Resolution::SubView);
        assert_eq!(classify("Nested", &views, &builders), Resolution::SubBuilder);
        assert_eq!(classify("Menu", &views, &builders), Resolution::Builder);
        assert_eq!(classify("Ghost", &views, &builders), Resolution::Unresolved);
    }
}

//! Page builders and the build cycle.
//!
//! # Data Flow
//! ```text
//! build_page
//!     → initialize (per-request setup)
//!     → model      (optional ambient model)
//!     → compose    (choose master template, register components)
//!     → render     (scan master, resolve each tag into the sink)
//! ```

use std::fmt::Write;

use crate::compose::context::Context;
use crate::compose::model::Model;
use crate::compose::page::Page;
use crate::error::Result;
use crate::registry::implementation::short_type_name;
use crate::registry::{CreateArgs, Implementation, Signature};

/// A composite component that assembles a page.
pub trait PageBuilder {
    /// Runs before the model is requested.
    fn initialize(&mut self, _ctx: &Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Ambient model handed to `compose`.
    fn model(&mut self, _ctx: &Context<'_>) -> Result<Option<Model>> {
        Ok(None)
    }

    /// Pick the master template and register the components its tags refer to.
    fn compose(&mut self, ctx: &Context<'_>, model: Option<Model>, page: &mut Page) -> Result<()>;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Run a builder's full cycle, writing the rendered page to `out`.
pub fn build_page(builder: &mut dyn PageBuilder, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    builder.initialize(ctx)?;
    let model = builder.model(ctx)?;
    let mut page = Page::new();
    builder.compose(ctx, model, &mut page)?;
    page.render(builder.name(), ctx, out)
}

impl Implementation<dyn PageBuilder> {
    /// A builder type created from the request and its path parameters.
    pub fn builder<B, F>(ctor: F) -> Self
    where
        B: PageBuilder + 'static,
        F: Fn(CreateArgs) -> B + Send + Sync + 'static,
    {
        Implementation::of::<B>().constructor(Signature::Context, move |args| {
            Box::new(ctor(args)) as Box<dyn PageBuilder>
        })
    }
}

//! Views: leaf components that render into the output sink.

use std::fmt::Write;

use crate::compose::context::Context;
use crate::compose::model::Model;
use crate::error::Result;
use crate::registry::{CreateArgs, Implementation, Signature};

/// A renderable leaf.
pub trait View {
    fn render(&self, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()>;
}

/// Writes a fixed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentView {
    content: String,
}

impl ContentView {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl View for ContentView {
    fn render(&self, _ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
        out.write_str(&self.content)?;
        Ok(())
    }
}

/// Copies a template file without scanning it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFileView {
    template: String,
}

impl TemplateFileView {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl View for TemplateFileView {
    fn render(&self, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
        ctx.write_template(&self.template, out)
    }
}

/// Binds a model's properties into a template file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTemplateView {
    template: String,
    model: Model,
}

impl ModelTemplateView {
    pub fn new(template: impl Into<String>, model: Model) -> Self {
        Self {
            template: template.into(),
            model,
        }
    }
}

impl View for ModelTemplateView {
    fn render(&self, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
        ctx.bind_model_to_template(&self.template, out, &self.model, None)
    }
}

/// Adapts a closure into a view.
pub struct FnView<F>(F);

impl<F> FnView<F>
where
    F: Fn(&Context<'_>, &mut dyn Write) -> Result<()>,
{
    pub fn new(render: F) -> Self {
        Self(render)
    }
}

impl<F> View for FnView<F>
where
    F: Fn(&Context<'_>, &mut dyn Write) -> Result<()>,
{
    fn render(&self, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
        (self.0)(ctx, out)
    }
}

impl Implementation<dyn View> {
    /// A view type creatable from the request alone.
    pub fn view<V, F>(ctor: F) -> Self
    where
        V: View + 'static,
        F: Fn(CreateArgs) -> V + Send + Sync + 'static,
    {
        Implementation::of::<V>().constructor(Signature::Context, move |args| {
            Box::new(ctor(args)) as Box<dyn View>
        })
    }

    /// A view type that requires a model.
    pub fn model_view<V, F>(ctor: F) -> Self
    where
        V: View + 'static,
        F: Fn(CreateArgs, Model) -> V + Send + Sync + 'static,
    {
        Implementation::of::<V>().with_model_constructor(ctor)
    }

    /// Add a model-taking constructor to this view type.
    pub fn with_model_constructor<V, F>(self, ctor: F) -> Self
    where
        V: View + 'static,
        F: Fn(CreateArgs, Model) -> V + Send + Sync + 'static,
    {
        self.constructor(Signature::ContextAndModel, move |mut args| {
            let model = args.model.take().unwrap_or_default();
            Box::new(ctor(args, model)) as Box<dyn View>
        })
    }
}

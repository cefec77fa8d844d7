//! The per-build page: master template plus the components bound to its tags.
//!
//! # Responsibilities
//! - Record which master template a builder chose
//! - Keep components keyed by tag name, in registration order
//! - Render the master template, resolving each tag as it is met
//!
//! # Design Decisions
//! - A page lives for exactly one build; nothing is shared between requests
//! - Re-registering a tag replaces its component and moves it to the end
//! - The last master template assignment wins

use std::fmt::{self, Write};

use indexmap::IndexMap;

use crate::compose::builder::PageBuilder;
use crate::compose::context::Context;
use crate::compose::resolver::render_tag;
use crate::compose::view::View;
use crate::error::{Error, Result};

/// Where a master template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(String),
    Text(String),
}

/// A component bound to a tag in the master template.
pub enum Component {
    View(Box<dyn View>),
    Builder(Box<dyn PageBuilder>),
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::View(_) => f.write_str("Component::View"),
            Component::Builder(builder) => write!(f, "Component::Builder({})", builder.name()),
        }
    }
}

/// Components keyed by tag name.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    components: IndexMap<String, Component>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, component: Component) {
        let tag = tag.into();
        self.components.shift_remove(&tag);
        self.components.insert(tag, component);
    }

    pub fn get(&self, tag: &str) -> Option<&Component> {
        self.components.get(tag)
    }

    pub fn get_mut(&mut self, tag: &str) -> Option<&mut Component> {
        self.components.get_mut(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.components.contains_key(tag)
    }

    /// Registered tag names, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// What a builder assembles during `compose`.
#[derive(Debug, Default)]
pub struct Page {
    master: Option<TemplateSource>,
    views: ViewRegistry,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_master_template(&mut self, name: impl Into<String>) {
        self.master = Some(TemplateSource::File(name.into()));
    }

    pub fn set_master_text(&mut self, text: impl Into<String>) {
        self.master = Some(TemplateSource::Text(text.into()));
    }

    pub fn master(&self) -> Option<&TemplateSource> {
        self.master.as_ref()
    }

    pub fn register_view(&mut self, tag: impl Into<String>, view: impl View + 'static) {
        self.views.insert(tag, Component::View(Box::new(view)));
    }

    pub fn register_boxed_view(&mut self, tag: impl Into<String>, view: Box<dyn View>) {
        self.views.insert(tag, Component::View(view));
    }

    pub fn register_builder(&mut self, tag: impl Into<String>, builder: impl PageBuilder + 'static) {
        self.views.insert(tag, Component::Builder(Box::new(builder)));
    }

    pub fn register_boxed_builder(&mut self, tag: impl Into<String>, builder: Box<dyn PageBuilder>) {
        self.views.insert(tag, Component::Builder(builder));
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// Render the master template into `out`. `builder` names the owner in errors.
    pub(crate) fn render(self, builder: &str, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
        let Page { master, mut views } = self;
        match master {
            Some(TemplateSource::File(name)) => {
                ctx.parse_template(&name, out, |tag, out| render_tag(tag, &mut views, ctx, out))
            }
            Some(TemplateSource::Text(text)) => {
                ctx.parse_text(&text, out, |tag, out| render_tag(tag, &mut views, ctx, out))
            }
            None => Err(Error::MissingMasterTemplate {
                builder: builder.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::view::ContentView;

    #[test]
    fn test_reregistering_moves_tag_to_end() {
        let mut page = Page::new();
        page.register_view("a", ContentView::new("1"));
        page.register_view("b", ContentView::new("2"));
        page.register_view("a", ContentView::new("3"));

        let tags: Vec<_> = page.views().tags().collect();
        assert_eq!(tags, vec!["b", "a"]);
        assert_eq!(page.views().len(), 2);
    }

    #[test]
    fn test_last_master_assignment_wins() {
        let mut page = Page::new();
        page.set_master_template("master.html");
        page.set_master_text("<p>@Body@</p>");
        assert_eq!(
            page.master(),
            Some(&TemplateSource::Text("<p>@Body@</p>".into()))
        );
    }
}

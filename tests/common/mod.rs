//! Shared fixtures for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use quire::compose::{ContentView, ModelTemplateView, TemplateFileView};
use quire::config::SiteConfig;
use quire::template::MemoryTemplateProvider;
use quire::{
    BuilderDefinition, Context, CreateArgs, Implementation, Model, Page, PageBuilder, Result,
    Site, SiteBuilder,
};

pub const MASTER: &str = "<html>@header@|@widgets@|@Ghost@|@Body@|@~/static/app.css@</html>";
pub const CARD: &str = "<div>@name@ (@ROLE@)@Unknown@</div>";
pub const WIDGETS: &str = "<ul>@Item@</ul>";

/// Expected output of `/` on the fixture site.
pub const HOME_PAGE: &str =
    "<html><h1>Home</h1>|<ul><li>gear</li></ul>||<div>Ada (admin)</div>|/static/app.css</html>";

pub fn templates() -> MemoryTemplateProvider {
    MemoryTemplateProvider::new()
        .with("master.html", MASTER)
        .with("card.html", CARD)
        .with("widgets.html", WIDGETS)
}

pub struct HomeBuilder;

impl PageBuilder for HomeBuilder {
    fn model(&mut self, _ctx: &Context<'_>) -> Result<Option<Model>> {
        Ok(Some(Model::new(serde_json::json!({"Name": "Ada", "Role": "admin"}))))
    }

    fn compose(&mut self, _ctx: &Context<'_>, model: Option<Model>, page: &mut Page) -> Result<()> {
        page.set_master_template("master.html");
        page.register_view("header", ContentView::new("<h1>Home</h1>"));
        page.register_view("Body", ModelTemplateView::new("card.html", model.unwrap_or_default()));
        Ok(())
    }
}

/// Registered as `header` so a page view of the same name must shadow it.
pub struct HeaderBuilder;

impl PageBuilder for HeaderBuilder {
    fn compose(&mut self, _ctx: &Context<'_>, _model: Option<Model>, page: &mut Page) -> Result<()> {
        page.set_master_text("BUILT-HEADER");
        Ok(())
    }
}

pub struct WidgetsBuilder;

impl PageBuilder for WidgetsBuilder {
    fn compose(&mut self, _ctx: &Context<'_>, _model: Option<Model>, page: &mut Page) -> Result<()> {
        page.set_master_template("widgets.html");
        page.register_view("Item", ContentView::new("<li>gear</li>"));
        Ok(())
    }
}

pub struct PostBuilder {
    slug: String,
    route_id: i32,
}

impl PageBuilder for PostBuilder {
    fn compose(&mut self, _ctx: &Context<'_>, _model: Option<Model>, page: &mut Page) -> Result<()> {
        page.set_master_text("post:@Slug@ route:@Route@");
        page.register_view("Slug", ContentView::new(self.slug.clone()));
        page.register_view("Route", ContentView::new(self.route_id.to_string()));
        Ok(())
    }
}

/// Fails halfway through rendering: `absent.html` does not exist.
pub struct BrokenBuilder;

impl PageBuilder for BrokenBuilder {
    fn compose(&mut self, _ctx: &Context<'_>, _model: Option<Model>, page: &mut Page) -> Result<()> {
        page.set_master_text("before @Missing@ after");
        page.register_view("Missing", TemplateFileView::new("absent.html"));
        Ok(())
    }
}

pub struct NotFoundBuilder;

impl PageBuilder for NotFoundBuilder {
    fn compose(&mut self, _ctx: &Context<'_>, _model: Option<Model>, page: &mut Page) -> Result<()> {
        page.set_master_text("not found");
        Ok(())
    }
}

/// Construction counters for the registered builders.
#[derive(Default, Clone)]
pub struct Counters {
    pub header: Arc<AtomicUsize>,
    pub widgets: Arc<AtomicUsize>,
}

impl Counters {
    pub fn header_builds(&self) -> usize {
        self.header.load(Ordering::SeqCst)
    }

    pub fn widget_builds(&self) -> usize {
        self.widgets.load(Ordering::SeqCst)
    }
}

pub struct Fixture {
    pub site: Site,
    pub counters: Counters,
}

/// The fixture site's builders, without a not-found builder.
pub fn site_builder(counters: &Counters) -> SiteBuilder {
    let header = Arc::clone(&counters.header);
    let widgets = Arc::clone(&counters.widgets);

    Site::builder(SiteConfig::default())
        .templates(templates())
        .builder(BuilderDefinition::new(Implementation::builder(|_| HomeBuilder)))
        .builder(
            BuilderDefinition::new(Implementation::builder(move |_| {
                header.fetch_add(1, Ordering::SeqCst);
                HeaderBuilder
            }))
            .identifier("header"),
        )
        .builder(
            BuilderDefinition::new(Implementation::builder(move |_| {
                widgets.fetch_add(1, Ordering::SeqCst);
                WidgetsBuilder
            }))
            .identifier("widgets"),
        )
        .builder(
            BuilderDefinition::new(Implementation::builder(|args: CreateArgs| PostBuilder {
                slug: args.path_data.get("slug").unwrap_or_default().to_string(),
                route_id: args.route_id,
            }))
            .route(7, "/(?P<slug>[a-z-]+)/?$", 5),
        )
        .builder(
            BuilderDefinition::new(Implementation::builder(|_| BrokenBuilder))
                .route(1, "^~/broken$", 1),
        )
}

pub fn fixture() -> Fixture {
    let counters = Counters::default();
    let site = site_builder(&counters)
        .not_found(Implementation::builder(|_| NotFoundBuilder))
        .build()
        .unwrap();
    Fixture { site, counters }
}

pub fn fixture_without_fallback() -> Fixture {
    let counters = Counters::default();
    let site = site_builder(&counters).build().unwrap();
    Fixture { site, counters }
}

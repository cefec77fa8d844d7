//! A small documentation site served by the `quire` binary.
//!
//! The layout pulls in a `nav` builder from the site registry, the docs
//! index renders through a repeater and each document binds its model.

use std::fmt::Write;

use serde_json::json;

use quire::compose::{
    repeat, ContentView, FnView, ModelTemplateView, RepeaterTemplates,
};
use quire::routing::pattern::DEFAULT_PRIORITY;
use quire::template::MemoryTemplateProvider;
use quire::{
    BuilderDefinition, Context, CreateArgs, Implementation, Model, Page, PageBuilder, Result,
    SiteBuilder,
};

const LAYOUT: &str = "<!doctype html>
<html>
<head><title>@Title@ | @SiteName@</title></head>
<body>
@nav@
<main>@Body@</main>
<footer>Served from @~/@ (contact: support@@example.com)</footer>
</body>
</html>
";

const HOME: &str = "<h1>Welcome to @SiteName@</h1>
<p>@Tagline@</p>
<p><a href=\"@~/docs@\">Browse the documentation</a></p>
";

const DOCS_LIST: &str = "<h1>@Heading@</h1>
<ul>
@ItemTemplate@
</ul>
@FooterTemplate@";

const DOCS_ITEM: &str = "<li><a href=\"@~/docs/@@Slug@\">@Title@</a></li>\n";

const DOCS_FOOTER: &str = "<p>@Count@ documents</p>\n";

const DOC: &str = "<article>
<h1>@Title@</h1>
<p>@Body@</p>
</article>
";

#[derive(Debug, Clone)]
struct Doc {
    slug: &'static str,
    title: &'static str,
    body: &'static str,
}

const DOCS: &[Doc] = &[
    Doc {
        slug: "intro",
        title: "Introduction",
        body: "Builders choose a master template and fill its tags.",
    },
    Doc {
        slug: "routing",
        title: "Routing",
        body: "Routes are regular expressions over the app-relative path.",
    },
    Doc {
        slug: "views",
        title: "Views",
        body: "Views are leaves: content, raw templates or bound models.",
    },
];

fn site_model() -> Model {
    Model::new(json!({
        "SiteName": "quire",
        "Tagline": "Pages composed from templates, views and builders.",
    }))
}

/// Register the ambient model's properties as content views.
fn register_site_views(page: &mut Page, model: &Model) {
    for tag in ["SiteName", "Tagline"] {
        if let Some(value) = model.property(tag) {
            page.register_view(tag, ContentView::new(value.into_owned()));
        }
    }
}

struct HomeBuilder;

impl PageBuilder for HomeBuilder {
    fn model(&mut self, _ctx: &Context<'_>) -> Result<Option<Model>> {
        Ok(Some(site_model()))
    }

    fn compose(&mut self, _ctx: &Context<'_>, model: Option<Model>, page: &mut Page) -> Result<()> {
        let model = model.unwrap_or_default();
        page.set_master_template("layout.html");
        page.register_view("Title", ContentView::new("Home"));
        register_site_views(page, &model);
        page.register_view("Body", ModelTemplateView::new("home.html", model));
        Ok(())
    }
}

struct DocsBuilder {
    slug: Option<String>,
}

impl DocsBuilder {
    fn new(args: CreateArgs) -> Self {
        let slug = args
            .path_data
            .get("slug")
            .filter(|slug| !slug.is_empty())
            .map(str::to_string);
        Self { slug }
    }
}

impl PageBuilder for DocsBuilder {
    fn model(&mut self, _ctx: &Context<'_>) -> Result<Option<Model>> {
        Ok(Some(site_model()))
    }

    fn compose(&mut self, _ctx: &Context<'_>, model: Option<Model>, page: &mut Page) -> Result<()> {
        let model = model.unwrap_or_default();
        page.set_master_template("layout.html");
        register_site_views(page, &model);

        let Some(slug) = self.slug.as_deref() else {
            page.register_view("Title", ContentView::new("Documentation"));
            let records: Vec<Model> = DOCS
                .iter()
                .map(|doc| Model::new(json!({"Slug": doc.slug, "Title": doc.title})))
                .collect();
            let ambient = Model::new(json!({"Heading": "Documentation", "Count": DOCS.len()}));
            page.register_view(
                "Body",
                FnView::new(move |ctx: &Context<'_>, out: &mut dyn Write| {
                    let templates = RepeaterTemplates {
                        header: "docs-list.html",
                        item: "docs-item.html",
                        footer: "docs-footer.html",
                    };
                    repeat(ctx, out, templates, &records, &ambient, None)
                }),
            );
            return Ok(());
        };

        match DOCS.iter().find(|doc| doc.slug == slug) {
            Some(doc) => {
                page.register_view("Title", ContentView::new(doc.title));
                let doc_model = Model::new(json!({"Title": doc.title, "Body": doc.body}));
                page.register_view("Body", ModelTemplateView::new("doc.html", doc_model));
            }
            None => {
                page.register_view("Title", ContentView::new("Unknown document"));
                page.register_view("Body", ContentView::new(format!("<p>No document named {slug}.</p>")));
            }
        }
        Ok(())
    }
}

struct NavBuilder;

impl PageBuilder for NavBuilder {
    fn compose(&mut self, _ctx: &Context<'_>, _model: Option<Model>, page: &mut Page) -> Result<()> {
        page.set_master_text("<nav><a href=\"@~/@\">Home</a> | <a href=\"@~/docs@\">Docs</a></nav>");
        Ok(())
    }
}

struct NotFoundBuilder {
    path: String,
}

impl PageBuilder for NotFoundBuilder {
    fn compose(&mut self, _ctx: &Context<'_>, _model: Option<Model>, page: &mut Page) -> Result<()> {
        let model = site_model();
        page.set_master_template("layout.html");
        register_site_views(page, &model);
        page.register_view("Title", ContentView::new("Not found"));
        page.register_view(
            "Body",
            ContentView::new(format!("<p>Nothing lives at {}.</p>", self.path)),
        );
        Ok(())
    }
}

/// The embedded templates the demo site renders.
pub fn templates() -> MemoryTemplateProvider {
    MemoryTemplateProvider::new()
        .with("layout.html", LAYOUT)
        .with("home.html", HOME)
        .with("docs-list.html", DOCS_LIST)
        .with("docs-item.html", DOCS_ITEM)
        .with("docs-footer.html", DOCS_FOOTER)
        .with("doc.html", DOC)
}

/// Declare the demo builders on a site.
pub fn register(site: SiteBuilder) -> SiteBuilder {
    site.builder(BuilderDefinition::new(Implementation::builder(|_| HomeBuilder)))
        .builder(
            BuilderDefinition::new(Implementation::builder(DocsBuilder::new))
                .route(0, "/?$", DEFAULT_PRIORITY)
                .route(1, "/(?P<slug>[a-z0-9-]+)/?$", 5),
        )
        .builder(
            BuilderDefinition::new(Implementation::builder(|_| NavBuilder))
                .identifier("nav")
                .route(0, "^~/nav-preview$", 1),
        )
        .not_found(Implementation::builder(|args: CreateArgs| NotFoundBuilder {
            path: args.request.path().to_string(),
        }))
}

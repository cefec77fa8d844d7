//! Page composition subsystem.
//!
//! # Data Flow
//! ```text
//! matched route
//!     → builder.rs (initialize → model → compose)
//!     → page.rs (master template + components by tag)
//!     → resolver.rs (tag → page view | page builder | site builder | nothing)
//!     → view.rs / nested build_page (write into the shared sink)
//! ```
//!
//! `binding.rs` and `repeater.rs` fill templates from models instead of components.

pub mod binding;
pub mod builder;
pub mod context;
pub mod model;
pub mod page;
pub mod repeater;
pub mod resolver;
pub mod view;

pub use binding::UnmatchedTag;
pub use builder::{build_page, PageBuilder};
pub use context::{Context, PathData, RequestContext};
pub use model::Model;
pub use page::{Component, Page, TemplateSource, ViewRegistry};
pub use repeater::{repeat, RepeaterTemplates, UnmatchedRecordTag, FOOTER_SECTION, ITEM_SECTION};
pub use resolver::{classify, render_tag, Resolution};
pub use view::{ContentView, FnView, ModelTemplateView, TemplateFileView, View};

//! Per-request state shared by builders and views.
//!
//! # Responsibilities
//! - Carry the request handles every builder and view receives
//! - Hold path parameters captured by the matched route
//! - Offer template scanning, raw template access and factory helpers
//!
//! # Design Decisions
//! - `Context` is a small `Copy` value passed explicitly; nothing is ambient
//! - Literal text is written straight to the sink; only tags reach the handler

use std::fmt::Write;
use std::io::Read;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::compose::builder::{build_page, PageBuilder};
use crate::compose::model::Model;
use crate::compose::view::View;
use crate::error::{Error, Result};
use crate::registry::CreateArgs;
use crate::site::Site;
use crate::template::chars::CharReader;
use crate::template::{scan_reader, scan_text, Event};

/// The request a page is being composed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    method: String,
    path: String,
    host: Option<String>,
    query: Vec<(String, String)>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            host: None,
            query: Vec::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// First value of a query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Named route captures, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathData {
    values: IndexMap<String, String>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; an existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Key at a position.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.values.get_index(index).map(|(key, _)| key.as_str())
    }

    /// Key and value at a position.
    pub fn get_index(&self, index: usize) -> Option<(&str, &str)> {
        self.values
            .get_index(index)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = PathData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

/// Rendering context: the site plus the request being served.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    site: &'a Site,
    request: &'a Arc<RequestContext>,
}

impl<'a> Context<'a> {
    pub fn new(site: &'a Site, request: &'a Arc<RequestContext>) -> Self {
        Self { site, request }
    }

    pub fn site(&self) -> &'a Site {
        self.site
    }

    pub fn request(&self) -> &'a RequestContext {
        self.request
    }

    pub fn shared_request(&self) -> Arc<RequestContext> {
        Arc::clone(self.request)
    }

    /// Scan a template file, writing literals to `out` and passing tags to `on_tag`.
    pub fn parse_template<H>(&self, name: &str, out: &mut dyn Write, mut on_tag: H) -> Result<()>
    where
        H: FnMut(&str, &mut dyn Write) -> Result<()>,
    {
        let reader = self.site.templates().open(name, self.site.search_root())?;
        scan_reader(name, reader, self.site.template_scan_options(), |event| match event {
            Event::Literal(text) => out.write_str(text).map_err(Error::from),
            Event::Tag(tag) => on_tag(tag, &mut *out),
        })
    }

    /// Scan inline template text, writing literals to `out` and passing tags to `on_tag`.
    pub fn parse_text<H>(&self, text: &str, out: &mut dyn Write, mut on_tag: H) -> Result<()>
    where
        H: FnMut(&str, &mut dyn Write) -> Result<()>,
    {
        scan_text(text, self.site.text_scan_options(), |event| match event {
            Event::Literal(text) => out.write_str(text).map_err(Error::from),
            Event::Tag(tag) => on_tag(tag, &mut *out),
        })
    }

    /// Copy a template to `out` without scanning it.
    pub fn write_template(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        let reader = self.site.templates().open(name, self.site.search_root())?;
        for c in CharReader::new(reader) {
            let c = c.map_err(|source| Error::TemplateRead {
                name: name.to_string(),
                source,
            })?;
            out.write_char(c)?;
        }
        Ok(())
    }

    /// The whole content of a template.
    pub fn template_content(&self, name: &str) -> Result<String> {
        let mut reader = self.site.templates().open(name, self.site.search_root())?;
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|source| Error::TemplateRead {
                name: name.to_string(),
                source,
            })?;
        Ok(content)
    }

    /// Create a registered view; the model-taking constructor is used when a model is given.
    pub fn create_view(&self, identifier: &str, model: Option<Model>) -> Result<Box<dyn View>> {
        let args = CreateArgs::new(self.shared_request()).with_model(model);
        Ok(self.site.views().create(identifier, args)?)
    }

    /// Create a registered builder for this request.
    pub fn create_builder(&self, identifier: &str, path_data: PathData) -> Result<Box<dyn PageBuilder>> {
        let args = CreateArgs::new(self.shared_request()).with_path_data(path_data);
        Ok(self.site.builders().create(identifier, args)?)
    }

    /// Run a builder's full compose-and-render cycle into `out`.
    pub fn build(&self, builder: &mut dyn PageBuilder, out: &mut dyn Write) -> Result<()> {
        build_page(builder, self, out)
    }
}

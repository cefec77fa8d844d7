//! Implementation descriptors: a named type plus its constructors.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::compose::{Model, PathData, RequestContext};

/// Call shape a constructor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    /// Request context (and, for builders, the path parameters).
    Context,
    /// Request context plus a model.
    ContextAndModel,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Context => write!(f, "(context)"),
            Signature::ContextAndModel => write!(f, "(context, model)"),
        }
    }
}

/// Arguments handed to a constructor.
#[derive(Debug, Clone)]
pub struct CreateArgs {
    pub request: Arc<RequestContext>,
    pub path_data: PathData,
    pub model: Option<Model>,
    pub route_id: i32,
}

impl CreateArgs {
    pub fn new(request: Arc<RequestContext>) -> Self {
        Self {
            request,
            path_data: PathData::new(),
            model: None,
            route_id: 0,
        }
    }

    pub fn with_path_data(mut self, path_data: PathData) -> Self {
        self.path_data = path_data;
        self
    }

    pub fn with_model(mut self, model: Option<Model>) -> Self {
        self.model = model;
        self
    }

    pub fn with_route_id(mut self, route_id: i32) -> Self {
        self.route_id = route_id;
        self
    }

    /// The signature these arguments select.
    pub fn signature(&self) -> Signature {
        if self.model.is_some() {
            Signature::ContextAndModel
        } else {
            Signature::Context
        }
    }
}

/// A shared constructor producing boxed `T`.
pub type Constructor<T> = Arc<dyn Fn(CreateArgs) -> Box<T> + Send + Sync>;

static NEXT_DESCRIPTOR_ID: AtomicU64 = AtomicU64::new(1);

fn next_descriptor_id() -> u64 {
    NEXT_DESCRIPTOR_ID.fetch_add(1, Ordering::Relaxed)
}

/// A constructible type: its identity, name and constructors by signature.
///
/// Every descriptor carries its own id. Two descriptors for the same concrete type
/// may construct it differently, so constructors are cached per descriptor.
pub struct Implementation<T: ?Sized> {
    id: u64,
    type_id: TypeId,
    type_name: String,
    constructors: HashMap<Signature, Constructor<T>>,
}

impl<T: ?Sized + 'static> Implementation<T> {
    /// Describe the concrete type `C`, named after its last path segment.
    pub fn of<C: 'static>() -> Self {
        Self {
            id: next_descriptor_id(),
            type_id: TypeId::of::<C>(),
            type_name: short_type_name(std::any::type_name::<C>()).to_string(),
            constructors: HashMap::new(),
        }
    }

    /// Override the type name used for route stems and diagnostics.
    pub fn named(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Add (or replace) the constructor for a signature.
    ///
    /// The descriptor gets a fresh id, so nothing cached for it before still applies.
    pub fn constructor<F>(mut self, signature: Signature, ctor: F) -> Self
    where
        F: Fn(CreateArgs) -> Box<T> + Send + Sync + 'static,
    {
        self.constructors.insert(signature, Arc::new(ctor));
        self.id = next_descriptor_id();
        self
    }

    /// Process-unique descriptor id; the constructor cache key.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn supports(&self, signature: Signature) -> bool {
        self.constructors.contains_key(&signature)
    }

    pub(crate) fn find_constructor(&self, signature: Signature) -> Option<Constructor<T>> {
        self.constructors.get(&signature).cloned()
    }
}

impl<T: ?Sized> fmt::Debug for Implementation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut signatures: Vec<_> = self.constructors.keys().collect();
        signatures.sort_by_key(|s| **s as u8);
        f.debug_struct("Implementation")
            .field("type_name", &self.type_name)
            .field("signatures", &signatures)
            .finish()
    }
}

/// `a::b::HomeBuilder<x::Y>` → `HomeBuilder`.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReportsBuilder;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("quire::demo::HomeBuilder"), "HomeBuilder");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper");
    }

    #[test]
    fn test_descriptor_name_and_signatures() {
        let implementation = Implementation::<str>::of::<ReportsBuilder>()
            .constructor(Signature::Context, |_| Box::<str>::from("reports"));
        assert_eq!(implementation.type_name(), "ReportsBuilder");
        assert_eq!(implementation.type_id(), TypeId::of::<ReportsBuilder>());
        assert!(implementation.supports(Signature::Context));
        assert!(!implementation.supports(Signature::ContextAndModel));

        let renamed = implementation.named("LegacyReportsBuilder");
        assert_eq!(renamed.type_name(), "LegacyReportsBuilder");
    }

    #[test]
    fn test_descriptors_of_one_type_have_distinct_ids() {
        let first = Implementation::<str>::of::<ReportsBuilder>();
        let second = Implementation::<str>::of::<ReportsBuilder>();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.type_id(), second.type_id());

        let before = first.id();
        let first = first.constructor(Signature::Context, |_| Box::<str>::from("reports"));
        assert_ne!(first.id(), before);
    }

    #[test]
    fn test_args_select_signature() {
        let args = CreateArgs::new(Arc::new(RequestContext::new("GET", "/")));
        assert_eq!(args.signature(), Signature::Context);
        let args = args.with_model(Some(Model::default()));
        assert_eq!(args.signature(), Signature::ContextAndModel);
    }
}

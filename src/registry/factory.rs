//! Identifier → implementation registry with cached construction.
//!
//! # Responsibilities
//! - Map identifiers to implementation descriptors ("last write wins")
//! - Construct instances by identifier or by descriptor
//! - Cache the constructor picked for each (descriptor, signature) pair
//!
//! # Design Decisions
//! - Entries live in a copy-on-write snapshot: reads never lock
//! - The constructor cache is a concurrent map filled lazily; a race fills the
//!   same entry twice with the same constructor
//! - Replacing an identifier evicts the replaced descriptor's cached constructors

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::error::ConfigurationError;
use crate::registry::implementation::{Constructor, CreateArgs, Implementation, Signature};

type Entries<T> = HashMap<String, Arc<Implementation<T>>>;

/// A registry of constructible `T` implementations.
pub struct Registry<T: ?Sized> {
    kind: &'static str,
    entries: ArcSwap<Entries<T>>,
    constructors: DashMap<(u64, Signature), Constructor<T>>,
}

impl<T: ?Sized + 'static> Registry<T> {
    /// Create an empty registry. `kind` names the registry in errors ("view", "builder").
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: ArcSwap::from_pointee(HashMap::new()),
            constructors: DashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Register an implementation, replacing any prior entry for the identifier.
    pub fn register(
        &self,
        identifier: impl Into<String>,
        implementation: Implementation<T>,
    ) -> Result<Arc<Implementation<T>>, ConfigurationError> {
        let implementation = Arc::new(implementation);
        self.register_shared(identifier, Arc::clone(&implementation))?;
        Ok(implementation)
    }

    /// Register an already shared implementation.
    pub fn register_shared(
        &self,
        identifier: impl Into<String>,
        implementation: Arc<Implementation<T>>,
    ) -> Result<(), ConfigurationError> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(ConfigurationError::EmptyIdentifier { kind: self.kind });
        }

        let mut replaced = None;
        self.entries.rcu(|current| {
            let mut next = HashMap::clone(current);
            replaced = next
                .insert(identifier.clone(), Arc::clone(&implementation))
                .map(|prior| prior.id());
            next
        });

        // The prior descriptor may still be registered under another identifier.
        if let Some(prior) = replaced.filter(|prior| *prior != implementation.id()) {
            let still_registered = self.entries.load().values().any(|entry| entry.id() == prior);
            if !still_registered {
                self.constructors.retain(|(id, _), _| *id != prior);
            }
        }

        tracing::debug!(
            kind = self.kind,
            identifier = %identifier,
            type_name = implementation.type_name(),
            replaced = replaced.is_some(),
            "Registered implementation"
        );
        Ok(())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.load().contains_key(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<Implementation<T>>> {
        self.entries.load().get(identifier).cloned()
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<_> = self.entries.load().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Create an instance of the implementation registered under `identifier`.
    pub fn create(&self, identifier: &str, args: CreateArgs) -> Result<Box<T>, ConfigurationError> {
        if identifier.is_empty() {
            return Err(ConfigurationError::EmptyIdentifier { kind: self.kind });
        }
        let implementation =
            self.get(identifier)
                .ok_or_else(|| ConfigurationError::UnknownIdentifier {
                    kind: self.kind,
                    identifier: identifier.to_string(),
                })?;
        self.instantiate(&implementation, args)
    }

    /// Create an instance straight from a descriptor, registered or not.
    pub fn instantiate(
        &self,
        implementation: &Implementation<T>,
        args: CreateArgs,
    ) -> Result<Box<T>, ConfigurationError> {
        let signature = args.signature();
        let key = (implementation.id(), signature);

        // Clone out of the map so no shard lock is held while constructing.
        let cached = self.constructors.get(&key).map(|entry| Arc::clone(entry.value()));
        let ctor = match cached {
            Some(ctor) => ctor,
            None => {
                let ctor = implementation.find_constructor(signature).ok_or_else(|| {
                    ConfigurationError::MissingConstructor {
                        type_name: implementation.type_name().to_string(),
                        signature,
                    }
                })?;
                self.constructors.insert(key, Arc::clone(&ctor));
                ctor
            }
        };
        Ok(ctor(args))
    }

    /// Number of cached constructors.
    pub fn cached_constructors(&self) -> usize {
        self.constructors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{Model, RequestContext};

    trait Greeter {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".into()
        }
    }

    struct French {
        name: Option<String>,
    }
    impl Greeter for French {
        fn greet(&self) -> String {
            match &self.name {
                Some(name) => format!("bonjour {name}"),
                None => "bonjour".into(),
            }
        }
    }

    fn english() -> Implementation<dyn Greeter> {
        Implementation::of::<English>()
            .constructor(Signature::Context, |_| Box::new(English) as Box<dyn Greeter>)
    }

    fn french() -> Implementation<dyn Greeter> {
        Implementation::of::<French>()
            .constructor(Signature::Context, |_| Box::new(French { name: None }) as Box<dyn Greeter>)
            .constructor(Signature::ContextAndModel, |args| {
                let name = args
                    .model
                    .as_ref()
                    .and_then(|m| m.property("name"))
                    .map(|v| v.into_owned());
                Box::new(French { name }) as Box<dyn Greeter>
            })
    }

    fn args() -> CreateArgs {
        CreateArgs::new(Arc::new(RequestContext::new("GET", "/")))
    }

    #[test]
    fn test_register_contains_create() {
        let registry = Registry::new("greeter");
        registry.register("en", english()).unwrap();

        assert!(registry.contains("en"));
        assert!(!registry.contains("EN"));
        assert_eq!(registry.create("en", args()).unwrap().greet(), "hello");
    }

    #[test]
    fn test_reregistration_replaces_entry() {
        let registry = Registry::new("greeter");
        registry.register("greeting", english()).unwrap();
        assert_eq!(registry.create("greeting", args()).unwrap().greet(), "hello");

        registry.register("greeting", french()).unwrap();
        assert_eq!(registry.len(), 1);
        for _ in 0..3 {
            assert_eq!(registry.create("greeting", args()).unwrap().greet(), "bonjour");
        }
    }

    fn fixed(text: &'static str) -> Implementation<dyn Greeter> {
        Implementation::of::<Fixed>()
            .constructor(Signature::Context, move |_| Box::new(Fixed(text)) as Box<dyn Greeter>)
    }

    struct Fixed(&'static str);
    impl Greeter for Fixed {
        fn greet(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_constructor_is_cached_per_descriptor_and_signature() {
        let registry = Registry::new("greeter");
        let shared = registry.register("fr", french()).unwrap();
        registry.register_shared("fr-alias", shared).unwrap();

        registry.create("fr", args()).unwrap();
        registry.create("fr-alias", args()).unwrap();
        assert_eq!(registry.cached_constructors(), 1);

        let model = Model::new(serde_json::json!({ "Name": "Ada" }));
        let greeter = registry.create("fr", args().with_model(Some(model))).unwrap();
        assert_eq!(greeter.greet(), "bonjour Ada");
        assert_eq!(registry.cached_constructors(), 2);
    }

    #[test]
    fn test_same_type_descriptors_keep_their_own_constructors() {
        let registry = Registry::new("greeter");
        registry.register("banner", fixed("SALE")).unwrap();
        registry.register("footer", fixed("(c) 2026")).unwrap();

        assert_eq!(registry.create("banner", args()).unwrap().greet(), "SALE");
        assert_eq!(registry.create("footer", args()).unwrap().greet(), "(c) 2026");
        assert_eq!(registry.cached_constructors(), 2);
    }

    #[test]
    fn test_reregistering_same_type_uses_new_constructor() {
        let registry = Registry::new("greeter");
        registry.register("greeting", fixed("old")).unwrap();
        assert_eq!(registry.create("greeting", args()).unwrap().greet(), "old");

        registry.register("greeting", fixed("new")).unwrap();
        assert_eq!(registry.cached_constructors(), 0);
        for _ in 0..2 {
            assert_eq!(registry.create("greeting", args()).unwrap().greet(), "new");
        }
    }

    #[test]
    fn test_unknown_and_empty_identifiers() {
        let registry: Registry<dyn Greeter> = Registry::new("greeter");
        assert!(matches!(
            registry.create("missing", args()),
            Err(ConfigurationError::UnknownIdentifier { kind: "greeter", .. })
        ));
        assert!(matches!(
            registry.create("", args()),
            Err(ConfigurationError::EmptyIdentifier { .. })
        ));
        assert!(matches!(
            registry.register("", english()),
            Err(ConfigurationError::EmptyIdentifier { .. })
        ));
    }

    #[test]
    fn test_missing_constructor_signature() {
        let registry = Registry::new("greeter");
        registry.register("en", english()).unwrap();

        let err = registry
            .create("en", args().with_model(Some(Model::default())))
            .err()
            .unwrap();
        match err {
            ConfigurationError::MissingConstructor { type_name, signature } => {
                assert_eq!(type_name, "English");
                assert_eq!(signature, Signature::ContextAndModel);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_concurrent_creation_is_safe() {
        let registry = Arc::new(Registry::new("greeter"));
        registry.register("fr", french()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.create("fr", args()).unwrap().greet())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "bonjour");
        }
        assert_eq!(registry.cached_constructors(), 1);
    }
}

//! Mapping from type names to resource kinds.

use crate::descriptor::ResourceKind;
use std::collections::BTreeMap;

/// Type-name lookup table handed to the [`Dispatcher`](crate::Dispatcher).
///
/// [`Registry::builtin`] knows every supported kind and its aliases. An
/// empty registry can be filled with [`register`](Registry::register) to
/// restrict what a dispatcher accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    kinds: BTreeMap<String, ResourceKind>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every supported kind and alias.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in ResourceKind::all() {
            registry.register(kind.type_name(), *kind);
            for alias in kind.aliases() {
                registry.register(*alias, *kind);
            }
        }
        registry
    }

    /// Map a type name to a kind, replacing any previous mapping.
    pub fn register(&mut self, name: impl Into<String>, kind: ResourceKind) -> &mut Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    /// Look up a type name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ResourceKind> {
        self.kinds.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Registered `(name, kind)` pairs, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, ResourceKind)> {
        self.kinds.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no names are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

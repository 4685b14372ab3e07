//! In-memory type catalog.
//!
//! `TypeCatalog` holds every type descriptor in memory, keyed by path and kept
//! in declaration order. It is the introspector used by the CLI and by tests;
//! hosts that generate descriptors at compile time can build one directly.

use std::sync::OnceLock;

use indexmap::IndexMap;
use tracing::debug;

use super::{TypeDescriptor, TypeIntrospector, TypeKey};

/// In-memory type universe.
///
/// The list of implementation-tagged candidates is computed on first use and
/// reused for every interface, since the universe does not change while a
/// schema is being discovered. Mutating the catalog resets that cache.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<TypeKey, TypeDescriptor>,
    candidates: OnceLock<Vec<TypeKey>>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from descriptors. Later duplicates replace earlier ones.
    pub fn from_types(types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let mut catalog = Self::new();
        for desc in types {
            catalog.insert(desc);
        }
        catalog
    }

    /// Adds or replaces a descriptor.
    pub fn insert(&mut self, desc: TypeDescriptor) {
        self.candidates = OnceLock::new();
        if let Some(previous) = self.types.insert(desc.key.clone(), desc) {
            debug!(type_key = %previous.key, "Replaced type descriptor");
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_type(mut self, desc: TypeDescriptor) -> Self {
        self.insert(desc);
        self
    }

    /// Returns the number of types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the catalog holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeIntrospector for TypeCatalog {
    fn lookup(&self, key: &TypeKey) -> Option<&TypeDescriptor> {
        self.types.get(key)
    }

    fn types(&self) -> Box<dyn Iterator<Item = &TypeDescriptor> + '_> {
        Box::new(self.types.values())
    }

    fn implementation_candidates(&self) -> &[TypeKey] {
        self.candidates.get_or_init(|| {
            let candidates: Vec<TypeKey> = self
                .types
                .values()
                .filter(|desc| desc.has_implementation_tag())
                .map(|desc| desc.key.clone())
                .collect();
            debug!(
                count = candidates.len(),
                "Collected implementation candidates"
            );
            candidates
        })
    }
}

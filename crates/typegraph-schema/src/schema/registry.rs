//! Type discovery worklist.
//!
//! Each emitted type name moves through `Unseen -> Queued -> Emitted` exactly
//! once per discovery run. Names are the identity; re-discovery with the same
//! kind is a no-op and with a different kind is a fatal conflict.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::SchemaError;
use crate::reflect::TypeKey;
use crate::schema::TypeKind;
use crate::Result;

/// Lifecycle of a discovered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Unseen,
    Queued,
    Emitted,
}

/// A unit of schema-graph work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredType {
    /// Emitted SDL type name.
    pub name: String,
    pub source: TypeKey,
    pub kind: TypeKind,
    /// Interface this type merges fields from.
    pub implements_interface: Option<String>,
}

/// Outcome of [`TypeRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First sighting; the caller must finish discovery and enqueue it.
    New(DiscoveredType),
    /// Already known with the same kind; carries the recorded entry.
    Known(DiscoveredType),
}

/// Registry of discovered types and the pending queue.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Every discovered type by name.
    entries: HashMap<String, DiscoveredType>,
    /// Names recorded and not yet emitted.
    queued: HashSet<String>,
    /// Names whose definition has been built.
    emitted: HashSet<String>,
    /// Drain order.
    pending: VecDeque<String>,
}

impl TypeRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lifecycle state of a name.
    pub fn state(&self, name: &str) -> DiscoveryState {
        if self.emitted.contains(name) {
            DiscoveryState::Emitted
        } else if self.queued.contains(name) {
            DiscoveryState::Queued
        } else {
            DiscoveryState::Unseen
        }
    }

    /// Returns the recorded entry for a name.
    pub fn get(&self, name: &str) -> Option<&DiscoveredType> {
        self.entries.get(name)
    }

    /// Records a discovery request.
    ///
    /// A known name with the same kind keeps its recorded entry; if that
    /// entry has no interface linkage yet it adopts the request's.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::KindConflict` if the name is known with a
    /// different kind.
    pub fn register(&mut self, candidate: DiscoveredType) -> Result<Registration> {
        if let Some(existing) = self.entries.get_mut(&candidate.name) {
            if existing.kind != candidate.kind {
                return Err(SchemaError::KindConflict {
                    name: candidate.name,
                    previous: existing.kind,
                    requested: candidate.kind,
                });
            }
            if existing.implements_interface.is_none() {
                existing.implements_interface = candidate.implements_interface;
            }
            return Ok(Registration::Known(existing.clone()));
        }
        self.queued.insert(candidate.name.clone());
        self.entries.insert(candidate.name.clone(), candidate.clone());
        Ok(Registration::New(candidate))
    }

    /// Appends a registered name to the drain order.
    pub fn enqueue(&mut self, name: &str) {
        if self.queued.contains(name) && !self.pending.iter().any(|n| n == name) {
            self.pending.push_back(name.to_string());
        }
    }

    /// Takes the next queued type and marks it emitted.
    pub fn pop_pending(&mut self) -> Option<DiscoveredType> {
        let name = self.pending.pop_front()?;
        self.queued.remove(&name);
        self.emitted.insert(name.clone());
        self.entries.get(&name).cloned()
    }

    /// Returns the number of discovered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if no work is queued.
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovered(name: &str, kind: TypeKind) -> DiscoveredType {
        DiscoveredType {
            name: name.into(),
            source: TypeKey::new(format!("app::{name}")),
            kind,
            implements_interface: None,
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut registry = TypeRegistry::new();
        assert_eq!(registry.state("Car"), DiscoveryState::Unseen);

        registry.register(discovered("Car", TypeKind::Object)).unwrap();
        registry.enqueue("Car");
        assert_eq!(registry.state("Car"), DiscoveryState::Queued);

        let next = registry.pop_pending().unwrap();
        assert_eq!(next.name, "Car");
        assert_eq!(registry.state("Car"), DiscoveryState::Emitted);
        assert!(registry.pop_pending().is_none());
        assert!(registry.is_drained());
    }

    #[test]
    fn test_idempotent_rediscovery() {
        let mut registry = TypeRegistry::new();
        let first = registry.register(discovered("Car", TypeKind::Object)).unwrap();
        assert!(matches!(first, Registration::New(_)));
        registry.enqueue("Car");

        let second = registry.register(discovered("Car", TypeKind::Object)).unwrap();
        assert!(matches!(second, Registration::Known(_)));
        registry.enqueue("Car");

        assert_eq!(registry.len(), 1);
        assert!(registry.pop_pending().is_some());
        assert!(registry.pop_pending().is_none());
    }

    #[test]
    fn test_kind_conflict() {
        let mut registry = TypeRegistry::new();
        registry.register(discovered("Car", TypeKind::Object)).unwrap();
        let err = registry
            .register(discovered("Car", TypeKind::Input))
            .unwrap_err();
        match err {
            SchemaError::KindConflict {
                name,
                previous,
                requested,
            } => {
                assert_eq!(name, "Car");
                assert_eq!(previous, TypeKind::Object);
                assert_eq!(requested, TypeKind::Input);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_interface_linkage_is_propagated() {
        let mut registry = TypeRegistry::new();
        registry.register(discovered("Human", TypeKind::Object)).unwrap();

        let mut linked = discovered("Human", TypeKind::Object);
        linked.implements_interface = Some("Character".into());
        registry.register(linked).unwrap();

        let again = registry.register(discovered("Human", TypeKind::Object)).unwrap();
        let Registration::Known(entry) = again else {
            panic!("expected known entry");
        };
        assert_eq!(entry.implements_interface.as_deref(), Some("Character"));
    }

    #[test]
    fn test_draining_accepts_new_work() {
        let mut registry = TypeRegistry::new();
        registry.register(discovered("A", TypeKind::Object)).unwrap();
        registry.enqueue("A");

        let mut drained = Vec::new();
        while let Some(entry) = registry.pop_pending() {
            if entry.name == "A" {
                registry.register(discovered("B", TypeKind::Object)).unwrap();
                registry.enqueue("B");
            }
            drained.push(entry.name);
        }
        assert_eq!(drained, ["A", "B"]);
    }
}

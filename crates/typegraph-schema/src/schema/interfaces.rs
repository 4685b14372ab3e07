//! Interface and implementation lookup.
//!
//! An implementation-tagged type implements the nearest interface-tagged
//! type in its ancestry. Implementations of an interface are found by
//! scanning the implementation-tagged candidates within a module scope.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::config::SchemaConfig;
use crate::reflect::{TypeDescriptor, TypeIntrospector, TypeKey};

/// Returns the nearest interface-tagged ancestor of an implementation.
///
/// Types without the implementation tag have no declared interface. The walk
/// is breadth-first over parents and interfaces and stops once the ancestry
/// is exhausted, so it returns `None` rather than looping when no tagged
/// ancestor exists.
pub fn declared_interface<'a>(
    types: &'a dyn TypeIntrospector,
    desc: &'a TypeDescriptor,
) -> Option<&'a TypeDescriptor> {
    if !desc.has_implementation_tag() {
        return None;
    }
    let mut visited = HashSet::from([&desc.key]);
    let mut queue: VecDeque<&TypeKey> = desc.supertypes().map(|s| &s.key).collect();
    while let Some(key) = queue.pop_front() {
        if !visited.insert(key) {
            continue;
        }
        let Some(ancestor) = types.lookup(key) else {
            continue;
        };
        if ancestor.has_interface_tag() {
            return Some(ancestor);
        }
        queue.extend(ancestor.supertypes().map(|s| &s.key));
    }
    None
}

/// Finds implementations of interfaces, memoizing candidates per scope.
#[derive(Debug, Default)]
pub struct ImplementationScanner {
    scoped: HashMap<Option<String>, Vec<TypeKey>>,
}

impl ImplementationScanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Implementation-tagged types assignable to `interface`, in catalog order.
    pub fn find_implementations(
        &mut self,
        types: &dyn TypeIntrospector,
        config: &SchemaConfig,
        interface: &TypeDescriptor,
    ) -> Vec<TypeKey> {
        let scope = config
            .scope_for(interface.key.module_path())
            .map(str::to_string);
        let candidates = self.scoped.entry(scope).or_insert_with_key(|scope| {
            let candidates: Vec<TypeKey> = types
                .implementation_candidates()
                .iter()
                .filter(|key| scope.as_deref().is_none_or(|s| key.is_within(s)))
                .cloned()
                .collect();
            debug!(
                scope = scope.as_deref().unwrap_or("<all>"),
                count = candidates.len(),
                "Scanned implementation candidates"
            );
            candidates
        });

        candidates
            .iter()
            .filter(|key| **key != interface.key && types.is_assignable(key, &interface.key))
            .cloned()
            .collect()
    }
}

//! Result of a schema build.

use async_graphql_parser::types::{ServiceDocument, TypeKind, TypeSystemDefinition};
use indexmap::IndexMap;
use serde::Serialize;

use super::sdl::render_sdl;
use crate::reflect::TypeKey;

/// How the serving layer should resolve a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// Single value.
    Plain,
    /// List value; a candidate for batched resolution.
    List,
    /// Event stream.
    Stream,
}

/// Links an emitted field back to the method that backs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldBinding {
    pub parent_type: String,
    pub field: String,
    /// Declaring type or resolver of the backing method.
    pub source: String,
    pub method: String,
    pub shape: FieldShape,
}

/// Ordered SDL definitions plus what the serving layer needs to wire them.
#[derive(Debug, Clone)]
pub struct GeneratedSchema {
    pub definitions: Vec<TypeSystemDefinition>,
    /// Object type name to source type, for every interface implementation.
    pub implementations: IndexMap<String, TypeKey>,
    pub bindings: Vec<FieldBinding>,
}

impl GeneratedSchema {
    /// Renders the definitions as SDL text.
    #[must_use]
    pub fn sdl(&self) -> String {
        render_sdl(&self.definitions)
    }

    /// Converts the definitions into a parser document.
    #[must_use]
    pub fn into_document(self) -> ServiceDocument {
        ServiceDocument {
            definitions: self.definitions,
        }
    }

    /// Bindings of one type's fields.
    pub fn bindings_for<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a FieldBinding> {
        self.bindings
            .iter()
            .filter(move |b| b.parent_type == type_name)
    }

    /// Looks up the binding of one field.
    #[must_use]
    pub fn binding(&self, type_name: &str, field: &str) -> Option<&FieldBinding> {
        self.bindings
            .iter()
            .find(|b| b.parent_type == type_name && b.field == field)
    }

    /// Fields the serving layer must resolve as streams.
    pub fn streaming_fields(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings
            .iter()
            .filter(|b| b.shape == FieldShape::Stream)
    }

    /// Number of definitions per SDL keyword, in first-seen order.
    #[must_use]
    pub fn definition_counts(&self) -> IndexMap<&'static str, usize> {
        let mut counts = IndexMap::new();
        for definition in &self.definitions {
            let keyword = match definition {
                TypeSystemDefinition::Schema(_) => "schema",
                TypeSystemDefinition::Directive(_) => "directive",
                TypeSystemDefinition::Type(ty) if ty.node.extend => "extend type",
                TypeSystemDefinition::Type(ty) => match ty.node.kind {
                    TypeKind::Scalar => "scalar",
                    TypeKind::Object(_) => "type",
                    TypeKind::Interface(_) => "interface",
                    TypeKind::Union(_) => "union",
                    TypeKind::Enum(_) => "enum",
                    TypeKind::InputObject(_) => "input",
                },
            };
            *counts.entry(keyword).or_insert(0) += 1;
        }
        counts
    }
}

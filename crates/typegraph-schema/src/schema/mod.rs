//! Schema discovery and SDL generation.
//!
//! This module turns resolver descriptors into SDL definitions:
//!
//! - [`classifier`] - maps type expressions to scalar, list, map, wrapper or named shapes
//! - [`metadata`] - merges method, storage-field and type-level tags
//! - [`methods`] - method eligibility and accessor name normalization
//! - [`registry`] - the discovery worklist
//! - [`interfaces`] - interface ancestry and implementation lookup
//! - [`defaults`] - default value compilation
//! - [`factory`] - orchestrates discovery and builds definitions
//! - [`builder`] - public entry point
//! - [`lazy`] - build-on-first-access holder
//! - [`sdl`] - SDL rendering

mod ast;
pub mod builder;
pub mod classifier;
pub mod defaults;
pub mod directives;
pub mod document;
pub mod factory;
mod fields;
pub mod interfaces;
pub mod lazy;
pub mod metadata;
pub mod methods;
pub mod registry;
pub mod scalars;
pub mod sdl;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use builder::SchemaBuilder;
pub use document::{FieldBinding, FieldShape, GeneratedSchema};
pub use factory::DefinitionFactory;
pub use lazy::{LazySchema, SchemaState};
pub use registry::{DiscoveredType, DiscoveryState, TypeRegistry};

/// Role a discovered type plays in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Object,
    Input,
    Enum,
    Interface,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Object => "OBJECT",
            Self::Input => "INPUT",
            Self::Enum => "ENUM",
            Self::Interface => "INTERFACE",
        })
    }
}

//! # typegraph-schema
//!
//! GraphQL SDL generation from structural type descriptors.
//!
//! Given a set of resolvers (root query, mutation and subscription resolvers
//! plus type extensions) and a catalog describing the types they use, this
//! crate discovers every reachable type and emits SDL definitions for it:
//!
//! - Object, input, enum and interface types, named from their metadata tags
//! - Interface implementations found by scanning the catalog
//! - Argument and input field defaults compiled to GraphQL literals
//! - `@deprecated` and `@secured` directives
//! - Field bindings that tell a serving layer which method backs each field
//!
//! ## Overview
//!
//! Discovery runs as a worklist: resolvers are processed in order, every
//! structural type they reference is queued, and the queue is drained until
//! no new types appear. Any error aborts the whole build.
//!
//! ```ignore
//! let manifest = SchemaManifest::from_toml_str(&text)?;
//! let (catalog, resolvers) = manifest.into_parts();
//! let builder = SchemaBuilder::new(Arc::new(catalog), SchemaConfig::default());
//! println!("{}", builder.build(&resolvers)?.sdl());
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [schema]
//! declare_scalars = true
//! secured_directive = true
//! json_scalar = "JSON"
//! ```
//!
//! ## Modules
//!
//! - [`reflect`] - Type descriptors and the introspector trait
//! - [`resolver`] - Resolver descriptors
//! - [`manifest`] - JSON and TOML manifests
//! - [`schema`] - Discovery, emission and lazy building
//! - [`config`] - Configuration options
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod manifest;
pub mod reflect;
pub mod resolver;
pub mod schema;

// Re-export main types
pub use config::SchemaConfig;
pub use error::SchemaError;
pub use manifest::SchemaManifest;
pub use reflect::{TypeCatalog, TypeDescriptor, TypeIntrospector, TypeKey};
pub use resolver::{ResolverDescriptor, ResolverRole};
pub use schema::{FieldBinding, FieldShape, GeneratedSchema, LazySchema, SchemaBuilder, TypeKind};

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

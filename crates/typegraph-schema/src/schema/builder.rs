//! Schema builder entry point.

use std::sync::Arc;

use tracing::info;

use super::document::GeneratedSchema;
use super::factory::DefinitionFactory;
use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::reflect::TypeIntrospector;
use crate::resolver::ResolverDescriptor;
use crate::Result;

/// Derives a schema from resolver descriptors.
///
/// Every build runs a fresh discovery, so one builder can be reused after
/// the type descriptors it reads from have changed.
#[derive(Clone)]
pub struct SchemaBuilder {
    types: Arc<dyn TypeIntrospector>,
    config: SchemaConfig,
}

impl SchemaBuilder {
    pub fn new(types: Arc<dyn TypeIntrospector>, config: SchemaConfig) -> Self {
        Self { types, config }
    }

    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    #[must_use]
    pub fn types(&self) -> &dyn TypeIntrospector {
        self.types.as_ref()
    }

    /// Builds definitions for `resolvers` and every type they reach.
    ///
    /// Directive and scalar declarations come first, then the resolvers'
    /// definitions in the order given, then the discovered types in
    /// discovery order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by discovery. No partial schema is
    /// returned.
    pub fn build(&self, resolvers: &[ResolverDescriptor]) -> Result<GeneratedSchema> {
        self.config.validate().map_err(SchemaError::Config)?;

        info!(resolvers = resolvers.len(), "Building schema");
        let mut factory = DefinitionFactory::new(self.types.as_ref(), &self.config);

        let mut definitions = factory.directive_definitions();
        definitions.extend(factory.scalar_declarations());
        for resolver in resolvers {
            definitions.extend(factory.process_resolver(resolver)?);
        }
        definitions.extend(factory.process_queue()?);

        let schema = factory.finish(definitions);
        info!(
            definitions = schema.definitions.len(),
            implementations = schema.implementations.len(),
            "Schema built"
        );
        Ok(schema)
    }
}

impl std::fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

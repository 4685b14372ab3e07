//! Lazy schema building.
//!
//! `LazySchema` defers the build until first access so a host can start
//! without waiting for discovery, and can drop the result to rebuild after
//! its type descriptors change.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::builder::SchemaBuilder;
use super::document::GeneratedSchema;
use crate::error::SchemaError;
use crate::resolver::ResolverDescriptor;
use crate::Result;

/// State of the lazy schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Schema has not been built yet.
    Uninitialized,
    /// Schema is currently being built.
    Building,
    /// Schema is ready for use.
    Ready,
    /// Schema build failed.
    Failed,
}

/// Thread-safe lazy schema holder.
///
/// # Example
///
/// ```ignore
/// let lazy = LazySchema::new(builder, resolvers);
///
/// // First access triggers the build
/// let schema = lazy.get_or_build().await?;
///
/// // Force a fresh discovery on next access
/// lazy.invalidate().await;
/// ```
pub struct LazySchema {
    /// Cached result, `None` until built or after invalidation.
    schema: RwLock<Option<Arc<GeneratedSchema>>>,

    /// Serializes builds.
    build_lock: Mutex<()>,

    state: RwLock<SchemaState>,

    builder: SchemaBuilder,

    resolvers: Vec<ResolverDescriptor>,

    /// Last build error message, for diagnostics.
    last_error: RwLock<Option<String>>,
}

impl LazySchema {
    #[must_use]
    pub fn new(builder: SchemaBuilder, resolvers: Vec<ResolverDescriptor>) -> Self {
        Self {
            schema: RwLock::new(None),
            build_lock: Mutex::new(()),
            state: RwLock::new(SchemaState::Uninitialized),
            builder,
            resolvers,
            last_error: RwLock::new(None),
        }
    }

    pub async fn state(&self) -> SchemaState {
        *self.state.read().await
    }

    /// Gets the schema, building it if necessary.
    ///
    /// Callers arriving while a build is in progress get an error instead of
    /// blocking; use `get_or_build_wait()` where waiting is acceptable.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::SchemaInitializing` if another build is in progress.
    /// Returns `SchemaError::BuildFailed` if the build fails.
    pub async fn get_or_build(&self) -> Result<Arc<GeneratedSchema>> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        if self.state().await == SchemaState::Building {
            return Err(SchemaError::SchemaInitializing);
        }
        let Ok(_guard) = self.build_lock.try_lock() else {
            return Err(SchemaError::SchemaInitializing);
        };

        // Another caller may have finished between the check and the lock
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }
        self.run_build().await
    }

    /// Gets the schema, waiting for an in-progress build instead of failing.
    ///
    /// A failed build is not retried until `invalidate()` is called.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::BuildFailed` if the build fails.
    pub async fn get_or_build_wait(&self) -> Result<Arc<GeneratedSchema>> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        let _guard = self.build_lock.lock().await;

        if let Some(schema) = self.get().await {
            return Ok(schema);
        }
        if self.state().await == SchemaState::Failed {
            if let Some(err) = self.last_error().await {
                return Err(SchemaError::BuildFailed(err));
            }
        }
        self.run_build().await
    }

    /// Gets the schema if it's already built, without triggering a build.
    pub async fn get(&self) -> Option<Arc<GeneratedSchema>> {
        self.schema.read().await.clone()
    }

    /// Drops the cached schema; the next access runs a fresh discovery.
    pub async fn invalidate(&self) {
        let _guard = self.build_lock.lock().await;

        *self.schema.write().await = None;
        *self.state.write().await = SchemaState::Uninitialized;
        *self.last_error.write().await = None;

        info!("Schema invalidated, will rebuild on next access");
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.state().await == SchemaState::Ready
    }

    /// Runs a build. The caller must hold `build_lock`.
    async fn run_build(&self) -> Result<Arc<GeneratedSchema>> {
        *self.state.write().await = SchemaState::Building;
        info!(resolvers = self.resolvers.len(), "Building schema lazily");

        match self.builder.build(&self.resolvers) {
            Ok(schema) => {
                let schema = Arc::new(schema);
                *self.schema.write().await = Some(Arc::clone(&schema));
                *self.state.write().await = SchemaState::Ready;
                *self.last_error.write().await = None;
                info!(definitions = schema.definitions.len(), "Schema ready");
                Ok(schema)
            }
            Err(e) => {
                let error_msg = e.to_string();
                warn!(error = %error_msg, "Failed to build schema");
                *self.state.write().await = SchemaState::Failed;
                *self.last_error.write().await = Some(error_msg.clone());
                Err(SchemaError::BuildFailed(error_msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;
    use crate::reflect::{MethodDescriptor, TypeCatalog, TypeUse, ValueKind};

    fn builder() -> SchemaBuilder {
        SchemaBuilder::new(Arc::new(TypeCatalog::new()), SchemaConfig::default())
    }

    fn query() -> ResolverDescriptor {
        ResolverDescriptor::query("HelloResolver")
            .method(MethodDescriptor::new("hello").returns(TypeUse::boxed(ValueKind::String)))
    }

    fn broken() -> ResolverDescriptor {
        ResolverDescriptor::query("BrokenResolver")
            .method(MethodDescriptor::new("missing").returns(TypeUse::named("app::Missing")))
    }

    #[tokio::test]
    async fn test_builds_on_first_access() {
        let lazy = LazySchema::new(builder(), vec![query()]);
        assert_eq!(lazy.state().await, SchemaState::Uninitialized);
        assert!(lazy.get().await.is_none());

        let schema = lazy.get_or_build().await.unwrap();
        assert!(schema.sdl().contains("hello: String"));
        assert!(lazy.is_ready().await);

        let again = lazy.get_or_build().await.unwrap();
        assert!(Arc::ptr_eq(&schema, &again));
    }

    #[tokio::test]
    async fn test_failed_build_is_remembered() {
        let lazy = LazySchema::new(builder(), vec![broken()]);
        let err = lazy.get_or_build().await.unwrap_err();
        assert!(matches!(err, SchemaError::BuildFailed(_)));
        assert_eq!(lazy.state().await, SchemaState::Failed);
        assert!(lazy.last_error().await.unwrap().contains("app::Missing"));

        let err = lazy.get_or_build_wait().await.unwrap_err();
        assert!(matches!(err, SchemaError::BuildFailed(_)));
    }

    #[tokio::test]
    async fn test_invalidate_resets_state() {
        let lazy = LazySchema::new(builder(), vec![query()]);
        let first = lazy.get_or_build_wait().await.unwrap();
        lazy.invalidate().await;
        assert_eq!(lazy.state().await, SchemaState::Uninitialized);
        assert!(lazy.last_error().await.is_none());

        let second = lazy.get_or_build().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.sdl(), second.sdl());
    }

    #[test]
    fn test_schema_state_enum() {
        assert_ne!(SchemaState::Uninitialized, SchemaState::Building);
        assert_ne!(SchemaState::Ready, SchemaState::Failed);
    }
}

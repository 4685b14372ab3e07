//! Type manifests.
//!
//! A manifest bundles the type universe with the resolvers to expose, in a
//! form that can be written by a code generator and checked into a repo.
//!
//! ```toml
//! [[types]]
//! key = "app::Car"
//! methods = [{ name = "getModel", returns = { type = "boxed", kind = "string" } }]
//!
//! [[resolvers]]
//! name = "CarQuery"
//! role = "query"
//! methods = [{ name = "car", returns = { type = "named", key = "app::Car" } }]
//! ```

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::reflect::{TypeCatalog, TypeDescriptor};
use crate::resolver::ResolverDescriptor;

/// Types plus resolvers, as loaded from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaManifest {
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
    #[serde(default)]
    pub resolvers: Vec<ResolverDescriptor>,
}

impl SchemaManifest {
    /// Parses a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Manifest` if the document does not decode.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parses a TOML manifest.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Manifest` if the document does not decode.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Splits the manifest into a catalog and the resolver list.
    #[must_use]
    pub fn into_parts(self) -> (TypeCatalog, Vec<ResolverDescriptor>) {
        (TypeCatalog::from_types(self.types), self.resolvers)
    }
}

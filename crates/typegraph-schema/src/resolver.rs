//! Resolver descriptors.
//!
//! A resolver contributes fields to one root operation type or to one
//! existing type. The engine only consumes these; constructing and wiring the
//! resolver instances behind them belongs to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reflect::{MethodDescriptor, TypeKey};

/// Root operation type names.
pub const QUERY_TYPE: &str = "Query";
pub const MUTATION_TYPE: &str = "Mutation";
pub const SUBSCRIPTION_TYPE: &str = "Subscription";

/// Scope a resolver contributes fields to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ResolverRole {
    Query,
    Mutation,
    Subscription,
    /// Extra fields for an existing type. Each method receives the source
    /// value as its first parameter.
    TypeExtension { source: TypeKey },
}

impl ResolverRole {
    /// Name of the root operation type, if this is a root resolver.
    #[must_use]
    pub fn root_type_name(&self) -> Option<&'static str> {
        match self {
            Self::Query => Some(QUERY_TYPE),
            Self::Mutation => Some(MUTATION_TYPE),
            Self::Subscription => Some(SUBSCRIPTION_TYPE),
            Self::TypeExtension { .. } => None,
        }
    }

    /// Bound source type of a type-extension resolver.
    #[must_use]
    pub fn source(&self) -> Option<&TypeKey> {
        match self {
            Self::TypeExtension { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ResolverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Mutation => f.write_str("mutation"),
            Self::Subscription => f.write_str("subscription"),
            Self::TypeExtension { source } => write!(f, "extension of {source}"),
        }
    }
}

/// One resolver and the methods it exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverDescriptor {
    /// Identifies the resolver in logs and errors.
    pub name: String,
    #[serde(flatten)]
    pub role: ResolverRole,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ResolverDescriptor {
    pub fn new(name: impl Into<String>, role: ResolverRole) -> Self {
        Self {
            name: name.into(),
            role,
            methods: Vec::new(),
        }
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ResolverRole::Query)
    }

    pub fn mutation(name: impl Into<String>) -> Self {
        Self::new(name, ResolverRole::Mutation)
    }

    pub fn subscription(name: impl Into<String>) -> Self {
        Self::new(name, ResolverRole::Subscription)
    }

    pub fn extension(name: impl Into<String>, source: impl Into<TypeKey>) -> Self {
        Self::new(
            name,
            ResolverRole::TypeExtension {
                source: source.into(),
            },
        )
    }

    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_type_names() {
        assert_eq!(ResolverRole::Query.root_type_name(), Some("Query"));
        assert_eq!(ResolverRole::Mutation.root_type_name(), Some("Mutation"));
        assert_eq!(ResolverRole::Subscription.root_type_name(), Some("Subscription"));
        let ext = ResolverRole::TypeExtension {
            source: "app::Car".into(),
        };
        assert_eq!(ext.root_type_name(), None);
        assert_eq!(ext.source().map(TypeKey::as_str), Some("app::Car"));
    }

    #[test]
    fn test_deserialize_extension_resolver() {
        let json = r#"{
            "name": "CarResolver",
            "role": "type_extension",
            "source": "app::Car",
            "methods": [{ "name": "owner", "returns": { "type": "boxed", "kind": "string" } }]
        }"#;
        let resolver: ResolverDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(resolver.name, "CarResolver");
        assert_eq!(resolver.role.source().map(TypeKey::as_str), Some("app::Car"));
        assert_eq!(resolver.methods.len(), 1);
        assert!(resolver.methods[0].is_public());
    }
}

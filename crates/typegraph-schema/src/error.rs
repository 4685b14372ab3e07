//! Error types for schema discovery.
//!
//! Every failure aborts the whole build. Nothing is emitted partially, and
//! each variant carries the type, field or method names needed to locate the
//! offending declaration without the descriptors at hand.

use thiserror::Error;

use crate::schema::TypeKind;

/// Errors that can occur while deriving a schema from type descriptors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A type key was referenced but no descriptor exists for it.
    #[error("Type {0} is not present in the type catalog")]
    UnknownType(String),

    /// A type expression cannot be mapped to any GraphQL type.
    #[error("Can't resolve type {type_name}: {reason}")]
    UnresolvableType { type_name: String, reason: String },

    /// A parameterized shape outside the supported wrapper vocabulary.
    #[error("Parameterized type {shape} is not supported (in {context})")]
    UnsupportedShape { shape: String, context: String },

    /// Async, optional or stream wrappers used where an input type is expected.
    #[error("Wrapper type {shape} can't be used as input (in {context})")]
    WrapperInInput { shape: String, context: String },

    /// An interface-tagged type was requested as an input type.
    #[error("Input type can't be interface: {0}")]
    InterfaceAsInput(String),

    /// The same name was discovered with two different kinds.
    #[error(
        "Type {name} was already discovered with different type kind {previous} (previous) != {requested} (new)"
    )]
    KindConflict {
        name: String,
        previous: TypeKind,
        requested: TypeKind,
    },

    /// An interface definition was emitted twice.
    #[error("Interface {0} can't be defined more than once")]
    DuplicateInterface(String),

    /// Two resolvers were bound to the same interface.
    #[error("Interface {interface} has more than one resolver: {first} and {second}")]
    ConflictingInterfaceResolvers {
        interface: String,
        first: String,
        second: String,
    },

    /// A resolver descriptor cannot be bound to its declared scope.
    #[error("Invalid resolver {resolver}: {reason}")]
    InvalidResolver { resolver: String, reason: String },

    /// An input type ended up with no input values.
    #[error("No fields were discovered for input type {0}")]
    NoInputFields(String),

    /// Default value text that does not fit its target type.
    #[error("Default value {value:?} is invalid for {target}: {reason}")]
    InvalidDefault {
        target: String,
        value: String,
        reason: String,
    },

    /// An object default value names a field the target type does not have.
    #[error("Default value for {target} references unknown field {field}")]
    UnknownDefaultField { target: String, field: String },

    /// An enum default value that is not a declared member.
    #[error("Default value {value} is not a member of enum {target}")]
    UnknownEnumMember { target: String, value: String },

    /// The type manifest could not be decoded.
    #[error("Invalid type manifest: {0}")]
    Manifest(String),

    /// Invalid schema configuration.
    #[error("Invalid schema configuration: {0}")]
    Config(String),

    /// Schema is still being built by another caller.
    #[error("Schema is being built, please retry")]
    SchemaInitializing,

    /// A previous build failed; the message is kept for diagnostics.
    #[error("Failed to build schema: {0}")]
    BuildFailed(String),
}

impl SchemaError {
    /// Creates an unresolvable type error.
    pub fn unresolvable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvableType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid default value error.
    pub fn invalid_default(
        target: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDefault {
            target: target.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid resolver error.
    pub fn invalid_resolver(resolver: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResolver {
            resolver: resolver.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the caller may retry later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SchemaInitializing)
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Manifest(err.to_string())
    }
}

impl From<toml::de::Error> for SchemaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Manifest(err.to_string())
    }
}

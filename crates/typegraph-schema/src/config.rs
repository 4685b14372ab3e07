//! Schema generation configuration.
//!
//! Configuration can be specified in `typegraph.toml` under the `[schema]`
//! section.
//!
//! # Example Configuration
//!
//! ```toml
//! [schema]
//! declare_scalars = true
//! secured_directive = true
//! json_scalar = "JSON"
//! implementation_scope = "app::model"
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static GRAPHQL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("valid name regex"));

/// Returns true if `name` is a valid GraphQL name.
pub fn is_valid_graphql_name(name: &str) -> bool {
    GRAPHQL_NAME.is_match(name)
}

/// Schema generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Emit `scalar` declarations for every non-builtin predeclared scalar.
    /// Default: true
    #[serde(default = "default_declare_scalars")]
    pub declare_scalars: bool,

    /// Emit the `@secured(roles: [String!])` directive declaration.
    /// Default: true
    #[serde(default = "default_secured_directive")]
    pub secured_directive: bool,

    /// Scalar name used for key/value container types.
    /// Default: "JSON"
    #[serde(default = "default_json_scalar")]
    pub json_scalar: String,

    /// Module path searched for interface implementations.
    /// Default: the module of each interface.
    #[serde(default)]
    pub implementation_scope: Option<String>,
}

fn default_declare_scalars() -> bool {
    true
}

fn default_secured_directive() -> bool {
    true
}

fn default_json_scalar() -> String {
    "JSON".to_string()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            declare_scalars: default_declare_scalars(),
            secured_directive: default_secured_directive(),
            json_scalar: default_json_scalar(),
            implementation_scope: None,
        }
    }
}

impl SchemaConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_graphql_name(&self.json_scalar) {
            return Err(format!(
                "schema.json_scalar must be a valid GraphQL name, got {:?}",
                self.json_scalar
            ));
        }
        if self
            .implementation_scope
            .as_deref()
            .is_some_and(|scope| scope.trim().is_empty())
        {
            return Err("schema.implementation_scope must not be empty".into());
        }
        Ok(())
    }

    /// Scope searched for implementations of an interface declared in `module`.
    #[must_use]
    pub fn scope_for<'a>(&'a self, module: Option<&'a str>) -> Option<&'a str> {
        self.implementation_scope.as_deref().or(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchemaConfig::default();
        assert!(config.declare_scalars);
        assert!(config.secured_directive);
        assert_eq!(config.json_scalar, "JSON");
        assert!(config.implementation_scope.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SchemaConfig::default();
        assert!(config.validate().is_ok());

        config.json_scalar = "Json-Map".into();
        assert!(config.validate().is_err());

        config.json_scalar = "JsonMap".into();
        config.implementation_scope = Some("  ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            json_scalar = "Object"
            implementation_scope = "app::model"
        "#;

        let config: SchemaConfig = toml::from_str(toml).unwrap();
        assert!(config.declare_scalars);
        assert_eq!(config.json_scalar, "Object");
        assert_eq!(config.scope_for(Some("app::other")), Some("app::model"));
    }

    #[test]
    fn test_scope_falls_back_to_module() {
        let config = SchemaConfig::default();
        assert_eq!(config.scope_for(Some("app::model")), Some("app::model"));
        assert_eq!(config.scope_for(None), None);
    }
}

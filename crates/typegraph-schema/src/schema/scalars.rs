//! Scalar declarations.
//!
//! Every predeclared scalar outside the GraphQL built-ins needs a `scalar`
//! declaration, as does the JSON scalar used for key/value containers.

use async_graphql_parser::types::{TypeDefinition, TypeKind as AstTypeKind};

use super::ast::{description, name};
use super::classifier::{is_builtin_scalar, scalar_name};
use crate::reflect::ValueKind;

const VALUE_KINDS: &[ValueKind] = &[
    ValueKind::Int,
    ValueKind::Short,
    ValueKind::Long,
    ValueKind::Byte,
    ValueKind::Char,
    ValueKind::Float,
    ValueKind::Double,
    ValueKind::Boolean,
    ValueKind::String,
    ValueKind::BigDecimal,
    ValueKind::BigInteger,
    ValueKind::Date,
    ValueKind::DateTime,
    ValueKind::Timestamp,
];

fn scalar_description(scalar: &str) -> Option<&'static str> {
    match scalar {
        "Long" => Some("64-bit signed integer"),
        "Short" => Some("16-bit signed integer"),
        "Byte" => Some("8-bit signed integer"),
        "Char" => Some("Single character"),
        "BigDecimal" => Some("Arbitrary-precision decimal number"),
        "BigInteger" => Some("Arbitrary-precision integer"),
        "Date" => Some("Calendar date"),
        "DateTime" => Some("Date and time of day"),
        "Timestamp" => Some("Point in time"),
        _ => None,
    }
}

/// Names of the scalars that need a declaration, in table order, followed by
/// the JSON scalar.
pub fn custom_scalar_names(json_scalar: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for kind in VALUE_KINDS {
        let scalar = scalar_name(*kind);
        if !is_builtin_scalar(scalar) && !names.contains(&scalar) {
            names.push(scalar);
        }
    }
    if !is_builtin_scalar(json_scalar) && !names.contains(&json_scalar) {
        names.push(json_scalar);
    }
    names
}

/// `scalar` definitions for every custom scalar.
pub fn scalar_definitions(json_scalar: &str) -> Vec<TypeDefinition> {
    custom_scalar_names(json_scalar)
        .into_iter()
        .map(|scalar| TypeDefinition {
            extend: false,
            description: description(scalar_description(scalar)),
            name: name(scalar),
            directives: Vec::new(),
            kind: AstTypeKind::Scalar,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_scalar_names() {
        let names = custom_scalar_names("JSON");
        assert_eq!(
            names,
            [
                "Short",
                "Long",
                "Byte",
                "Char",
                "BigDecimal",
                "BigInteger",
                "Date",
                "DateTime",
                "Timestamp",
                "JSON",
            ]
        );
    }

    #[test]
    fn test_builtin_json_scalar_is_not_declared() {
        let names = custom_scalar_names("String");
        assert!(!names.contains(&"String"));
    }

    #[test]
    fn test_scalar_definitions() {
        let definitions = scalar_definitions("Object");
        assert_eq!(definitions.len(), 10);
        assert!(definitions.iter().all(|d| matches!(d.kind, AstTypeKind::Scalar)));
        assert_eq!(definitions[9].name.node.as_str(), "Object");
        assert!(definitions[9].description.is_none());
    }
}

//! Type classification.
//!
//! Maps a type expression to one of a closed set of shapes. Well-known value
//! types map to predeclared scalars through a fixed table; parameterized
//! containers are recognised by their [`Shape`]; everything else must be a
//! structural type known to the introspector.

use crate::error::SchemaError;
use crate::reflect::{Shape, TypeDescriptor, TypeExpr, TypeIntrospector, TypeUse, ValueKind};
use crate::Result;

/// Scalars every GraphQL implementation provides.
pub const BUILTIN_SCALARS: &[&str] = &["ID", "String", "Int", "Float", "Boolean"];

/// Predeclared scalar name for a value kind.
#[must_use]
pub fn scalar_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Int => "Int",
        ValueKind::Short => "Short",
        ValueKind::Long => "Long",
        ValueKind::Byte => "Byte",
        ValueKind::Char => "Char",
        ValueKind::Float | ValueKind::Double => "Float",
        ValueKind::Boolean => "Boolean",
        ValueKind::String => "String",
        ValueKind::BigDecimal => "BigDecimal",
        ValueKind::BigInteger => "BigInteger",
        ValueKind::Date => "Date",
        ValueKind::DateTime => "DateTime",
        ValueKind::Timestamp => "Timestamp",
    }
}

/// Returns true for scalars that need no `scalar` declaration.
#[must_use]
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Result of classifying a type expression.
#[derive(Debug, Clone, Copy)]
pub enum Classification<'a> {
    /// Predeclared scalar; `non_null` is set for the primitive spelling.
    Scalar {
        kind: ValueKind,
        name: &'static str,
        non_null: bool,
    },
    Enum(&'a TypeDescriptor),
    /// Single-element sequence; holds the element type.
    List(&'a TypeUse),
    /// Key/value container, always the JSON scalar.
    Map,
    /// Future or optional container; holds the wrapped type.
    AsyncWrapper(&'a TypeUse),
    /// Stream of values; holds the element type.
    Publisher(&'a TypeUse),
    /// Structural type that needs full discovery.
    Named(&'a TypeDescriptor),
}

/// Classifies a type use.
///
/// # Errors
///
/// Fails for the universal root type, raw containers, unresolved type
/// variables, unknown type keys and unsupported parameterized shapes.
pub fn classify<'a>(ty: &'a TypeUse, types: &'a dyn TypeIntrospector) -> Result<Classification<'a>> {
    match &ty.expr {
        TypeExpr::Primitive { kind } => Ok(Classification::Scalar {
            kind: *kind,
            name: scalar_name(*kind),
            non_null: true,
        }),
        TypeExpr::Boxed { kind } => Ok(Classification::Scalar {
            kind: *kind,
            name: scalar_name(*kind),
            non_null: false,
        }),
        TypeExpr::Named { key } => {
            let desc = types.require(key)?;
            if desc.is_enum() {
                Ok(Classification::Enum(desc))
            } else {
                Ok(Classification::Named(desc))
            }
        }
        TypeExpr::Generic { shape, args } => {
            if *shape == Shape::Map {
                return Ok(Classification::Map);
            }
            let [element] = args.as_slice() else {
                return Err(SchemaError::UnsupportedShape {
                    shape: shape.name().to_string(),
                    context: format!("{} type arguments in {}", args.len(), ty.expr.display_name()),
                });
            };
            match shape {
                Shape::List => Ok(Classification::List(element)),
                Shape::Future | Shape::Optional => Ok(Classification::AsyncWrapper(element)),
                Shape::Publisher => Ok(Classification::Publisher(element)),
                Shape::Map | Shape::Other(_) => Err(SchemaError::UnsupportedShape {
                    shape: shape.name().to_string(),
                    context: ty.expr.display_name(),
                }),
            }
        }
        TypeExpr::Param { name } => Err(SchemaError::unresolvable(
            name,
            "type variable is not bound to an actual type",
        )),
        TypeExpr::Any => Err(SchemaError::unresolvable("Any", "the universal root type has no schema shape")),
        TypeExpr::RawMap => Err(SchemaError::unresolvable("Map", "map without type arguments")),
        TypeExpr::RawCollection => Err(SchemaError::unresolvable(
            "Collection",
            "collection without type arguments",
        )),
        TypeExpr::Context => Err(SchemaError::unresolvable(
            "Context",
            "execution context is only allowed as the trailing parameter",
        )),
    }
}

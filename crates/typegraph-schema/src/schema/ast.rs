//! Small constructors for SDL AST nodes.

use async_graphql_parser::types::{BaseType, Type};
use async_graphql_parser::{Pos, Positioned};
use async_graphql_value::Name;

/// Wraps a node with an empty position; generated nodes have no source.
pub(crate) fn pos<T>(node: T) -> Positioned<T> {
    Positioned::new(node, Pos::default())
}

pub(crate) fn name(value: &str) -> Positioned<Name> {
    pos(Name::new(value))
}

/// A nullable reference to a named type.
pub(crate) fn named_type(type_name: &str) -> Type {
    Type {
        base: BaseType::Named(Name::new(type_name)),
        nullable: true,
    }
}

/// A nullable list of `element`.
pub(crate) fn list_type(element: Type) -> Type {
    Type {
        base: BaseType::List(Box::new(element)),
        nullable: true,
    }
}

/// Marks a type non-null. Applying it twice has no further effect.
pub(crate) fn non_null(ty: Type) -> Type {
    Type {
        nullable: false,
        ..ty
    }
}

/// Applies [`non_null`] when `not_null` is set.
pub(crate) fn wrap_non_null(ty: Type, not_null: bool) -> Type {
    if not_null { non_null(ty) } else { ty }
}

pub(crate) fn description(text: Option<&str>) -> Option<Positioned<String>> {
    text.map(|t| pos(t.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_null_is_idempotent() {
        let ty = list_type(named_type("String"));
        let once = non_null(ty.clone());
        let twice = non_null(non_null(ty));
        assert_eq!(once, twice);
        assert_eq!(once.to_string(), "[String]!");
    }

    #[test]
    fn test_wrap_non_null() {
        assert_eq!(wrap_non_null(named_type("Int"), false).to_string(), "Int");
        assert_eq!(wrap_non_null(named_type("Int"), true).to_string(), "Int!");
    }
}

//! Schema directives.
//!
//! - `@secured(roles: [String!])` - roles required to resolve a field; the
//!   serving layer enforces it, the schema only declares and applies it
//! - `@deprecated(reason: String)` - built-in deprecation marker

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    ConstDirective, DirectiveDefinition, DirectiveLocation, InputValueDefinition,
};
use async_graphql_value::ConstValue;

use super::ast::{list_type, name, named_type, non_null, pos};
use super::metadata::Metadata;

/// Directive name constants.
pub mod names {
    pub const SECURED: &str = "secured";
    pub const SECURED_ROLES: &str = "roles";
    pub const DEPRECATED: &str = "deprecated";
    pub const DEPRECATED_REASON: &str = "reason";
}

/// `directive @secured(roles: [String!]) on FIELD_DEFINITION`
pub fn secured_directive_definition() -> DirectiveDefinition {
    DirectiveDefinition {
        description: None,
        name: name(names::SECURED),
        arguments: vec![pos(InputValueDefinition {
            description: None,
            name: name(names::SECURED_ROLES),
            ty: pos(list_type(non_null(named_type("String")))),
            default_value: None,
            directives: Vec::new(),
        })],
        is_repeatable: false,
        locations: vec![pos(DirectiveLocation::FieldDefinition)],
    }
}

/// `@deprecated`, with a reason when one is given.
pub fn deprecated(reason: Option<&str>) -> ConstDirective {
    ConstDirective {
        name: name(names::DEPRECATED),
        arguments: reason
            .map(|r| {
                vec![(
                    name(names::DEPRECATED_REASON),
                    pos(ConstValue::String(r.to_string())),
                )]
            })
            .unwrap_or_default(),
    }
}

/// `@secured(roles: [...])`
pub fn secured(roles: &[String]) -> ConstDirective {
    let roles = roles
        .iter()
        .map(|role| ConstValue::String(role.clone()))
        .collect();
    ConstDirective {
        name: name(names::SECURED),
        arguments: vec![(name(names::SECURED_ROLES), pos(ConstValue::List(roles)))],
    }
}

/// Directives a field or input value carries for its metadata.
pub fn field_directives(meta: &Metadata) -> Vec<Positioned<ConstDirective>> {
    let mut directives = Vec::new();
    if let Some(deprecation) = &meta.deprecated {
        directives.push(pos(deprecated(deprecation.reason.as_deref())));
    }
    if let Some(roles) = &meta.roles {
        directives.push(pos(secured(roles)));
    }
    directives
}

/// Directives an argument or input value carries; `@secured` applies to
/// output fields only.
pub fn input_directives(meta: &Metadata) -> Vec<Positioned<ConstDirective>> {
    meta.deprecated
        .iter()
        .map(|deprecation| pos(deprecated(deprecation.reason.as_deref())))
        .collect()
}

//! SDL rendering.
//!
//! Definitions are rendered in the order given, separated by a blank line.
//! Types without fields are rendered without braces.

use std::fmt::{self, Display, Write};

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    ConstDirective, DirectiveDefinition, EnumValueDefinition, FieldDefinition,
    InputValueDefinition, SchemaDefinition, TypeDefinition, TypeKind, TypeSystemDefinition,
};
use async_graphql_value::Name;
use heck::ToShoutySnakeCase;

const INDENT: &str = "    ";

/// Renders definitions as SDL text.
#[must_use]
pub fn render_sdl(definitions: &[TypeSystemDefinition]) -> String {
    let mut sdl = String::new();
    for (i, definition) in definitions.iter().enumerate() {
        if i > 0 {
            sdl.push('\n');
        }
        sdl.push_str(&DefinitionDisplay(definition).to_string());
    }
    sdl
}

fn write_quoted(sdl: &mut impl Write, s: &str) -> fmt::Result {
    sdl.write_char('"')?;
    for c in s.chars() {
        match c {
            '\r' => sdl.write_str("\\r"),
            '\n' => sdl.write_str("\\n"),
            '\t' => sdl.write_str("\\t"),
            '\\' => sdl.write_str("\\\\"),
            '"' => sdl.write_str("\\\""),
            c if c.is_control() => write!(sdl, "\\u{:04x}", c as u32),
            c => sdl.write_char(c),
        }?;
    }
    sdl.write_char('"')
}

fn write_block(
    f: &mut fmt::Formatter<'_>,
    inner: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    f.write_str(" {\n")?;
    inner(f)?;
    f.write_str("}\n")
}

/// Block description, one line per source line.
struct Description<'a>(&'a str, &'a str);

impl Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Description(description, indentation) = self;

        writeln!(f, r#"{indentation}""""#)?;
        for line in description.lines() {
            let line = line.trim_end().replace(r#"""""#, r#"\""""#);
            if line.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, "{indentation}{line}")?;
            }
        }
        writeln!(f, r#"{indentation}""""#)
    }
}

struct Directives<'a>(&'a [Positioned<ConstDirective>]);

impl Display for Directives<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for directive in self.0 {
            let directive = &directive.node;
            write!(f, " @{}", directive.name.node)?;
            if directive.arguments.is_empty() {
                continue;
            }
            f.write_char('(')?;
            let mut arguments = directive.arguments.iter().peekable();
            while let Some((name, value)) = arguments.next() {
                write!(f, "{}: {}", name.node, value.node)?;
                if arguments.peek().is_some() {
                    f.write_str(", ")?;
                }
            }
            f.write_char(')')?;
        }
        Ok(())
    }
}

struct Arguments<'a>(&'a [Positioned<InputValueDefinition>]);

impl Display for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_char('(')?;
        let mut arguments = self.0.iter().peekable();
        while let Some(argument) = arguments.next() {
            if let Some(description) = &argument.node.description {
                write_quoted(f, &description.node)?;
                f.write_char(' ')?;
            }
            InputValue(&argument.node).fmt(f)?;
            if arguments.peek().is_some() {
                f.write_str(", ")?;
            }
        }
        f.write_char(')')
    }
}

/// `name: Type = default @directives`, without description.
struct InputValue<'a>(&'a InputValueDefinition);

impl Display for InputValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        write!(f, "{}: {}", value.name.node, value.ty.node)?;
        if let Some(default) = &value.default_value {
            write!(f, " = {}", default.node)?;
        }
        Directives(&value.directives).fmt(f)
    }
}

struct Implements<'a>(&'a [Positioned<Name>]);

impl Display for Implements<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut interfaces = self.0.iter().peekable();
        if interfaces.peek().is_none() {
            return Ok(());
        }
        f.write_str(" implements ")?;
        while let Some(interface) = interfaces.next() {
            f.write_str(interface.node.as_str())?;
            if interfaces.peek().is_some() {
                f.write_str(" & ")?;
            }
        }
        Ok(())
    }
}

fn write_description(
    f: &mut fmt::Formatter<'_>,
    description: Option<&Positioned<String>>,
    indentation: &str,
) -> fmt::Result {
    match description {
        Some(description) => Description(&description.node, indentation).fmt(f),
        None => Ok(()),
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Positioned<FieldDefinition>]) -> fmt::Result {
    if fields.is_empty() {
        return writeln!(f);
    }
    write_block(f, |f| {
        for field in fields {
            let field = &field.node;
            write_description(f, field.description.as_ref(), INDENT)?;
            writeln!(
                f,
                "{INDENT}{}{}: {}{}",
                field.name.node,
                Arguments(&field.arguments),
                field.ty.node,
                Directives(&field.directives)
            )?;
        }
        Ok(())
    })
}

fn write_input_fields(
    f: &mut fmt::Formatter<'_>,
    fields: &[Positioned<InputValueDefinition>],
) -> fmt::Result {
    if fields.is_empty() {
        return writeln!(f);
    }
    write_block(f, |f| {
        for field in fields {
            write_description(f, field.node.description.as_ref(), INDENT)?;
            writeln!(f, "{INDENT}{}", InputValue(&field.node))?;
        }
        Ok(())
    })
}

fn write_enum_values(
    f: &mut fmt::Formatter<'_>,
    values: &[Positioned<EnumValueDefinition>],
) -> fmt::Result {
    if values.is_empty() {
        return writeln!(f);
    }
    write_block(f, |f| {
        for value in values {
            let value = &value.node;
            write_description(f, value.description.as_ref(), INDENT)?;
            writeln!(f, "{INDENT}{}{}", value.value.node, Directives(&value.directives))?;
        }
        Ok(())
    })
}

struct DefinitionDisplay<'a>(&'a TypeSystemDefinition);

impl Display for DefinitionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            TypeSystemDefinition::Schema(schema) => fmt_schema(f, &schema.node),
            TypeSystemDefinition::Directive(directive) => fmt_directive(f, &directive.node),
            TypeSystemDefinition::Type(ty) => fmt_type(f, &ty.node),
        }
    }
}

fn fmt_schema(f: &mut fmt::Formatter<'_>, schema: &SchemaDefinition) -> fmt::Result {
    if schema.extend {
        f.write_str("extend ")?;
    }
    write!(f, "schema{}", Directives(&schema.directives))?;
    write_block(f, |f| {
        let roots = [
            ("query", &schema.query),
            ("mutation", &schema.mutation),
            ("subscription", &schema.subscription),
        ];
        for (operation, root) in roots {
            if let Some(root) = root {
                writeln!(f, "{INDENT}{operation}: {}", root.node)?;
            }
        }
        Ok(())
    })
}

fn fmt_directive(f: &mut fmt::Formatter<'_>, directive: &DirectiveDefinition) -> fmt::Result {
    write_description(f, directive.description.as_ref(), "")?;
    write!(
        f,
        "directive @{}{}",
        directive.name.node,
        Arguments(&directive.arguments)
    )?;
    if directive.is_repeatable {
        f.write_str(" repeatable")?;
    }
    let locations = directive
        .locations
        .iter()
        .map(|location| format!("{:?}", location.node).to_shouty_snake_case())
        .collect::<Vec<_>>();
    writeln!(f, " on {}", locations.join(" | "))
}

fn fmt_type(f: &mut fmt::Formatter<'_>, ty: &TypeDefinition) -> fmt::Result {
    write_description(f, ty.description.as_ref(), "")?;
    if ty.extend {
        f.write_str("extend ")?;
    }
    let name = &ty.name.node;
    let directives = Directives(&ty.directives);
    match &ty.kind {
        TypeKind::Scalar => writeln!(f, "scalar {name}{directives}"),
        TypeKind::Object(object) => {
            write!(f, "type {name}{}{directives}", Implements(&object.implements))?;
            write_fields(f, &object.fields)
        }
        TypeKind::Interface(interface) => {
            write!(f, "interface {name}{}{directives}", Implements(&interface.implements))?;
            write_fields(f, &interface.fields)
        }
        TypeKind::Union(union) => {
            write!(f, "union {name}{directives}")?;
            let members = union
                .members
                .iter()
                .map(|member| member.node.as_str())
                .collect::<Vec<_>>();
            if members.is_empty() {
                writeln!(f)
            } else {
                writeln!(f, " = {}", members.join(" | "))
            }
        }
        TypeKind::Enum(enumeration) => {
            write!(f, "enum {name}{directives}")?;
            write_enum_values(f, &enumeration.values)
        }
        TypeKind::InputObject(input) => {
            write!(f, "input {name}{directives}")?;
            write_input_fields(f, &input.fields)
        }
    }
}

#[cfg(test)]
mod tests {
    use async_graphql_parser::types::{ObjectType, TypeKind as AstTypeKind};

    use super::*;
    use crate::schema::ast::{description, list_type, name, named_type, non_null, pos};
    use crate::schema::directives::{deprecated, secured_directive_definition};

    fn object(type_name: &str, extend: bool, fields: Vec<FieldDefinition>) -> TypeSystemDefinition {
        TypeSystemDefinition::Type(pos(TypeDefinition {
            extend,
            description: None,
            name: name(type_name),
            directives: Vec::new(),
            kind: AstTypeKind::Object(ObjectType {
                implements: Vec::new(),
                fields: fields.into_iter().map(pos).collect(),
            }),
        }))
    }

    fn field(field_name: &str, ty: async_graphql_parser::types::Type) -> FieldDefinition {
        FieldDefinition {
            description: None,
            name: name(field_name),
            arguments: Vec::new(),
            ty: pos(ty),
            directives: Vec::new(),
        }
    }

    #[test]
    fn test_render_object_and_extension() {
        let definitions = vec![
            object("Query", false, vec![field("hero", named_type("Character"))]),
            object("Query", true, vec![field("droids", non_null(list_type(named_type("Droid"))))]),
        ];
        assert_eq!(
            render_sdl(&definitions),
            "type Query {\n    hero: Character\n}\n\nextend type Query {\n    droids: [Droid]!\n}\n"
        );
    }

    #[test]
    fn test_render_empty_object_without_braces() {
        let sdl = render_sdl(&[object("Mutation", false, Vec::new())]);
        assert_eq!(sdl, "type Mutation\n");
    }

    #[test]
    fn test_render_arguments_and_directives() {
        let mut hero = field("hero", named_type("Character"));
        hero.arguments.push(pos(InputValueDefinition {
            description: description(Some("Filter by \"episode\"")),
            name: name("episode"),
            ty: pos(named_type("Episode")),
            default_value: Some(pos(async_graphql_value::ConstValue::Enum(
                Name::new("NEWHOPE"),
            ))),
            directives: Vec::new(),
        }));
        hero.directives.push(pos(deprecated(Some("use characters"))));
        let sdl = render_sdl(&[object("Query", false, vec![hero])]);
        assert!(sdl.contains(
            r#"hero("Filter by \"episode\"" episode: Episode = NEWHOPE): Character @deprecated(reason: "use characters")"#
        ));
    }

    #[test]
    fn test_render_directive_definition() {
        let definition = TypeSystemDefinition::Directive(pos(secured_directive_definition()));
        assert_eq!(
            render_sdl(&[definition]),
            "directive @secured(roles: [String!]) on FIELD_DEFINITION\n"
        );
    }

    #[test]
    fn test_render_description_block() {
        let definition = TypeSystemDefinition::Type(pos(TypeDefinition {
            extend: false,
            description: description(Some("A droid.\nBuilt for service.")),
            name: name("Droid"),
            directives: Vec::new(),
            kind: AstTypeKind::Scalar,
        }));
        assert_eq!(
            render_sdl(&[definition]),
            "\"\"\"\nA droid.\nBuilt for service.\n\"\"\"\nscalar Droid\n"
        );
    }

    #[test]
    fn test_rendered_sdl_parses() {
        let definitions = vec![
            TypeSystemDefinition::Directive(pos(secured_directive_definition())),
            object("Query", false, vec![field("name", non_null(named_type("String")))]),
        ];
        let sdl = render_sdl(&definitions);
        assert!(async_graphql_parser::parse_schema(&sdl).is_ok(), "{sdl}");
    }

    #[test]
    fn test_directive_locations_are_shouty() {
        assert_eq!("FieldDefinition".to_shouty_snake_case(), "FIELD_DEFINITION");
        assert_eq!("InputFieldDefinition".to_shouty_snake_case(), "INPUT_FIELD_DEFINITION");
    }
}

//! Field, argument and type reference construction.

use async_graphql_parser::types::{BaseType, FieldDefinition, InputValueDefinition, Type};
use tracing::trace;

use super::ast::{description, list_type, name, named_type, pos, wrap_non_null};
use super::classifier::{Classification, classify};
use super::defaults::DefaultValueCompiler;
use super::directives::{field_directives, input_directives};
use super::document::FieldShape;
use super::factory::{BuiltField, DefinitionFactory};
use super::metadata::{Metadata, MetadataResolver, has_not_null};
use super::methods::{InputField, normalize_get_name};
use super::TypeKind;
use crate::error::SchemaError;
use crate::reflect::{MethodDescriptor, ParamDescriptor, TypeExpr, TypeUse};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Output,
    Input,
}

impl Direction {
    fn kind(self) -> TypeKind {
        match self {
            Self::Output => TypeKind::Object,
            Self::Input => TypeKind::Input,
        }
    }
}

impl DefinitionFactory<'_> {
    /// Builds the field backed by `method`, or `None` if metadata hides it.
    ///
    /// A trailing execution-context parameter is never exposed. With
    /// `skip_first` set, the first remaining parameter is the source value of
    /// a type extension and is not exposed either.
    pub(super) fn build_field(
        &mut self,
        method: &MethodDescriptor,
        skip_first: bool,
        metadata: &MetadataResolver<'_>,
        source: &str,
    ) -> Result<Option<BuiltField>> {
        let field_name = normalize_get_name(&method.name);
        let meta = metadata.for_method(method, &field_name);
        if meta.ignored {
            trace!(source = %source, field = %field_name, "Ignoring field");
            return Ok(None);
        }
        let Some(returns) = &method.returns else {
            return Ok(None);
        };
        let field_name = meta.name_override.clone().unwrap_or(field_name);
        let context = format!("{source}.{}", method.name);

        let (ty, shape) = self.output_type(returns, meta.not_null, &context)?;

        let mut params = method.params.as_slice();
        if let [rest @ .., last] = params {
            if matches!(last.ty.expr, TypeExpr::Context) {
                params = rest;
            }
        }
        if skip_first {
            params = params.get(1..).unwrap_or_default();
        }
        let arguments = params
            .iter()
            .map(|param| self.build_argument(param, metadata.for_param(param), &context).map(pos))
            .collect::<Result<Vec<_>>>()?;

        trace!(source = %source, field = %field_name, ty = %ty, "Built field");
        Ok(Some(BuiltField {
            definition: FieldDefinition {
                description: description(meta.description.as_deref()),
                name: name(&field_name),
                arguments,
                ty: pos(ty),
                directives: field_directives(&meta),
            },
            source: source.to_string(),
            method: method.name.clone(),
            shape,
        }))
    }

    /// Builds an input value of an input object type.
    pub(super) fn build_input_value(
        &mut self,
        field: &InputField<'_>,
        type_name: &str,
    ) -> Result<InputValueDefinition> {
        let context = format!("{type_name}.{}", field.name);
        let ty = self.input_type(&field.ty, field.meta.not_null, &context)?;
        Ok(InputValueDefinition {
            description: description(field.meta.description.as_deref()),
            name: name(&field.name),
            ty: pos(ty),
            default_value: self.default_value(&field.meta, &field.ty)?.map(pos),
            directives: input_directives(&field.meta),
        })
    }

    fn build_argument(
        &mut self,
        param: &ParamDescriptor,
        meta: Metadata,
        context: &str,
    ) -> Result<InputValueDefinition> {
        let arg_name = meta.name_override.clone().unwrap_or_else(|| param.name.clone());
        let context = format!("{context}({arg_name})");
        let ty = self.input_type(&param.ty, meta.not_null, &context)?;
        Ok(InputValueDefinition {
            description: description(meta.description.as_deref()),
            name: name(&arg_name),
            ty: pos(ty),
            default_value: self.default_value(&meta, &param.ty)?.map(pos),
            directives: input_directives(&meta),
        })
    }

    fn default_value(
        &self,
        meta: &Metadata,
        target: &TypeUse,
    ) -> Result<Option<async_graphql_value::ConstValue>> {
        meta.default
            .as_ref()
            .map(|spec| DefaultValueCompiler::new(self.types).compile(spec, target))
            .transpose()
    }

    /// Output type of a field. One top-level future or optional wrapper is
    /// unwrapped; a top-level publisher marks the field as a stream.
    fn output_type(
        &mut self,
        ty: &TypeUse,
        not_null: bool,
        context: &str,
    ) -> Result<(Type, FieldShape)> {
        let types = self.types;
        let mut not_null = not_null || has_not_null(&ty.tags);
        let mut inner = ty;
        if let Classification::AsyncWrapper(wrapped) = classify(inner, types)? {
            inner = wrapped;
        }
        let stream = matches!(classify(inner, types)?, Classification::Publisher(_));
        if stream {
            not_null |= has_not_null(&inner.tags);
        }

        let converted = self.convert(inner, Direction::Output, not_null, context)?;
        let shape = if stream {
            FieldShape::Stream
        } else if matches!(converted.base, BaseType::List(_)) {
            FieldShape::List
        } else {
            FieldShape::Plain
        };
        Ok((converted, shape))
    }

    fn input_type(&mut self, ty: &TypeUse, not_null: bool, context: &str) -> Result<Type> {
        self.convert(ty, Direction::Input, not_null, context)
    }

    /// Converts a type use to a type reference, discovering the structural
    /// types it names. Non-null applies when `not_null` is set or the use
    /// itself carries a not-null tag.
    fn convert(
        &mut self,
        ty: &TypeUse,
        direction: Direction,
        not_null: bool,
        context: &str,
    ) -> Result<Type> {
        let types = self.types;
        let not_null = not_null || has_not_null(&ty.tags);
        let converted = match classify(ty, types)? {
            Classification::Publisher(element) if direction == Direction::Output => {
                return self.convert(element, direction, not_null, context);
            }
            Classification::Publisher(_) | Classification::AsyncWrapper(_) => {
                let shape = ty.expr.display_name();
                return Err(match direction {
                    Direction::Input => SchemaError::WrapperInInput {
                        shape,
                        context: context.to_string(),
                    },
                    Direction::Output => SchemaError::UnsupportedShape {
                        shape,
                        context: format!("nested wrapper in {context}"),
                    },
                });
            }
            Classification::List(element) => {
                list_type(self.convert(element, direction, false, context)?)
            }
            Classification::Map => named_type(&self.config.json_scalar),
            Classification::Scalar { name, non_null, .. } => {
                wrap_non_null(named_type(name), non_null)
            }
            Classification::Enum(desc) | Classification::Named(desc) => {
                let type_name = self.discover(&desc.key, direction.kind())?;
                named_type(&type_name)
            }
        };
        Ok(wrap_non_null(converted, not_null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;
    use crate::reflect::{Shape, Tag, TypeCatalog, TypeDescriptor, ValueKind};

    fn catalog() -> TypeCatalog {
        TypeCatalog::from_types([
            TypeDescriptor::class("app::Droid")
                .method(MethodDescriptor::new("getName").returns(TypeUse::boxed(ValueKind::String))),
            TypeDescriptor::class("app::Filter").method(
                MethodDescriptor::new("setLimit").param("limit", TypeUse::primitive(ValueKind::Int)),
            ),
        ])
    }

    fn field(factory: &mut DefinitionFactory<'_>, method: MethodDescriptor) -> BuiltField {
        factory
            .build_field(&method, false, &MetadataResolver::detached(), "Test")
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_nested_list_type() {
        let types = catalog();
        let config = SchemaConfig::default();
        let mut factory = DefinitionFactory::new(&types, &config);
        let inner = TypeUse::list(TypeUse::boxed(ValueKind::String)).not_null();
        let method = MethodDescriptor::new("getMatrix").returns(TypeUse::list(inner).not_null());
        let built = field(&mut factory, method);
        assert_eq!(built.definition.name.node.as_str(), "matrix");
        assert_eq!(built.definition.ty.node.to_string(), "[[String]!]!");
        assert_eq!(built.shape, FieldShape::List);
    }

    #[test]
    fn test_future_is_unwrapped() {
        let types = catalog();
        let config = SchemaConfig::default();
        let mut factory = DefinitionFactory::new(&types, &config);
        let returns = TypeUse::generic(Shape::Future, vec![TypeUse::primitive(ValueKind::Long)]);
        let built = field(&mut factory, MethodDescriptor::new("count").returns(returns));
        assert_eq!(built.definition.ty.node.to_string(), "Long!");
        assert_eq!(built.shape, FieldShape::Plain);
    }

    #[test]
    fn test_publisher_marks_stream() {
        let types = catalog();
        let config = SchemaConfig::default();
        let mut factory = DefinitionFactory::new(&types, &config);
        let returns = TypeUse::generic(Shape::Publisher, vec![TypeUse::named("app::Droid")]);
        let built = field(&mut factory, MethodDescriptor::new("droids").returns(returns));
        assert_eq!(built.definition.ty.node.to_string(), "Droid");
        assert_eq!(built.shape, FieldShape::Stream);
        assert!(factory.registry().get("Droid").is_some());
    }

    #[test]
    fn test_map_is_json_scalar() {
        let types = catalog();
        let config = SchemaConfig::default();
        let mut factory = DefinitionFactory::new(&types, &config);
        let returns = TypeUse::generic(
            Shape::Map,
            vec![TypeUse::boxed(ValueKind::String), TypeUse::boxed(ValueKind::Int)],
        );
        let built = field(&mut factory, MethodDescriptor::new("getAttributes").returns(returns));
        assert_eq!(built.definition.ty.node.to_string(), config.json_scalar);
    }

    #[test]
    fn test_context_parameter_is_dropped() {
        let types = catalog();
        let config = SchemaConfig::default();
        let mut factory = DefinitionFactory::new(&types, &config);
        let method = MethodDescriptor::new("droid")
            .param("id", TypeUse::boxed(ValueKind::String).not_null())
            .param("env", TypeUse::new(TypeExpr::Context))
            .returns(TypeUse::named("app::Droid"));
        let built = field(&mut factory, method);
        let args: Vec<String> = built
            .definition
            .arguments
            .iter()
            .map(|a| format!("{}: {}", a.node.name.node, a.node.ty.node))
            .collect();
        assert_eq!(args, ["id: String!"]);
    }

    #[test]
    fn test_input_argument_discovers_input_type() {
        let types = catalog();
        let config = SchemaConfig::default();
        let mut factory = DefinitionFactory::new(&types, &config);
        let method = MethodDescriptor::new("droids")
            .param("filter", TypeUse::named("app::Filter"))
            .returns(TypeUse::list(TypeUse::named("app::Droid")));
        field(&mut factory, method);
        assert_eq!(factory.registry().get("Filter").unwrap().kind, TypeKind::Input);
        assert_eq!(factory.registry().get("Droid").unwrap().kind, TypeKind::Object);
    }

    #[test]
    fn test_wrapper_argument_fails() {
        let types = catalog();
        let config = SchemaConfig::default();
        let mut factory = DefinitionFactory::new(&types, &config);
        let method = MethodDescriptor::new("find")
            .param(
                "name",
                TypeUse::generic(Shape::Optional, vec![TypeUse::boxed(ValueKind::String)]),
            )
            .returns(TypeUse::boxed(ValueKind::String));
        let err = factory
            .build_field(&method, false, &MetadataResolver::detached(), "Test")
            .unwrap_err();
        assert!(matches!(err, SchemaError::WrapperInInput { .. }));
    }

    #[test]
    fn test_argument_default_and_deprecation() {
        let types = catalog();
        let config = SchemaConfig::default();
        let mut factory = DefinitionFactory::new(&types, &config);
        let limit = ParamDescriptor::new("limit", TypeUse::primitive(ValueKind::Int))
            .tag(Tag::default_value("10"))
            .tag(Tag::Deprecated { reason: None });
        let method = MethodDescriptor::new("droids")
            .with_param(limit)
            .returns(TypeUse::list(TypeUse::named("app::Droid")));
        let built = field(&mut factory, method);
        let arg = &built.definition.arguments[0].node;
        assert_eq!(arg.ty.node.to_string(), "Int!");
        assert_eq!(
            arg.default_value.as_ref().map(|v| v.node.to_string()),
            Some("10".to_string())
        );
        assert_eq!(arg.directives.len(), 1);
    }
}

//! Default value compilation.
//!
//! Turns the text of a default-value tag into a GraphQL literal matching the
//! target type:
//!
//! - scalars parse the text with the scalar's own grammar
//! - enums require an exact member name
//! - lists parse the text as a JSON array and compile each element
//! - input objects parse the text as a JSON object; every key must name an
//!   input value of the target and every value must fit that input value's
//!   type, otherwise nothing is produced
//!
//! Recursion follows the literal, never the target type graph, so cyclic
//! input types cannot cause unbounded work.

use async_graphql_value::{ConstValue, Name};
use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::SchemaError;
use crate::reflect::{TypeDescriptor, TypeExpr, TypeIntrospector, TypeUse, ValueKind};
use crate::schema::classifier::{Classification, classify};
use crate::schema::metadata::{DefaultSpec, has_not_null};
use crate::schema::methods::input_fields;
use crate::Result;

/// Compiles default value specifications into literals.
pub struct DefaultValueCompiler<'a> {
    types: &'a dyn TypeIntrospector,
}

impl<'a> DefaultValueCompiler<'a> {
    pub fn new(types: &'a dyn TypeIntrospector) -> Self {
        Self { types }
    }

    /// Compiles a default specification against `target`.
    ///
    /// The null sentinel yields the null literal whatever the target is.
    ///
    /// # Errors
    ///
    /// Fails if the text does not parse against the target's shape, names an
    /// unknown enum member or references an unknown input field.
    pub fn compile(&self, spec: &DefaultSpec, target: &TypeUse) -> Result<ConstValue> {
        match spec {
            DefaultSpec::Null => Ok(ConstValue::Null),
            DefaultSpec::Text(text) => self.compile_text(text, target),
        }
    }

    /// Compiles default value text against `target`.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn compile_text(&self, text: &str, target: &TypeUse) -> Result<ConstValue> {
        let invalid = |reason: &str| SchemaError::invalid_default(target.expr.display_name(), text, reason);
        match classify(target, self.types)? {
            Classification::Scalar { kind, .. } => scalar_from_text(kind, text).map_err(|r| invalid(&r)),
            Classification::Enum(desc) => enum_member(desc, text),
            Classification::List(_) => {
                let json = parse_json(text).map_err(|r| invalid(&r))?;
                if !json.is_array() {
                    return Err(invalid("expected a JSON array"));
                }
                self.from_json(&json, target, text)
            }
            Classification::Named(desc) => {
                let json = parse_json(text).map_err(|r| invalid(&r))?;
                let Value::Object(map) = &json else {
                    return Err(invalid("expected a JSON object"));
                };
                self.object(desc, map, text)
            }
            Classification::Map => {
                let json = parse_json(text).map_err(|r| invalid(&r))?;
                ConstValue::from_json(json).map_err(|e| invalid(&e.to_string()))
            }
            Classification::AsyncWrapper(_) | Classification::Publisher(_) => {
                Err(SchemaError::WrapperInInput {
                    shape: target.expr.display_name(),
                    context: "default value".into(),
                })
            }
        }
    }

    fn from_json(&self, value: &Value, target: &TypeUse, text: &str) -> Result<ConstValue> {
        let invalid = |reason: &str| SchemaError::invalid_default(target.expr.display_name(), text, reason);
        if value.is_null() {
            if matches!(target.expr, TypeExpr::Primitive { .. }) || has_not_null(&target.tags) {
                return Err(invalid("null is not allowed here"));
            }
            return Ok(ConstValue::Null);
        }
        match classify(target, self.types)? {
            Classification::Scalar { kind, .. } => scalar_from_json(kind, value).map_err(|r| invalid(&r)),
            Classification::Enum(desc) => match value.as_str() {
                Some(member) => enum_member(desc, member),
                None => Err(invalid("expected an enum member name")),
            },
            Classification::List(element) => {
                let Some(items) = value.as_array() else {
                    return Err(invalid("expected a JSON array"));
                };
                items
                    .iter()
                    .map(|item| self.from_json(item, element, text))
                    .collect::<Result<Vec<_>>>()
                    .map(ConstValue::List)
            }
            Classification::Named(desc) => match value.as_object() {
                Some(map) => self.object(desc, map, text),
                None => Err(invalid("expected a JSON object")),
            },
            Classification::Map => {
                ConstValue::from_json(value.clone()).map_err(|e| invalid(&e.to_string()))
            }
            Classification::AsyncWrapper(_) | Classification::Publisher(_) => {
                Err(SchemaError::WrapperInInput {
                    shape: target.expr.display_name(),
                    context: "default value".into(),
                })
            }
        }
    }

    fn object(
        &self,
        desc: &TypeDescriptor,
        map: &serde_json::Map<String, Value>,
        text: &str,
    ) -> Result<ConstValue> {
        let fields = input_fields(self.types, desc);
        let mut object = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let field = fields.iter().find(|f| f.name == *key).ok_or_else(|| {
                SchemaError::UnknownDefaultField {
                    target: desc.key.to_string(),
                    field: key.clone(),
                }
            })?;
            object.insert(Name::new(key), self.from_json(value, &field.ty, text)?);
        }
        Ok(ConstValue::Object(object))
    }
}

fn parse_json(text: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

fn enum_member(desc: &TypeDescriptor, member: &str) -> Result<ConstValue> {
    let known = desc
        .enum_members()
        .is_some_and(|members| members.iter().any(|m| m == member));
    if !known {
        return Err(SchemaError::UnknownEnumMember {
            target: desc.key.to_string(),
            value: member.to_string(),
        });
    }
    Ok(ConstValue::Enum(Name::new(member)))
}

fn integer_fits(kind: ValueKind, n: i64) -> bool {
    match kind {
        ValueKind::Int => i32::try_from(n).is_ok(),
        ValueKind::Short => i16::try_from(n).is_ok(),
        ValueKind::Byte => i8::try_from(n).is_ok(),
        _ => true,
    }
}

fn integer(kind: ValueKind, n: i64) -> std::result::Result<ConstValue, String> {
    if integer_fits(kind, n) {
        Ok(ConstValue::Number(n.into()))
    } else {
        Err(format!("{n} is out of range for {kind:?}"))
    }
}

fn float(f: f64) -> std::result::Result<ConstValue, String> {
    Number::from_f64(f)
        .map(ConstValue::Number)
        .ok_or_else(|| format!("{f} is not a finite number"))
}

fn single_char(s: &str) -> std::result::Result<ConstValue, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(_), None) => Ok(ConstValue::String(s.to_string())),
        _ => Err("expected exactly one character".into()),
    }
}

fn scalar_from_text(kind: ValueKind, text: &str) -> std::result::Result<ConstValue, String> {
    match kind {
        ValueKind::Int | ValueKind::Short | ValueKind::Long | ValueKind::Byte => {
            let n: i64 = text.trim().parse().map_err(|e| format!("{e}"))?;
            integer(kind, n)
        }
        ValueKind::Float | ValueKind::Double => {
            let f: f64 = text.trim().parse().map_err(|e| format!("{e}"))?;
            float(f)
        }
        ValueKind::BigDecimal => text
            .trim()
            .parse::<Number>()
            .map(ConstValue::Number)
            .map_err(|e| e.to_string()),
        ValueKind::BigInteger => {
            let n = text.trim().parse::<Number>().map_err(|e| e.to_string())?;
            if n.is_f64() {
                return Err("expected an integer".into());
            }
            Ok(ConstValue::Number(n))
        }
        ValueKind::Boolean => match text.trim() {
            "true" => Ok(ConstValue::Boolean(true)),
            "false" => Ok(ConstValue::Boolean(false)),
            _ => Err("expected true or false".into()),
        },
        ValueKind::Char => single_char(text),
        ValueKind::String | ValueKind::Date | ValueKind::DateTime | ValueKind::Timestamp => {
            Ok(ConstValue::String(text.to_string()))
        }
    }
}

fn scalar_from_json(kind: ValueKind, value: &Value) -> std::result::Result<ConstValue, String> {
    match kind {
        ValueKind::Int | ValueKind::Short | ValueKind::Long | ValueKind::Byte => value
            .as_i64()
            .ok_or_else(|| "expected an integer".to_string())
            .and_then(|n| integer(kind, n)),
        ValueKind::Float | ValueKind::Double => value
            .as_f64()
            .ok_or_else(|| "expected a number".to_string())
            .and_then(float),
        ValueKind::BigDecimal => match value {
            Value::Number(n) => Ok(ConstValue::Number(n.clone())),
            _ => Err("expected a number".into()),
        },
        ValueKind::BigInteger => match value {
            Value::Number(n) if !n.is_f64() => Ok(ConstValue::Number(n.clone())),
            _ => Err("expected an integer".into()),
        },
        ValueKind::Boolean => value
            .as_bool()
            .map(ConstValue::Boolean)
            .ok_or_else(|| "expected true or false".into()),
        ValueKind::Char => value
            .as_str()
            .ok_or_else(|| "expected a string".to_string())
            .and_then(single_char),
        ValueKind::String | ValueKind::Date | ValueKind::DateTime | ValueKind::Timestamp => value
            .as_str()
            .map(|s| ConstValue::String(s.to_string()))
            .ok_or_else(|| "expected a string".into()),
    }
}

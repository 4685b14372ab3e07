//! Structural introspection model.
//!
//! Source types are described by plain data: their declared methods, storage
//! fields, generic parameters, ancestry and metadata tags. Descriptors are
//! serde-deserializable so a manifest can be produced at build time by any
//! code generator, and a [`TypeIntrospector`] gives the discovery engine
//! read-only access to the whole universe of types.
//!
//! Types are identified by [`TypeKey`], never by reference, so cyclic type
//! graphs need no special handling here.

mod catalog;

pub use catalog::TypeCatalog;

use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Fully qualified path of a source type, e.g. `app::model::Car`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    /// Creates a key from a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the full path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }

    /// Returns everything before the last path segment, if any.
    #[must_use]
    pub fn module_path(&self) -> Option<&str> {
        self.0.rsplit_once("::").map(|(module, _)| module)
    }

    /// Returns true if this key lives in `scope` or one of its submodules.
    #[must_use]
    pub fn is_within(&self, scope: &str) -> bool {
        self.0
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Well-known value types with a predeclared scalar mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Int,
    Short,
    Long,
    Byte,
    Char,
    Float,
    Double,
    Boolean,
    String,
    BigDecimal,
    BigInteger,
    Date,
    DateTime,
    Timestamp,
}

/// Raw shape of a parameterized type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Single-element sequence container.
    List,
    /// Key/value container.
    Map,
    /// Single-value asynchronous container.
    Future,
    /// Optional-value container.
    Optional,
    /// Asynchronous stream of values.
    Publisher,
    /// Any other generic container, named for diagnostics.
    Other(String),
}

impl Shape {
    /// Display name used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::List => "List",
            Self::Map => "Map",
            Self::Future => "Future",
            Self::Optional => "Optional",
            Self::Publisher => "Publisher",
            Self::Other(name) => name,
        }
    }
}

/// A type expression as it appears in a signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeExpr {
    /// Value type that can never be absent.
    Primitive { kind: ValueKind },
    /// Value type that may be absent.
    Boxed { kind: ValueKind },
    /// A structural type (class, record, interface or enum).
    Named { key: TypeKey },
    /// A parameterized container.
    Generic { shape: Shape, args: Vec<TypeUse> },
    /// A type variable of the declaring type.
    Param { name: String },
    /// The universal root type.
    Any,
    /// A map without type arguments.
    RawMap,
    /// A collection without type arguments.
    RawCollection,
    /// The serving layer's execution context.
    Context,
}

impl TypeExpr {
    /// Human-readable rendering used in logs and errors.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Primitive { kind } | Self::Boxed { kind } => format!("{kind:?}"),
            Self::Named { key } => key.to_string(),
            Self::Generic { shape, args } => {
                let args: Vec<String> = args.iter().map(|a| a.expr.display_name()).collect();
                format!("{}<{}>", shape.name(), args.join(", "))
            }
            Self::Param { name } => name.clone(),
            Self::Any => "Any".into(),
            Self::RawMap => "Map".into(),
            Self::RawCollection => "Collection".into(),
            Self::Context => "Context".into(),
        }
    }
}

/// A type expression together with the tags attached to that use site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeUse {
    #[serde(flatten)]
    pub expr: TypeExpr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl TypeUse {
    pub fn new(expr: TypeExpr) -> Self {
        Self {
            expr,
            tags: Vec::new(),
        }
    }

    pub fn primitive(kind: ValueKind) -> Self {
        Self::new(TypeExpr::Primitive { kind })
    }

    pub fn boxed(kind: ValueKind) -> Self {
        Self::new(TypeExpr::Boxed { kind })
    }

    pub fn named(key: impl Into<TypeKey>) -> Self {
        Self::new(TypeExpr::Named { key: key.into() })
    }

    pub fn generic(shape: Shape, args: Vec<TypeUse>) -> Self {
        Self::new(TypeExpr::Generic { shape, args })
    }

    pub fn list(element: TypeUse) -> Self {
        Self::generic(Shape::List, vec![element])
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self::new(TypeExpr::Param { name: name.into() })
    }

    /// Adds a tag to this use site.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Shorthand for tagging this use site not-null.
    #[must_use]
    pub fn not_null(self) -> Self {
        self.with_tag(Tag::NotNull)
    }
}

/// Declarative metadata attached to types, methods, fields and parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Tag {
    NotNull,
    /// Any foreign tag, matched by name only.
    Marker { name: String },
    Description { text: String },
    Deprecated {
        #[serde(default)]
        reason: Option<String>,
    },
    Ignore,
    /// Renames a field or input value.
    Rename { name: String },
    /// Output type name override and type-level ignore list.
    TypeName {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        ignore: Vec<String>,
    },
    /// Input type name override and type-level ignore list.
    InputType {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        ignore: Vec<String>,
    },
    /// Marks an interface type.
    Interface {
        #[serde(default)]
        name: Option<String>,
    },
    /// Marks an implementation of an interface type.
    Implementation {
        #[serde(default)]
        name: Option<String>,
    },
    Secured { roles: Vec<String> },
    Default { value: String },
    DefaultNull,
    /// Method backing a batch loader; never exposed as a plain field.
    BatchLoader,
}

impl Tag {
    /// Name the tag is known by, used for name-pattern matching.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Marker { name } => name,
            Self::NotNull => "NotNull",
            Self::Description { .. } => "Description",
            Self::Deprecated { .. } => "Deprecated",
            Self::Ignore => "Ignore",
            Self::Rename { .. } => "Rename",
            Self::TypeName { .. } => "TypeName",
            Self::InputType { .. } => "InputType",
            Self::Interface { .. } => "Interface",
            Self::Implementation { .. } => "Implementation",
            Self::Secured { .. } => "Secured",
            Self::Default { .. } => "Default",
            Self::DefaultNull => "DefaultNull",
            Self::BatchLoader => "BatchLoader",
        }
    }

    /// Creates a foreign marker tag.
    pub fn marker(name: impl Into<String>) -> Self {
        Self::Marker { name: name.into() }
    }

    pub fn description(text: impl Into<String>) -> Self {
        Self::Description { text: text.into() }
    }

    pub fn default_value(value: impl Into<String>) -> Self {
        Self::Default {
            value: value.into(),
        }
    }
}

/// Visibility of a method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// One parameter of a method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub ty: TypeUse,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeUse) -> Self {
        Self {
            name: name.into(),
            ty,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// A declared method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
    /// Absent when the method returns no value.
    #[serde(default)]
    pub returns: Option<TypeUse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl MethodDescriptor {
    /// Creates a public, non-static method without parameters or return value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            params: Vec::new(),
            returns: None,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn returns(mut self, ty: TypeUse) -> Self {
        self.returns = Some(ty);
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeUse) -> Self {
        self.params.push(ParamDescriptor::new(name, ty));
        self
    }

    #[must_use]
    pub fn with_param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    #[must_use]
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[must_use]
    pub fn has_tag(&self, predicate: impl Fn(&Tag) -> bool) -> bool {
        self.tags.iter().any(predicate)
    }
}

/// A storage field backing an accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeUse,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeUse) -> Self {
        Self {
            name: name.into(),
            ty,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// Reference to a supertype with its actual type arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supertype {
    pub key: TypeKey,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeUse>,
}

impl Supertype {
    pub fn new(key: impl Into<TypeKey>) -> Self {
        Self {
            key: key.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(key: impl Into<TypeKey>, args: Vec<TypeUse>) -> Self {
        Self {
            key: key.into(),
            args,
        }
    }
}

/// What kind of declaration a type is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeForm {
    #[default]
    Class,
    Interface,
    Enum { members: Vec<String> },
}

/// Full description of one source type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub key: TypeKey,
    #[serde(default)]
    pub form: TypeForm,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    /// Direct parent; absent means the universal root.
    #[serde(default)]
    pub parent: Option<Supertype>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Supertype>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Creates an empty class descriptor.
    pub fn class(key: impl Into<TypeKey>) -> Self {
        Self {
            key: key.into(),
            form: TypeForm::Class,
            type_params: Vec::new(),
            parent: None,
            interfaces: Vec::new(),
            tags: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Creates an empty interface descriptor.
    pub fn interface(key: impl Into<TypeKey>) -> Self {
        Self {
            form: TypeForm::Interface,
            ..Self::class(key)
        }
    }

    /// Creates an enum descriptor with the given members.
    pub fn enumeration<I, S>(key: impl Into<TypeKey>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            form: TypeForm::Enum {
                members: members.into_iter().map(Into::into).collect(),
            },
            ..Self::class(key)
        }
    }

    #[must_use]
    pub fn type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    #[must_use]
    pub fn extends(mut self, parent: Supertype) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: Supertype) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Enum members, if this is an enum.
    #[must_use]
    pub fn enum_members(&self) -> Option<&[String]> {
        match &self.form {
            TypeForm::Enum { members } => Some(members),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        matches!(self.form, TypeForm::Enum { .. })
    }

    #[must_use]
    pub fn has_interface_tag(&self) -> bool {
        self.tags.iter().any(|t| matches!(t, Tag::Interface { .. }))
    }

    #[must_use]
    pub fn has_implementation_tag(&self) -> bool {
        self.tags
            .iter()
            .any(|t| matches!(t, Tag::Implementation { .. }))
    }

    /// Direct supertypes: the parent first, then declared interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &Supertype> {
        self.parent.iter().chain(self.interfaces.iter())
    }
}

/// Read-only access to the universe of source types.
pub trait TypeIntrospector: Send + Sync {
    /// Looks up a type by key.
    fn lookup(&self, key: &TypeKey) -> Option<&TypeDescriptor>;

    /// All known types, in declaration order.
    fn types(&self) -> Box<dyn Iterator<Item = &TypeDescriptor> + '_>;

    /// Keys of every implementation-tagged type.
    ///
    /// Implementations may compute this once and return the cached slice.
    fn implementation_candidates(&self) -> &[TypeKey];

    /// Looks up a type, failing if it is unknown.
    fn require(&self, key: &TypeKey) -> Result<&TypeDescriptor, SchemaError> {
        self.lookup(key)
            .ok_or_else(|| SchemaError::UnknownType(key.to_string()))
    }

    /// Returns true if `ty` is `target` or has it among its ancestors.
    ///
    /// The walk visits each type once, so malformed cyclic ancestry terminates.
    fn is_assignable(&self, ty: &TypeKey, target: &TypeKey) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            if &current == target {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(desc) = self.lookup(&current) {
                queue.extend(desc.supertypes().map(|s| s.key.clone()));
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_key_segments() {
        let key = TypeKey::new("app::model::Car");
        assert_eq!(key.simple_name(), "Car");
        assert_eq!(key.module_path(), Some("app::model"));
        assert!(key.is_within("app::model"));
        assert!(key.is_within("app"));
        assert!(!key.is_within("app::mod"));

        let bare = TypeKey::new("Car");
        assert_eq!(bare.simple_name(), "Car");
        assert_eq!(bare.module_path(), None);
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(Tag::NotNull.name(), "NotNull");
        assert_eq!(Tag::marker("lombok.NonNull").name(), "lombok.NonNull");
        assert_eq!(Tag::Implementation { name: None }.name(), "Implementation");
    }

    #[test]
    fn test_type_use_deserialize() {
        let json = r#"{
            "type": "generic",
            "shape": "list",
            "args": [{ "type": "boxed", "kind": "string", "tags": [{ "tag": "not_null" }] }],
            "tags": [{ "tag": "marker", "name": "NonNull" }]
        }"#;
        let ty: TypeUse = serde_json::from_str(json).unwrap();
        let expected = TypeUse::list(TypeUse::boxed(ValueKind::String).not_null())
            .with_tag(Tag::marker("NonNull"));
        assert_eq!(ty, expected);
    }

    #[test]
    fn test_display_name() {
        let ty = TypeUse::generic(
            Shape::Map,
            vec![TypeUse::boxed(ValueKind::String), TypeUse::named("app::Car")],
        );
        assert_eq!(ty.expr.display_name(), "Map<String, app::Car>");
    }
}

//! Metadata resolution.
//!
//! Tags may be declared on an accessor method, on the storage field behind
//! it, or on the owning type. Method tags win for field-shape decisions
//! (description, deprecation, security, default value, rename); nullability
//! and ignore are the OR of every location.
//!
//! Not-null detection matches tag names against `\b(NotNull|NonNull)\b`, so
//! any tag library spelling of the convention is honoured.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::reflect::{FieldDescriptor, MethodDescriptor, ParamDescriptor, Tag, TypeDescriptor, TypeIntrospector, TypeKey};
use crate::schema::TypeKind;

static NOT_NULL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(NotNull|NonNull)\b").expect("valid not-null regex"));

/// Returns true if the tag's name follows the not-null naming convention.
#[must_use]
pub fn is_not_null_tag(tag: &Tag) -> bool {
    NOT_NULL_TAG.is_match(tag.name())
}

/// Returns true if any tag marks not-null.
#[must_use]
pub fn has_not_null<'t>(tags: impl IntoIterator<Item = &'t Tag>) -> bool {
    tags.into_iter().any(is_not_null_tag)
}

/// Deprecation marker, with an optional reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    pub reason: Option<String>,
}

/// Textual default value specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultSpec {
    /// Explicit null default.
    Null,
    Text(String),
}

/// Aggregated metadata of one field, input value or argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub not_null: bool,
    pub description: Option<String>,
    pub deprecated: Option<Deprecation>,
    pub ignored: bool,
    pub name_override: Option<String>,
    pub roles: Option<Vec<String>>,
    pub default: Option<DefaultSpec>,
}

impl Metadata {
    /// Collects metadata from one location. The first tag of each sort wins.
    pub fn from_tags<'t>(tags: impl IntoIterator<Item = &'t Tag>) -> Self {
        let mut meta = Self::default();
        let mut default_null = false;
        for tag in tags {
            if is_not_null_tag(tag) {
                meta.not_null = true;
            }
            match tag {
                Tag::Description { text } => {
                    meta.description.get_or_insert_with(|| text.clone());
                }
                Tag::Deprecated { reason } => {
                    meta.deprecated.get_or_insert_with(|| Deprecation {
                        reason: reason.clone().filter(|r| !r.is_empty()),
                    });
                }
                Tag::Ignore => meta.ignored = true,
                Tag::Rename { name } => {
                    meta.name_override.get_or_insert_with(|| name.clone());
                }
                Tag::Secured { roles } => {
                    meta.roles.get_or_insert_with(|| roles.clone());
                }
                Tag::Default { value } => {
                    meta.default
                        .get_or_insert_with(|| DefaultSpec::Text(value.clone()));
                }
                Tag::DefaultNull => default_null = true,
                _ => {}
            }
        }
        if default_null {
            meta.default = Some(DefaultSpec::Null);
        }
        meta
    }

    /// Merges a lower-precedence location into this one.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            not_null: self.not_null || fallback.not_null,
            description: self.description.or(fallback.description),
            deprecated: self.deprecated.or(fallback.deprecated),
            ignored: self.ignored || fallback.ignored,
            name_override: self.name_override.or(fallback.name_override),
            roles: self.roles.or(fallback.roles),
            default: self.default.or(fallback.default),
        }
    }
}

/// Metadata lookup scoped to one owning type.
#[derive(Debug, Default)]
pub struct MetadataResolver<'a> {
    fields: HashMap<&'a str, &'a FieldDescriptor>,
    ignored: HashSet<&'a str>,
}

impl<'a> MetadataResolver<'a> {
    /// Resolver for methods that have no owning structural type, such as
    /// root resolver methods.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Resolver for the members of `owner` when built as `kind`.
    ///
    /// Storage fields are collected from the owner and its parent chain, the
    /// nearest declaration winning.
    pub fn new(types: &'a dyn TypeIntrospector, owner: &'a TypeDescriptor, kind: TypeKind) -> Self {
        let mut fields = HashMap::new();
        let mut visited: HashSet<&TypeKey> = HashSet::new();
        let mut current = Some(owner);
        while let Some(desc) = current {
            if !visited.insert(&desc.key) {
                break;
            }
            for field in &desc.fields {
                fields.entry(field.name.as_str()).or_insert(field);
            }
            current = desc.parent.as_ref().and_then(|p| types.lookup(&p.key));
        }

        let ignored = owner
            .tags
            .iter()
            .filter_map(|tag| match (tag, kind) {
                (Tag::InputType { ignore, .. }, TypeKind::Input) => Some(ignore),
                (Tag::TypeName { ignore, .. }, TypeKind::Object | TypeKind::Interface) => Some(ignore),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect();

        Self { fields, ignored }
    }

    /// Metadata of an output field backed by `method`.
    #[must_use]
    pub fn for_method(&self, method: &MethodDescriptor, field_name: &str) -> Metadata {
        Metadata::from_tags(&method.tags).or(self.storage(field_name))
    }

    /// Metadata of an input value backed by a single-parameter mutator.
    #[must_use]
    pub fn for_setter(&self, method: &MethodDescriptor, field_name: &str) -> Metadata {
        let param_tags = method.params.iter().flat_map(|p| p.tags.iter());
        Metadata::from_tags(method.tags.iter().chain(param_tags)).or(self.storage(field_name))
    }

    /// Metadata of an argument.
    #[must_use]
    pub fn for_param(&self, param: &ParamDescriptor) -> Metadata {
        Metadata::from_tags(&param.tags)
    }

    /// Returns true if the type-level ignore list names `field_name`.
    #[must_use]
    pub fn is_type_ignored(&self, field_name: &str) -> bool {
        self.ignored.contains(field_name)
    }

    fn storage(&self, field_name: &str) -> Metadata {
        let mut meta = self
            .fields
            .get(field_name)
            .map(|field| Metadata::from_tags(field.tags.iter().chain(field.ty.tags.iter())))
            .unwrap_or_default();
        if self.is_type_ignored(field_name) {
            meta.ignored = true;
        }
        meta
    }
}

//! Method eligibility and accessor naming.
//!
//! Output fields come from value-returning methods, input values from
//! `set<Upper>` mutators taking exactly one parameter. Methods inherited from
//! generic supertypes are returned with the supertype's actual type
//! arguments substituted into their signatures.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::Deref;

use tracing::{info, trace};

use crate::reflect::{MethodDescriptor, Tag, TypeDescriptor, TypeExpr, TypeIntrospector, TypeKey, TypeUse};
use crate::schema::TypeKind;
use crate::schema::metadata::{Metadata, MetadataResolver};

/// Universal object-identity methods; never schema fields.
pub const OBJECT_IDENTITY_METHODS: &[&str] = &[
    "getClass",
    "equals",
    "hashCode",
    "toString",
    "clone",
    "notify",
    "notifyAll",
    "wait",
    "finalize",
    "compareTo",
];

fn accessor_suffix<'n>(name: &'n str, prefix: &str) -> Option<&'n str> {
    let rest = name.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .is_some_and(char::is_uppercase)
        .then_some(rest)
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `getDayOfWeek` becomes `dayOfWeek`; names without the prefix pass through.
#[must_use]
pub fn normalize_get_name(name: &str) -> String {
    accessor_suffix(name, "get").map_or_else(|| name.to_string(), lower_first)
}

/// `setComments` becomes `comments`; other names are not mutators.
#[must_use]
pub fn normalize_set_name(name: &str) -> Option<String> {
    accessor_suffix(name, "set").map(lower_first)
}

fn is_any(ty: &TypeUse) -> bool {
    matches!(ty.expr, TypeExpr::Any)
}

/// Checks shared by every exposed method.
fn is_exposable(method: &MethodDescriptor) -> bool {
    method.is_public()
        && !method.is_static
        && !OBJECT_IDENTITY_METHODS.contains(&method.name.as_str())
        && !method.has_tag(|t| matches!(t, Tag::Ignore | Tag::BatchLoader))
}

/// Returns true for a value-less `set<Upper>` method.
#[must_use]
pub fn is_setter(method: &MethodDescriptor) -> bool {
    method.returns.is_none() && normalize_set_name(&method.name).is_some()
}

/// Eligibility of a method as an output field.
#[must_use]
pub fn is_output_method(method: &MethodDescriptor) -> bool {
    if !is_exposable(method) || is_setter(method) {
        return false;
    }
    if method.params.iter().any(|p| is_any(&p.ty)) {
        return false;
    }
    match &method.returns {
        None => {
            info!(method = %method.name, "Skipping method because it returns no value");
            false
        }
        Some(ret) => !is_any(ret),
    }
}

/// Eligibility of a method as an input value.
#[must_use]
pub fn is_input_method(method: &MethodDescriptor) -> bool {
    is_exposable(method)
        && is_setter(method)
        && matches!(method.params.as_slice(), [param] if !is_any(&param.ty))
}

/// Type variable bindings of one supertype.
#[derive(Debug, Clone, Default)]
struct Substitution(HashMap<String, TypeUse>);

impl Substitution {
    fn bind(params: &[String], args: Vec<TypeUse>) -> Self {
        Self(params.iter().cloned().zip(args).collect())
    }

    fn apply(&self, ty: &TypeUse) -> TypeUse {
        match &ty.expr {
            TypeExpr::Param { name } => match self.0.get(name) {
                Some(actual) => {
                    let mut actual = actual.clone();
                    actual.tags.extend(ty.tags.iter().cloned());
                    actual
                }
                None => ty.clone(),
            },
            TypeExpr::Generic { shape, args } => TypeUse {
                expr: TypeExpr::Generic {
                    shape: shape.clone(),
                    args: args.iter().map(|a| self.apply(a)).collect(),
                },
                tags: ty.tags.clone(),
            },
            _ => ty.clone(),
        }
    }

    fn apply_method(&self, method: &MethodDescriptor) -> MethodDescriptor {
        let mut method = method.clone();
        for param in &mut method.params {
            param.ty = self.apply(&param.ty);
        }
        if let Some(ret) = &method.returns {
            method.returns = Some(self.apply(ret));
        }
        method
    }
}

/// A method as seen from the type it is collected for.
#[derive(Debug, Clone)]
pub struct ResolvedMethod<'a> {
    pub method: Cow<'a, MethodDescriptor>,
    pub declared_in: &'a TypeKey,
}

impl Deref for ResolvedMethod<'_> {
    type Target = MethodDescriptor;

    fn deref(&self) -> &MethodDescriptor {
        &self.method
    }
}

/// Collects the methods of `desc` accepted by `filter`, including those
/// inherited from parents and interfaces.
///
/// The nearest declaration of a name hides every inherited one, even when
/// the filter rejects it. Supertypes missing from the introspector are
/// treated as contributing nothing.
pub fn collect_methods<'a>(
    types: &'a dyn TypeIntrospector,
    desc: &'a TypeDescriptor,
    filter: impl Fn(&MethodDescriptor) -> bool,
) -> Vec<ResolvedMethod<'a>> {
    let mut seen = HashSet::new();
    let mut visited = HashSet::new();
    let mut methods = Vec::new();
    let mut queue = VecDeque::from([(desc, Substitution::default())]);

    while let Some((current, subst)) = queue.pop_front() {
        if !visited.insert(&current.key) {
            continue;
        }
        for method in &current.methods {
            if !seen.insert(method.name.as_str()) || !filter(method) {
                continue;
            }
            let method = if subst.0.is_empty() {
                Cow::Borrowed(method)
            } else {
                Cow::Owned(subst.apply_method(method))
            };
            methods.push(ResolvedMethod {
                method,
                declared_in: &current.key,
            });
        }
        for supertype in current.supertypes() {
            let Some(super_desc) = types.lookup(&supertype.key) else {
                trace!(supertype = %supertype.key, "Supertype not in catalog");
                continue;
            };
            let args = supertype.args.iter().map(|a| subst.apply(a)).collect();
            queue.push_back((super_desc, Substitution::bind(&super_desc.type_params, args)));
        }
    }
    methods
}

/// One input value of an input type.
#[derive(Debug, Clone)]
pub struct InputField<'a> {
    pub name: String,
    /// Declared type of the mutator's parameter.
    pub ty: TypeUse,
    pub method: ResolvedMethod<'a>,
    pub meta: Metadata,
}

/// Input values of `desc`, after eligibility and ignore filtering.
pub fn input_fields<'a>(types: &'a dyn TypeIntrospector, desc: &'a TypeDescriptor) -> Vec<InputField<'a>> {
    let metadata = MetadataResolver::new(types, desc, TypeKind::Input);
    collect_methods(types, desc, is_input_method)
        .into_iter()
        .filter_map(|method| {
            let name = normalize_set_name(&method.name)?;
            let meta = metadata.for_setter(&method, &name);
            if meta.ignored {
                trace!(type_key = %desc.key, field = %name, "Ignoring input field");
                return None;
            }
            let ty = method.params.first()?.ty.clone();
            let name = meta.name_override.clone().unwrap_or(name);
            Some(InputField { name, ty, method, meta })
        })
        .collect()
}

//! Definition factory.
//!
//! Owns the discovery worklist for one build. Resolvers are processed first,
//! in the order given; every structural type they reference is registered
//! and queued, and the queue is then drained until it is empty. Emission of
//! a definition may discover further types, which land at the back of the
//! queue.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    EnumType, EnumValueDefinition, FieldDefinition, InputObjectType, InterfaceType, ObjectType,
    TypeDefinition, TypeKind as AstTypeKind, TypeSystemDefinition,
};
use indexmap::IndexMap;
use tracing::{debug, info, trace, warn};

use super::ast::{description, name, pos};
use super::directives::secured_directive_definition;
use super::document::{FieldBinding, FieldShape, GeneratedSchema};
use super::interfaces::{ImplementationScanner, declared_interface};
use super::metadata::MetadataResolver;
use super::methods::{collect_methods, input_fields, is_output_method};
use super::registry::{DiscoveredType, Registration, TypeRegistry};
use super::scalars::scalar_definitions;
use super::TypeKind;
use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::reflect::{Tag, TypeDescriptor, TypeExpr, TypeIntrospector, TypeKey};
use crate::resolver::{ResolverDescriptor, ResolverRole};
use crate::Result;

/// A field definition together with the method that backs it.
#[derive(Debug, Clone)]
pub(super) struct BuiltField {
    pub(super) definition: FieldDefinition,
    pub(super) source: String,
    pub(super) method: String,
    pub(super) shape: FieldShape,
}

/// Builds SDL definitions for resolvers and the types they reach.
///
/// A factory is single-use: each build starts from a fresh one so no
/// discovery state leaks between builds.
pub struct DefinitionFactory<'a> {
    pub(super) types: &'a dyn TypeIntrospector,
    pub(super) config: &'a SchemaConfig,
    registry: TypeRegistry,
    scanner: ImplementationScanner,
    /// Object names that already have a full definition.
    defined_objects: HashSet<String>,
    /// Interface names that already have a definition.
    built_interfaces: HashSet<String>,
    /// Interface name to the resolver bound to it.
    interface_resolvers: HashMap<String, String>,
    /// Resolver fields copied onto every implementation of an interface.
    interface_extras: HashMap<String, Vec<BuiltField>>,
    implementations: IndexMap<String, TypeKey>,
    bindings: Vec<FieldBinding>,
}

impl<'a> DefinitionFactory<'a> {
    pub fn new(types: &'a dyn TypeIntrospector, config: &'a SchemaConfig) -> Self {
        Self {
            types,
            config,
            registry: TypeRegistry::new(),
            scanner: ImplementationScanner::new(),
            defined_objects: HashSet::new(),
            built_interfaces: HashSet::new(),
            interface_resolvers: HashMap::new(),
            interface_extras: HashMap::new(),
            implementations: IndexMap::new(),
            bindings: Vec::new(),
        }
    }

    /// Discovery state of this build.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Directive declarations the generated schema relies on.
    #[must_use]
    pub fn directive_definitions(&self) -> Vec<TypeSystemDefinition> {
        if self.config.secured_directive {
            vec![TypeSystemDefinition::Directive(pos(secured_directive_definition()))]
        } else {
            Vec::new()
        }
    }

    /// `scalar` declarations for the predeclared non-built-in scalars.
    #[must_use]
    pub fn scalar_declarations(&self) -> Vec<TypeSystemDefinition> {
        if !self.config.declare_scalars {
            return Vec::new();
        }
        scalar_definitions(&self.config.json_scalar)
            .into_iter()
            .map(|definition| TypeSystemDefinition::Type(pos(definition)))
            .collect()
    }

    /// Registers the type at `key` under the kind it should have when
    /// referenced as `requested`, and returns its GraphQL name.
    ///
    /// Enums are always discovered as enums and interface-tagged types as
    /// interfaces. Discovering an object also discovers its declared
    /// interface; discovering an interface discovers its implementations.
    /// Repeated discovery of a known name is a no-op.
    ///
    /// # Errors
    ///
    /// Fails for unknown keys, for interface-tagged types requested as
    /// input, and when the name was already discovered with another kind.
    pub fn discover(&mut self, key: &TypeKey, requested: TypeKind) -> Result<String> {
        self.discover_linked(key, requested, None)
    }

    fn discover_linked(
        &mut self,
        key: &TypeKey,
        requested: TypeKind,
        implements: Option<String>,
    ) -> Result<String> {
        let types = self.types;
        let desc = types.require(key)?;
        let kind = effective_kind(desc, requested)?;
        let graphql_name = type_name(desc, kind);

        let declared = match kind {
            TypeKind::Object => declared_interface(types, desc),
            _ => None,
        };
        let implements =
            implements.or_else(|| declared.map(|iface| type_name(iface, TypeKind::Interface)));

        let registration = self.registry.register(DiscoveredType {
            name: graphql_name.clone(),
            source: key.clone(),
            kind,
            implements_interface: implements,
        })?;
        if let Registration::Known(_) = registration {
            trace!(type_name = %graphql_name, "Type already discovered");
            return Ok(graphql_name);
        }
        debug!(type_name = %graphql_name, kind = %kind, source = %key, "Discovered type");

        if let Some(iface) = declared {
            self.discover_linked(&iface.key, TypeKind::Interface, None)?;
        }
        if kind == TypeKind::Interface {
            for implementation in self.scanner.find_implementations(types, self.config, desc) {
                debug!(
                    interface = %graphql_name,
                    implementation = %implementation,
                    "Discovered interface implementation"
                );
                self.discover_linked(&implementation, TypeKind::Object, Some(graphql_name.clone()))?;
            }
        }

        self.registry.enqueue(&graphql_name);
        Ok(graphql_name)
    }

    /// Emits the definitions a resolver contributes.
    ///
    /// Root resolvers extend `Query`, `Mutation` or `Subscription`. A type
    /// extension resolver adds fields to its source type; each method's first
    /// parameter receives the source value and is not exposed as an argument.
    ///
    /// # Errors
    ///
    /// Fails when the source type cannot be extended, when a second resolver
    /// targets the same interface, or when any field cannot be built.
    pub fn process_resolver(
        &mut self,
        resolver: &ResolverDescriptor,
    ) -> Result<Vec<TypeSystemDefinition>> {
        let source = match &resolver.role {
            ResolverRole::TypeExtension { source } => Some(source),
            _ => None,
        };
        let (type_name, kind) = match (resolver.role.root_type_name(), source) {
            (Some(root), _) => (root.to_string(), TypeKind::Object),
            (None, Some(source)) => {
                let type_name = self.discover(source, TypeKind::Object)?;
                let kind = self
                    .registry
                    .get(&type_name)
                    .map_or(TypeKind::Object, |entry| entry.kind);
                if !matches!(kind, TypeKind::Object | TypeKind::Interface) {
                    return Err(SchemaError::invalid_resolver(
                        &resolver.name,
                        format!("source type {source} is discovered as {kind}"),
                    ));
                }
                (type_name, kind)
            }
            (None, None) => {
                return Err(SchemaError::invalid_resolver(&resolver.name, "no target type"));
            }
        };

        info!(
            resolver = %resolver.name,
            role = %resolver.role,
            type_name = %type_name,
            "Processing resolver"
        );
        let fields = self.resolver_fields(resolver, source)?;

        match (kind, source) {
            (TypeKind::Interface, Some(source)) => {
                let definition = self.interface_with_resolver(&type_name, source, resolver, fields)?;
                Ok(vec![definition])
            }
            _ => {
                let source_desc = source.map(|key| self.types.require(key)).transpose()?;
                let implements = self
                    .registry
                    .get(&type_name)
                    .and_then(|entry| entry.implements_interface.clone());
                Ok(self
                    .emit_object(&type_name, source_desc, implements, fields)
                    .into_iter()
                    .collect())
            }
        }
    }

    /// Drains the worklist, emitting one definition per queued type.
    ///
    /// # Errors
    ///
    /// Fails on the first type that cannot be built.
    pub fn process_queue(&mut self) -> Result<Vec<TypeSystemDefinition>> {
        let mut definitions = Vec::new();
        while let Some(entry) = self.registry.pop_pending() {
            info!(
                type_name = %entry.name,
                kind = %entry.kind,
                source = %entry.source,
                "Begin processing type"
            );
            if let Some(definition) = self.build_discovered(&entry)? {
                definitions.push(definition);
            }
        }
        debug!(types = self.registry.len(), "Worklist drained");
        Ok(definitions)
    }

    /// Completes the build with the definitions emitted so far.
    #[must_use]
    pub fn finish(self, definitions: Vec<TypeSystemDefinition>) -> GeneratedSchema {
        GeneratedSchema {
            definitions,
            implementations: self.implementations,
            bindings: self.bindings,
        }
    }

    fn resolver_fields(
        &mut self,
        resolver: &ResolverDescriptor,
        source: Option<&TypeKey>,
    ) -> Result<Vec<BuiltField>> {
        let metadata = MetadataResolver::detached();
        let mut fields = Vec::new();
        for method in resolver.methods.iter().filter(|m| is_output_method(m)) {
            if let Some(source) = source {
                let bound = method
                    .params
                    .first()
                    .is_some_and(|p| matches!(&p.ty.expr, TypeExpr::Named { key } if key == source));
                if !bound {
                    warn!(
                        resolver = %resolver.name,
                        method = %method.name,
                        source = %source,
                        "First parameter must take the source type, skipping method"
                    );
                    continue;
                }
            }
            if let Some(field) =
                self.build_field(method, source.is_some(), &metadata, &resolver.name)?
            {
                fields.push(field);
            }
        }
        Ok(fields)
    }

    fn build_discovered(&mut self, entry: &DiscoveredType) -> Result<Option<TypeSystemDefinition>> {
        let types = self.types;
        let desc = types.require(&entry.source)?;
        match entry.kind {
            TypeKind::Object => {
                let mut fields = self.own_fields(desc, TypeKind::Object)?;
                if let Some(extras) = entry
                    .implements_interface
                    .as_ref()
                    .and_then(|iface| self.interface_extras.get(iface))
                {
                    fields.extend(extras.iter().cloned());
                }
                Ok(self.emit_object(
                    &entry.name,
                    Some(desc),
                    entry.implements_interface.clone(),
                    fields,
                ))
            }
            TypeKind::Interface => {
                if self.built_interfaces.contains(&entry.name)
                    && self.interface_resolvers.contains_key(&entry.name)
                {
                    debug!(interface = %entry.name, "Interface already built with its resolver");
                    return Ok(None);
                }
                let fields = self.own_fields(desc, TypeKind::Interface)?;
                self.emit_interface(&entry.name, desc, fields).map(Some)
            }
            TypeKind::Input => self.emit_input(&entry.name, desc).map(Some),
            TypeKind::Enum => Ok(Some(emit_enum(&entry.name, desc))),
        }
    }

    /// Output fields declared by `desc` and its supertypes.
    fn own_fields(&mut self, desc: &'a TypeDescriptor, kind: TypeKind) -> Result<Vec<BuiltField>> {
        let types = self.types;
        let metadata = MetadataResolver::new(types, desc, kind);
        let mut fields = Vec::new();
        for method in collect_methods(types, desc, is_output_method) {
            let source = method.declared_in.to_string();
            if let Some(field) = self.build_field(&method, false, &metadata, &source)? {
                fields.push(field);
            }
        }
        Ok(fields)
    }

    fn interface_with_resolver(
        &mut self,
        type_name: &str,
        source: &TypeKey,
        resolver: &ResolverDescriptor,
        extra: Vec<BuiltField>,
    ) -> Result<TypeSystemDefinition> {
        if let Some(first) = self.interface_resolvers.get(type_name) {
            return Err(SchemaError::ConflictingInterfaceResolvers {
                interface: type_name.to_string(),
                first: first.clone(),
                second: resolver.name.clone(),
            });
        }
        self.interface_resolvers
            .insert(type_name.to_string(), resolver.name.clone());

        let desc = self.types.require(source)?;
        let mut fields = self.own_fields(desc, TypeKind::Interface)?;
        fields.extend(extra.iter().cloned());
        self.interface_extras.insert(type_name.to_string(), extra);
        self.emit_interface(type_name, desc, fields)
    }

    fn emit_object(
        &mut self,
        type_name: &str,
        desc: Option<&TypeDescriptor>,
        implements: Option<String>,
        fields: Vec<BuiltField>,
    ) -> Option<TypeSystemDefinition> {
        let extend = !self.defined_objects.insert(type_name.to_string());
        // An extension must carry at least one field to be valid SDL
        if extend && fields.is_empty() {
            debug!(type_name = %type_name, "No fields to extend, skipping");
            return None;
        }
        let fields = self.bind_fields(type_name, fields);

        if !extend {
            if let (Some(iface), Some(desc)) = (&implements, desc) {
                debug!(object = %type_name, interface = %iface, "Recording implementation");
                self.implementations
                    .insert(type_name.to_string(), desc.key.clone());
            }
        }
        info!(type_name = %type_name, fields = fields.len(), extend, "Emitted object type");

        let (type_description, implements) = if extend {
            (None, Vec::new())
        } else {
            (
                description(desc.and_then(type_description)),
                implements.iter().map(|iface| name(iface)).collect(),
            )
        };
        Some(type_definition(
            type_name,
            extend,
            type_description,
            AstTypeKind::Object(ObjectType { implements, fields }),
        ))
    }

    fn emit_interface(
        &mut self,
        type_name: &str,
        desc: &TypeDescriptor,
        fields: Vec<BuiltField>,
    ) -> Result<TypeSystemDefinition> {
        if !self.built_interfaces.insert(type_name.to_string()) {
            return Err(SchemaError::DuplicateInterface(type_name.to_string()));
        }
        let fields = self.bind_fields(type_name, fields);
        info!(type_name = %type_name, fields = fields.len(), "Emitted interface type");
        Ok(type_definition(
            type_name,
            false,
            description(type_description(desc)),
            AstTypeKind::Interface(InterfaceType {
                implements: Vec::new(),
                fields,
            }),
        ))
    }

    fn emit_input(&mut self, type_name: &str, desc: &'a TypeDescriptor) -> Result<TypeSystemDefinition> {
        let mut values = Vec::new();
        for field in input_fields(self.types, desc) {
            values.push(pos(self.build_input_value(&field, type_name)?));
        }
        if values.is_empty() {
            return Err(SchemaError::NoInputFields(desc.key.to_string()));
        }
        info!(type_name = %type_name, fields = values.len(), "Emitted input type");
        Ok(type_definition(
            type_name,
            false,
            description(type_description(desc)),
            AstTypeKind::InputObject(InputObjectType { fields: values }),
        ))
    }

    /// Deduplicates fields by name, the later definition winning, and
    /// records their bindings.
    fn bind_fields(
        &mut self,
        type_name: &str,
        fields: Vec<BuiltField>,
    ) -> Vec<Positioned<FieldDefinition>> {
        let mut unique: IndexMap<String, BuiltField> = IndexMap::new();
        for field in fields {
            let field_name = field.definition.name.node.to_string();
            if unique.insert(field_name.clone(), field).is_some() {
                debug!(type_name = %type_name, field = %field_name, "Field redefined, later definition wins");
            }
        }
        unique
            .into_values()
            .map(|field| {
                self.bindings.push(FieldBinding {
                    parent_type: type_name.to_string(),
                    field: field.definition.name.node.to_string(),
                    source: field.source,
                    method: field.method,
                    shape: field.shape,
                });
                pos(field.definition)
            })
            .collect()
    }
}

fn emit_enum(type_name: &str, desc: &TypeDescriptor) -> TypeSystemDefinition {
    let values = desc
        .enum_members()
        .unwrap_or_default()
        .iter()
        .map(|member| {
            pos(EnumValueDefinition {
                description: None,
                value: name(member),
                directives: Vec::new(),
            })
        })
        .collect::<Vec<_>>();
    info!(type_name = %type_name, values = values.len(), "Emitted enum type");
    type_definition(
        type_name,
        false,
        description(type_description(desc)),
        AstTypeKind::Enum(EnumType { values }),
    )
}

fn type_definition(
    type_name: &str,
    extend: bool,
    description: Option<Positioned<String>>,
    kind: AstTypeKind,
) -> TypeSystemDefinition {
    TypeSystemDefinition::Type(pos(TypeDefinition {
        extend,
        description,
        name: name(type_name),
        directives: Vec::new(),
        kind,
    }))
}

fn type_description(desc: &TypeDescriptor) -> Option<&str> {
    desc.tags.iter().find_map(|tag| match tag {
        Tag::Description { text } => Some(text.as_str()),
        _ => None,
    })
}

/// Kind a type is discovered as when referenced as `requested`.
fn effective_kind(desc: &TypeDescriptor, requested: TypeKind) -> Result<TypeKind> {
    if desc.is_enum() {
        return Ok(TypeKind::Enum);
    }
    if desc.has_interface_tag() {
        return match requested {
            TypeKind::Input => Err(SchemaError::InterfaceAsInput(desc.key.to_string())),
            _ => Ok(TypeKind::Interface),
        };
    }
    Ok(requested)
}

/// GraphQL name of `desc` when discovered as `kind`.
///
/// Input types take the input tag's name, interfaces the interface tag's;
/// objects and enums take the type-name tag's, then the implementation
/// tag's. Absent or empty names fall back to the simple name.
#[must_use]
pub fn type_name(desc: &TypeDescriptor, kind: TypeKind) -> String {
    desc.tags
        .iter()
        .filter_map(|tag| match (kind, tag) {
            (TypeKind::Input, Tag::InputType { name, .. })
            | (TypeKind::Interface, Tag::Interface { name })
            | (TypeKind::Object | TypeKind::Enum, Tag::TypeName { name, .. }) => {
                Some((0, name.as_deref()))
            }
            (TypeKind::Object | TypeKind::Enum, Tag::Implementation { name }) => {
                Some((1, name.as_deref()))
            }
            _ => None,
        })
        .filter_map(|(rank, name)| Some((rank, name.filter(|n| !n.is_empty())?)))
        .min_by_key(|(rank, _)| *rank)
        .map_or_else(|| desc.key.simple_name().to_string(), |(_, name)| name.to_string())
}

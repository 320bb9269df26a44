use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, InputObject, InputValue, Object, Scalar, Schema, TypeRef,
};
use async_graphql::parser::parse_schema;
use async_graphql::parser::types::{
    BaseType, InputValueDefinition, Type, TypeDefinition, TypeKind, TypeSystemDefinition,
};
use async_graphql::Value;
use thiserror::Error;

use super::collect::{FailureReport, FieldErrors, FieldLocation};
use super::resolver::{into_field_value, Completion, FieldInput, Resolver, ResolverRegistry};

const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];
const DEFAULT_QUERY_ROOT: &str = "Query";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema document: {0}")]
    Parse(String),

    #[error("query root type `{0}` is not defined as an object type")]
    MissingQueryRoot(String),

    #[error("type `{type_name}` referenced by `{referenced_by}` is not defined")]
    UndefinedType {
        type_name: String,
        referenced_by: String,
    },

    #[error("resolver bound to `{type_name}.{field}`, which the schema does not define")]
    UnknownBinding { type_name: String, field: String },

    #[error("field `{type_name}.{field}` needs a resolver binding")]
    MissingResolver { type_name: String, field: String },

    #[error("unsupported schema construct: {0}")]
    Unsupported(String),

    #[error("invalid schema: {0}")]
    Invalid(String),
}

/// Execution limits applied to every query against the built schema.
#[derive(Debug, Clone)]
pub struct SchemaOptions {
    pub depth_limit: Option<usize>,
    pub introspection: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            depth_limit: Some(15),
            introspection: false,
        }
    }
}

/// Immutable, executable schema. Clones share the same compiled schema and
/// may be used from any number of tasks at once.
#[derive(Clone)]
pub struct ExecutableSchema {
    inner: Schema,
}

impl ExecutableSchema {
    pub(crate) fn inner(&self) -> &Schema {
        &self.inner
    }

    /// Schema document as seen by the executor.
    pub fn sdl(&self) -> String {
        self.inner.sdl()
    }
}

/// Reads the schema document at `path` and builds it.
pub fn load_schema(
    path: impl AsRef<Path>,
    registry: &ResolverRegistry,
    options: &SchemaOptions,
) -> Result<ExecutableSchema, SchemaError> {
    let path = path.as_ref();
    let sdl = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let schema = build_schema(&sdl, registry, options)?;
    tracing::info!("Loaded GraphQL schema from {}", path.display());
    Ok(schema)
}

/// Parses `sdl` and binds the registry's resolvers to its fields.
///
/// Fields without a binding resolve by looking up the property of the same
/// name on the parent value. Root fields and fields taking arguments have no
/// meaningful property to read, so they must be bound.
pub fn build_schema(
    sdl: &str,
    registry: &ResolverRegistry,
    options: &SchemaOptions,
) -> Result<ExecutableSchema, SchemaError> {
    let document = parse_schema(sdl).map_err(|e| SchemaError::Parse(e.to_string()))?;

    let mut query_root = DEFAULT_QUERY_ROOT.to_string();
    let mut types = Vec::new();
    for definition in document.definitions {
        match definition {
            TypeSystemDefinition::Schema(schema) => {
                let schema = schema.node;
                if schema.mutation.is_some() || schema.subscription.is_some() {
                    return Err(SchemaError::Unsupported(
                        "mutation and subscription roots".to_string(),
                    ));
                }
                if let Some(query) = schema.query {
                    query_root = query.node.to_string();
                }
            }
            TypeSystemDefinition::Type(definition) => {
                if definition.node.extend {
                    return Err(SchemaError::Unsupported(format!(
                        "extension of type `{}`",
                        definition.node.name.node
                    )));
                }
                types.push(definition.node);
            }
            TypeSystemDefinition::Directive(_) => {}
        }
    }

    let defined: HashSet<String> = types
        .iter()
        .map(|ty| ty.name.node.to_string())
        .chain(BUILTIN_SCALARS.iter().map(|s| s.to_string()))
        .collect();

    let root_is_object = types
        .iter()
        .any(|ty| ty.name.node.as_str() == query_root && matches!(ty.kind, TypeKind::Object(_)));
    if !root_is_object {
        return Err(SchemaError::MissingQueryRoot(query_root));
    }

    for (type_name, field) in registry.keys() {
        if !defines_field(&types, type_name, field) {
            return Err(SchemaError::UnknownBinding {
                type_name: type_name.to_string(),
                field: field.to_string(),
            });
        }
    }

    let mut builder = Schema::build(&query_root, None, None);
    for ty in &types {
        let type_name = ty.name.node.to_string();
        let description = ty.description.as_ref().map(|d| d.node.clone());
        match &ty.kind {
            TypeKind::Scalar => {
                if BUILTIN_SCALARS.contains(&type_name.as_str()) {
                    continue;
                }
                let mut scalar = Scalar::new(type_name);
                if let Some(description) = description {
                    scalar = scalar.description(description);
                }
                builder = builder.register(scalar);
            }
            TypeKind::Enum(enum_type) => {
                let mut dynamic_enum = Enum::new(type_name);
                for value in &enum_type.values {
                    dynamic_enum = dynamic_enum.item(EnumItem::new(value.node.value.node.as_str()));
                }
                if let Some(description) = description {
                    dynamic_enum = dynamic_enum.description(description);
                }
                builder = builder.register(dynamic_enum);
            }
            TypeKind::InputObject(input_type) => {
                let mut input_object = InputObject::new(type_name.as_str());
                for field in &input_type.fields {
                    input_object = input_object.field(input_value(&field.node, &defined, &type_name)?);
                }
                if let Some(description) = description {
                    input_object = input_object.description(description);
                }
                builder = builder.register(input_object);
            }
            TypeKind::Object(object_type) => {
                let mut object = Object::new(type_name.as_str());
                for field in &object_type.fields {
                    let field = &field.node;
                    let field_name = field.name.node.to_string();
                    let location = format!("{type_name}.{field_name}");
                    check_defined(&field.ty.node, &defined, &location)?;

                    let ty = type_ref(&field.ty.node);
                    let mut dynamic_field = match registry.get(&type_name, &field_name) {
                        Some(resolver) => bound_field(field_name.clone(), ty, resolver.clone()),
                        None if type_name == query_root || !field.arguments.is_empty() => {
                            return Err(SchemaError::MissingResolver {
                                type_name,
                                field: field_name,
                            });
                        }
                        None => property_field(field_name.clone(), ty),
                    };
                    for argument in &field.arguments {
                        dynamic_field =
                            dynamic_field.argument(input_value(&argument.node, &defined, &location)?);
                    }
                    if let Some(description) = &field.description {
                        dynamic_field = dynamic_field.description(description.node.as_str());
                    }
                    object = object.field(dynamic_field);
                }
                if let Some(description) = description {
                    object = object.description(description);
                }
                builder = builder.register(object);
            }
            TypeKind::Interface(_) | TypeKind::Union(_) => {
                return Err(SchemaError::Unsupported(format!(
                    "abstract type `{type_name}`"
                )));
            }
        }
    }

    if let Some(depth) = options.depth_limit {
        builder = builder.limit_depth(depth);
    }
    if !options.introspection {
        builder = builder.disable_introspection();
    }

    let inner = builder
        .finish()
        .map_err(|e| SchemaError::Invalid(e.to_string()))?;

    tracing::debug!(
        types = types.len(),
        bindings = registry.len(),
        "GraphQL schema built"
    );
    Ok(ExecutableSchema { inner })
}

fn defines_field(types: &[TypeDefinition], type_name: &str, field: &str) -> bool {
    types.iter().any(|ty| {
        ty.name.node.as_str() == type_name
            && match &ty.kind {
                TypeKind::Object(object) => object
                    .fields
                    .iter()
                    .any(|f| f.node.name.node.as_str() == field),
                _ => false,
            }
    })
}

fn bound_field(name: String, ty: TypeRef, resolver: Resolver) -> Field {
    let nullable = !matches!(ty, TypeRef::NonNull(_));
    Field::new(name, ty, move |ctx| {
        let input = FieldInput::from_context(&ctx);
        let report = FailureReport::new(
            ctx.ctx.data_opt::<FieldErrors>().cloned(),
            FieldLocation::new(ctx.ctx.path_node.as_ref(), ctx.ctx.item.pos),
            nullable,
        );
        Completion::invoke(&resolver, input).into_field_future(report)
    })
}

fn property_field(name: String, ty: TypeRef) -> Field {
    let key = name.clone();
    Field::new(name, ty, move |ctx| {
        let value = match ctx.parent_value.as_value() {
            Some(Value::Object(map)) => map.get(key.as_str()).cloned(),
            _ => None,
        };
        FieldFuture::Value(value.and_then(into_field_value))
    })
}

fn input_value(
    definition: &InputValueDefinition,
    defined: &HashSet<String>,
    owner: &str,
) -> Result<InputValue, SchemaError> {
    let name = definition.name.node.as_str();
    check_defined(&definition.ty.node, defined, &format!("{owner}({name})"))?;

    let mut input = InputValue::new(name, type_ref(&definition.ty.node));
    if let Some(default) = &definition.default_value {
        input = input.default_value(default.node.clone());
    }
    if let Some(description) = &definition.description {
        input = input.description(description.node.as_str());
    }
    Ok(input)
}

fn type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::named(name.to_string()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };
    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

fn check_defined(ty: &Type, defined: &HashSet<String>, referenced_by: &str) -> Result<(), SchemaError> {
    match &ty.base {
        BaseType::Named(name) if defined.contains(name.as_str()) => Ok(()),
        BaseType::Named(name) => Err(SchemaError::UndefinedType {
            type_name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        }),
        BaseType::List(inner) => check_defined(inner, defined, referenced_by),
    }
}

//! Introspection types and the resolvers answering them
//!
//! Named types are reported eagerly with their `kind`, `name` and
//! `description`; the list-valued fields of `__Type` are resolved lazily by
//! looking the type up by name again.

use arcstr::ArcStr;

use crate::{
    ast::{FieldDefinition, InputValueDefinition, Type, TypeDefinition},
    executor::{FieldResolver, ResolveParams, Resolvers},
    schema::{Schema, TypeKind},
    types::name::Name,
    value::{Object, Value},
};

/// Type definitions of the introspection system, appended to every schema.
pub(crate) const INTROSPECTION_SCHEMA: &str = include_str!("./schema.graphql");

/// From <https://github.com/graphql/graphql-js/blob/8c96dc8276f2de27b8af9ffbd71a4597d483523f/src/utilities/introspectionQuery.js#L21>
pub(crate) const INTROSPECTION_QUERY: &str = include_str!("./query.graphql");

/// Resolvers of the introspection types, of the `__schema` and `__type` fields
/// of the query root, and of `__typename` on every object type.
pub(crate) fn resolvers<CtxT: 'static>(schema: &Schema) -> Resolvers<CtxT> {
    let query_root = schema.query_type_name();

    let mut resolvers = Resolvers::<CtxT>::new()
        .field(format!("{query_root}/__schema"), |_| {
            Ok(Value::object(Object::default()))
        })
        .field(format!("{query_root}/__type"), |p| {
            Ok(p.arg("name")
                .and_then(Value::as_string_value)
                .and_then(|name| p.schema.type_by_name(name))
                .map_or(Value::Null, type_value))
        })
        .field("__Schema/types", |p| {
            Ok(Value::list(p.schema.types().map(type_value).collect()))
        })
        .field("__Schema/queryType", |p| {
            Ok(p.schema
                .type_by_name(p.schema.query_type_name())
                .map_or(Value::Null, type_value))
        })
        .field("__Schema/mutationType", |p| {
            Ok(p.schema
                .mutation_type_name()
                .and_then(|name| p.schema.type_by_name(name))
                .map_or(Value::Null, type_value))
        })
        .field("__Schema/subscriptionType", |_| Ok(Value::Null))
        .field("__Schema/directives", |p| {
            Ok(graphql_value!([
                (directive_value(
                    p.schema,
                    "skip",
                    "Conditionally exclude a field or fragment during execution",
                )),
                (directive_value(
                    p.schema,
                    "include",
                    "Conditionally include a field or fragment during execution",
                )),
            ]))
        })
        .field("__Type/fields", |p| {
            let Some(def) = named_type(p) else {
                return Ok(Value::Null);
            };
            let Some(fields) = def.fields() else {
                return Ok(Value::Null);
            };
            let include_deprecated = include_deprecated(p);
            let is_query_root = def.name() == p.schema.query_type_name();
            Ok(Value::list(
                fields
                    .values()
                    .map(|f| &f.item)
                    .filter(|f| include_deprecated || !f.deprecation.is_deprecated())
                    .filter(|f| !(is_query_root && Name::is_reserved(&f.name.item)))
                    .map(|f| field_value(p.schema, f))
                    .collect(),
            ))
        })
        .field("__Type/interfaces", |p| {
            Ok(match named_type(p) {
                Some(TypeDefinition::Object(object)) => Value::list(
                    object
                        .interfaces
                        .iter()
                        .filter_map(|i| p.schema.type_by_name(&i.item))
                        .map(type_value)
                        .collect(),
                ),
                _ => Value::Null,
            })
        })
        .field("__Type/possibleTypes", |p| {
            Ok(match named_type(p) {
                Some(def) if def.is_abstract() => Value::list(
                    p.schema
                        .possible_types(def.name())
                        .iter()
                        .filter_map(|name| p.schema.type_by_name(name))
                        .map(type_value)
                        .collect(),
                ),
                _ => Value::Null,
            })
        })
        .field("__Type/enumValues", |p| {
            let Some(TypeDefinition::Enum(enum_type)) = named_type(p) else {
                return Ok(Value::Null);
            };
            let include_deprecated = include_deprecated(p);
            Ok(Value::list(
                enum_type
                    .values
                    .values()
                    .map(|v| &v.item)
                    .filter(|v| include_deprecated || !v.deprecation.is_deprecated())
                    .map(|v| {
                        graphql_value!({
                            "name": (v.name.item.as_str()),
                            "description": (v.description.as_deref()),
                            "isDeprecated": (v.deprecation.is_deprecated()),
                            "deprecationReason": (v.deprecation.reason().map(ArcStr::as_str)),
                        })
                    })
                    .collect(),
            ))
        })
        .field("__Type/inputFields", |p| {
            Ok(match named_type(p) {
                Some(TypeDefinition::InputObject(input)) => Value::list(
                    input
                        .fields
                        .values()
                        .map(|f| input_value(p.schema, &f.item))
                        .collect(),
                ),
                _ => Value::Null,
            })
        });

    for def in schema.types() {
        if let TypeDefinition::Object(object) = def {
            resolvers.insert(
                format!("{}/__typename", object.name.item),
                FieldResolver::new(|p| Ok(p.object_type.name.item.as_str().into())),
            );
        }
    }

    resolvers
}

/// The named type a `__Type` value describes, `None` for wrapping types.
fn named_type<'s, CtxT>(params: &ResolveParams<'s, CtxT>) -> Option<TypeDefinition<'s>> {
    let name = params.source.field("name")?;
    params.schema.type_by_name(name.as_string_value()?)
}

fn include_deprecated<CtxT>(params: &ResolveParams<'_, CtxT>) -> bool {
    params
        .arg("includeDeprecated")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// The eager part of a `__Type` describing a named type.
fn type_value(def: TypeDefinition<'_>) -> Value {
    graphql_value!({
        "kind": (def.kind().as_str()),
        "name": (def.name().as_str()),
        "description": (def.description()),
    })
}

/// A `__Type` describing a possibly wrapped type literal.
fn type_ref_value(schema: &Schema, ty: &Type) -> Value {
    match ty {
        Type::Named(name) => schema.type_by_name(name).map_or(Value::Null, type_value),
        Type::List(inner) => graphql_value!({
            "kind": (TypeKind::List.as_str()),
            "name": null,
            "ofType": (type_ref_value(schema, inner)),
        }),
        Type::NonNull(inner) => graphql_value!({
            "kind": (TypeKind::NonNull.as_str()),
            "name": null,
            "ofType": (type_ref_value(schema, inner)),
        }),
    }
}

fn field_value(schema: &Schema, field: &FieldDefinition) -> Value {
    graphql_value!({
        "name": (field.name.item.as_str()),
        "description": (field.description.as_deref()),
        "args": (Value::list(
            field
                .arguments
                .values()
                .map(|arg| input_value(schema, &arg.item))
                .collect(),
        )),
        "type": (type_ref_value(schema, &field.field_type.item)),
        "isDeprecated": (field.deprecation.is_deprecated()),
        "deprecationReason": (field.deprecation.reason().map(ArcStr::as_str)),
    })
}

fn input_value(schema: &Schema, input: &InputValueDefinition) -> Value {
    graphql_value!({
        "name": (input.name.item.as_str()),
        "description": (input.description.as_deref()),
        "type": (type_ref_value(schema, &input.value_type.item)),
        "defaultValue": (input.default_value.as_ref().map(|v| v.item.to_string())),
    })
}

fn directive_value(schema: &Schema, name: &str, description: &str) -> Value {
    let condition_type = Type::NonNull(Box::new(Type::Named(arcstr::literal!("Boolean"))));
    graphql_value!({
        "name": name,
        "description": description,
        "args": [{
            "name": "if",
            "description": "The condition value",
            "type": (type_ref_value(schema, &condition_type)),
            "defaultValue": null,
        }],
        "onOperation": false,
        "onFragment": true,
        "onField": true,
    })
}

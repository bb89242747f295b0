use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};

use crate::{
    ast::{
        Definition, DeprecationStatus, Document, FieldDefinition, InputValueDefinition,
        InputValueDefinitions, ObjectTypeDefinition, Type, TypeDefinition,
    },
    introspection::INTROSPECTION_SCHEMA,
    parser::{ParseError, Spanning, parse_document_source},
    schema::meta::is_input_type,
};

/// Error while building a [`Schema`]
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum SchemaError {
    /// The schema source could not be parsed.
    #[display("{_0}")]
    Parse(Spanning<ParseError>),

    /// No object type carries the name given for the query root.
    #[display("The QueryRoot \"{_0}\" could not be found")]
    MissingQueryRoot(#[error(not(source))] ArcStr),

    /// A mutation root name was given but no object type carries it.
    #[display("The MutationRoot \"{_0}\" could not be found")]
    MissingMutationRoot(#[error(not(source))] ArcStr),

    /// A type name is referenced but never defined.
    #[display("Unknown type {type_name} referenced by {referenced_by}")]
    UnknownType {
        /// The undefined name.
        type_name: ArcStr,
        /// Where the name is used, e.g. `Query.user` or `extend type`.
        referenced_by: String,
    },

    /// An argument or input field refers to an output-only type.
    #[display("Type {type_name} of {referenced_by} is not an input type")]
    NotAnInputType {
        /// The offending type name.
        type_name: ArcStr,
        /// The argument or input field using it.
        referenced_by: String,
    },

    /// A union lists a member which is not an object type.
    #[display("Union \"{union_name}\" member \"{member}\" is not an object type")]
    InvalidUnionMember {
        /// The union.
        union_name: ArcStr,
        /// The member which is not an object type.
        member: ArcStr,
    },

    /// An object type claims to implement something that is not an interface.
    #[display("Type \"{object}\" cannot implement \"{interface}\", which is not an interface type")]
    InvalidInterface {
        /// The implementing object type.
        object: ArcStr,
        /// The implemented name.
        interface: ArcStr,
    },

    /// A resolver was registered under a key not shaped like `Type/field`.
    #[display("Invalid resolver key \"{_0}\", expected \"TypeName/fieldName\"")]
    InvalidResolverKey(#[error(not(source))] String),
}

impl From<Spanning<ParseError>> for SchemaError {
    fn from(e: Spanning<ParseError>) -> Self {
        Self::Parse(e)
    }
}

/// A parsed and indexed schema
///
/// Holds the user's type definitions together with the introspection types,
/// and the names of the root operation types.
#[derive(Clone, Debug)]
pub struct Schema {
    document: Document,
    query_type_name: ArcStr,
    mutation_type_name: Option<ArcStr>,
}

impl Schema {
    /// Builds a schema out of SDL source.
    ///
    /// `query_root` must name an object type of `sdl`; `mutation_root`, when
    /// given, must as well. The introspection types are added, `extend type`
    /// definitions are merged into their base types, and the query root gains
    /// the `__schema` and `__type` fields.
    pub fn new(
        sdl: &str,
        query_root: &str,
        mutation_root: Option<&str>,
    ) -> Result<Self, SchemaError> {
        let source = format!("{sdl}\n{INTROSPECTION_SCHEMA}");
        let mut document = parse_document_source(&source)?;

        merge_extensions(&mut document)?;
        validate_references(&document)?;

        if document.object_type(query_root).is_none() {
            return Err(SchemaError::MissingQueryRoot(query_root.into()));
        }
        if let Some(mutation_root) = mutation_root {
            if document.object_type(mutation_root).is_none() {
                return Err(SchemaError::MissingMutationRoot(mutation_root.into()));
            }
        }

        add_introspection_fields(&mut document, query_root)?;
        document.index_possible_types();

        __dynql_trace!(
            "built schema with {} types",
            document.type_definitions().count(),
        );

        Ok(Self {
            document,
            query_type_name: query_root.into(),
            mutation_type_name: mutation_root.map(Into::into),
        })
    }

    /// The indexed document holding every type definition.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Name of the query root type.
    pub fn query_type_name(&self) -> &ArcStr {
        &self.query_type_name
    }

    /// Name of the mutation root type, if the schema has one.
    pub fn mutation_type_name(&self) -> Option<&ArcStr> {
        self.mutation_type_name.as_ref()
    }

    /// The query root type.
    pub fn query_type(&self) -> &ObjectTypeDefinition {
        self.document
            .object_type(&self.query_type_name)
            .expect("Query type does not exist in schema")
    }

    /// The mutation root type, if the schema has one.
    pub fn mutation_type(&self) -> Option<&ObjectTypeDefinition> {
        self.mutation_type_name.as_ref().map(|name| {
            self.document
                .object_type(name)
                .expect("Mutation type does not exist in schema")
        })
    }

    /// Looks up any named type.
    pub fn type_by_name(&self, name: &str) -> Option<TypeDefinition<'_>> {
        self.document.type_definition(name)
    }

    /// All named types, user types first, then the introspection ones.
    pub fn types(&self) -> impl Iterator<Item = TypeDefinition<'_>> {
        self.document.type_definitions()
    }

    /// Looks up the definition of a field on an object or interface type.
    pub fn field_definition(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.type_by_name(type_name)?
            .fields()?
            .get(field_name)
            .map(|f| &f.item)
    }

    /// Names of the object types an abstract type may resolve to.
    pub fn possible_types(&self, abstract_type: &str) -> &[ArcStr] {
        self.document.possible_types(abstract_type)
    }

    /// Whether `object_type` may stand in for `abstract_type`.
    pub fn is_possible_type(&self, abstract_type: &str, object_type: &str) -> bool {
        self.document.is_possible_type(abstract_type, object_type)
    }
}

fn merge_extensions(document: &mut Document) -> Result<(), SchemaError> {
    let extensions = document
        .extensions()
        .map(|ext| ext.item.definition.clone())
        .collect::<Vec<_>>();

    for ext in extensions {
        let base = document
            .definitions_mut()
            .iter_mut()
            .find_map(|def| match def {
                Definition::Object(obj) if obj.item.name.item == ext.name.item => {
                    Some(&mut obj.item)
                }
                _ => None,
            })
            .ok_or_else(|| SchemaError::UnknownType {
                type_name: ext.name.item.clone(),
                referenced_by: "extend type".into(),
            })?;

        for iface in ext.interfaces {
            if !base.implements(&iface.item) {
                base.interfaces.push(iface);
            }
        }
        for (name, field) in ext.fields {
            if base.fields.contains_key(&name) {
                return Err(SchemaError::Parse(Spanning::new(
                    field.item.name.span,
                    ParseError::DuplicateDefinition {
                        kind: "field",
                        name: name.to_string(),
                    },
                )));
            }
            base.fields.insert(name, field);
        }
    }

    Ok(())
}

fn validate_references(document: &Document) -> Result<(), SchemaError> {
    let check_output = |ty: &Type, referenced_by: &str| {
        let name = ty.innermost_name();
        match document.type_definition(name) {
            Some(_) => Ok(()),
            None => Err(SchemaError::UnknownType {
                type_name: name.into(),
                referenced_by: referenced_by.into(),
            }),
        }
    };
    let check_inputs = |owner: &str, inputs: &InputValueDefinitions| {
        inputs.values().try_for_each(|input| {
            let name = input.item.value_type.item.innermost_name();
            let referenced_by = || format!("{owner}({})", input.item.name.item);
            match document.type_definition(name) {
                Some(def) if is_input_type(def) => Ok(()),
                Some(_) => Err(SchemaError::NotAnInputType {
                    type_name: name.into(),
                    referenced_by: referenced_by(),
                }),
                None => Err(SchemaError::UnknownType {
                    type_name: name.into(),
                    referenced_by: referenced_by(),
                }),
            }
        })
    };

    for def in document.type_definitions() {
        let type_name = def.name();
        if let Some(fields) = def.fields() {
            for (field_name, field) in fields {
                let owner = format!("{type_name}.{field_name}");
                check_output(&field.item.field_type.item, &owner)?;
                check_inputs(&owner, &field.item.arguments)?;
            }
        }
        match def {
            TypeDefinition::Object(obj) => {
                for iface in &obj.interfaces {
                    match document.type_definition(&iface.item) {
                        Some(TypeDefinition::Interface(_)) => {}
                        Some(_) => {
                            return Err(SchemaError::InvalidInterface {
                                object: type_name.clone(),
                                interface: iface.item.clone(),
                            });
                        }
                        None => {
                            return Err(SchemaError::UnknownType {
                                type_name: iface.item.clone(),
                                referenced_by: type_name.to_string(),
                            });
                        }
                    }
                }
            }
            TypeDefinition::Union(union) => {
                for member in &union.members {
                    match document.type_definition(&member.item) {
                        Some(TypeDefinition::Object(_)) => {}
                        Some(_) => {
                            return Err(SchemaError::InvalidUnionMember {
                                union_name: type_name.clone(),
                                member: member.item.clone(),
                            });
                        }
                        None => {
                            return Err(SchemaError::UnknownType {
                                type_name: member.item.clone(),
                                referenced_by: type_name.to_string(),
                            });
                        }
                    }
                }
            }
            TypeDefinition::InputObject(input) => check_inputs(type_name, &input.fields)?,
            TypeDefinition::Scalar(_) | TypeDefinition::Interface(_) | TypeDefinition::Enum(_) => {}
        }
    }

    Ok(())
}

fn add_introspection_fields(document: &mut Document, query_root: &str) -> Result<(), SchemaError> {
    let schema_field = FieldDefinition {
        name: Spanning::unlocated(arcstr::literal!("__schema")),
        description: Some("The GraphQL schema".into()),
        arguments: InputValueDefinitions::new(),
        field_type: Spanning::unlocated(Type::NonNull(Box::new(Type::Named(
            arcstr::literal!("__Schema"),
        )))),
        deprecation: DeprecationStatus::Current,
    };
    let name_argument = InputValueDefinition {
        name: Spanning::unlocated(arcstr::literal!("name")),
        description: Some("The name of the Type being inspected".into()),
        value_type: Spanning::unlocated(Type::NonNull(Box::new(Type::Named(
            arcstr::literal!("String"),
        )))),
        default_value: None,
    };
    let type_field = FieldDefinition {
        name: Spanning::unlocated(arcstr::literal!("__type")),
        description: Some("GraphQL Type introspection information".into()),
        arguments: InputValueDefinitions::from([(
            name_argument.name.item.clone(),
            Spanning::unlocated(name_argument),
        )]),
        field_type: Spanning::unlocated(Type::Named(arcstr::literal!("__Type"))),
        deprecation: DeprecationStatus::Current,
    };

    let root = document
        .definitions_mut()
        .iter_mut()
        .find_map(|def| match def {
            Definition::Object(obj) if obj.item.name.item == query_root => Some(&mut obj.item),
            _ => None,
        })
        .ok_or_else(|| SchemaError::MissingQueryRoot(query_root.into()))?;

    for field in [schema_field, type_field] {
        if let Some(existing) = root.fields.get(&field.name.item) {
            return Err(SchemaError::Parse(Spanning::new(
                existing.item.name.span,
                ParseError::DuplicateDefinition {
                    kind: "field",
                    name: field.name.item.to_string(),
                },
            )));
        }
        root.fields
            .insert(field.name.item.clone(), Spanning::unlocated(field));
    }

    Ok(())
}

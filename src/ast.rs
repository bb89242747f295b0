//! Syntax tree of queries and schema definitions

use std::fmt;

use arcstr::ArcStr;
use fnv::FnvHashMap;
use indexmap::IndexMap;

use crate::{
    parser::{ParseError, Span, Spanning},
    schema::TypeKind,
};

/// A type literal in the syntax tree
///
/// This enum carries no semantic information and might refer to types that do
/// not exist.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Type {
    /// A nullable named type, e.g. `String`
    Named(ArcStr),
    /// A nullable list type, e.g. `[String]`
    ///
    /// The list itself is what's nullable, the containing type might be non-null.
    List(Box<Type>),
    /// A non-null wrapper around another type, e.g. `String!` or `[Int]!`
    NonNull(Box<Type>),
}

impl Type {
    /// Get the name of a named type.
    ///
    /// Only applies to named types, possibly wrapped into a non-null; lists
    /// will return `None`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(n) => Some(n),
            Self::NonNull(t) => t.name(),
            Self::List(_) => None,
        }
    }

    /// Get the innermost name by unpacking lists
    ///
    /// All type literals contain exactly one named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(n) => n,
            Self::List(t) | Self::NonNull(t) => t.innermost_name(),
        }
    }

    /// Determines if a type only can represent non-null values.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Strips the outermost non-null wrapper, if any.
    pub fn nullable(&self) -> &Self {
        match self {
            Self::NonNull(t) => t,
            t => t,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNull(t) => write!(f, "{t}!"),
        }
    }
}

/// A value literal in the syntax tree.
///
/// Appears as argument values, variable defaults and input field defaults.
/// Lists and objects are _spanned_, i.e. they contain a reference to their
/// position in the source file, if available.
#[derive(Clone, Debug, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum InputValue {
    Null,
    Int(i32),
    Float(f32),
    String(String),
    Boolean(bool),
    Enum(String),
    Variable(String),
    List(Vec<Spanning<InputValue>>),
    Object(IndexMap<ArcStr, ObjectField>),
}

/// A single `name: value` entry of an object literal.
#[derive(Clone, Debug, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct ObjectField {
    pub name: Spanning<ArcStr>,
    pub value: Spanning<InputValue>,
}

impl InputValue {
    /// Construct a `null` value.
    pub fn null() -> Self {
        Self::Null
    }

    /// Construct an enum value.
    pub fn enum_value<T: AsRef<str>>(s: T) -> Self {
        Self::Enum(s.as_ref().into())
    }

    /// Construct a variable value.
    pub fn variable<T: AsRef<str>>(v: T) -> Self {
        Self::Variable(v.as_ref().into())
    }

    /// Construct a [`Spanning::unlocated`] list.
    pub fn list(l: Vec<Self>) -> Self {
        Self::List(l.into_iter().map(Spanning::unlocated).collect())
    }

    /// Construct a [`Spanning::unlocated`] object.
    pub fn object<K, I>(o: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(
            o.into_iter()
                .map(|(k, v)| {
                    let name = ArcStr::from(k.as_ref());
                    let field = ObjectField {
                        name: Spanning::unlocated(name.clone()),
                        value: Spanning::unlocated(v),
                    };
                    (name, field)
                })
                .collect(),
        )
    }

    /// Does the value represent a `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Does the value represent a variable?
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// View the underlying enum value, if present.
    pub fn as_enum_value(&self) -> Option<&str> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// View the underlying string value, if present.
    pub fn as_string_value(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a field of an object literal by name.
    pub fn object_field(&self, name: &str) -> Option<&Spanning<InputValue>> {
        match self {
            Self::Object(o) => o.get(name).map(|f| &f.value),
            _ => None,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\r' => write!(f, "\\r")?,
                        '\t' => write!(f, "\\t")?,
                        c if c < ' ' => write!(f, "\\u{:04X}", c as u32)?,
                        c => write!(f, "{c}")?,
                    }
                }
                write!(f, "\"")
            }
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Enum(v) => write!(f, "{v}"),
            Self::Variable(v) => write!(f, "${v}"),
            Self::List(v) => {
                write!(f, "[")?;
                for (i, spanning) in v.iter().enumerate() {
                    spanning.item.fmt(f)?;
                    if i < v.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "]")
            }
            Self::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    write!(f, "{k}: ")?;
                    v.value.item.fmt(f)?;
                    if i < o.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

/// Arguments of a field or directive, indexed by name in source order.
pub type Arguments = IndexMap<ArcStr, Argument>;

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Argument {
    pub name: Spanning<ArcStr>,
    pub value: Spanning<InputValue>,
}

/// Variable definitions of an operation, indexed by name (without `$`).
pub type VariableDefinitions = IndexMap<ArcStr, VariableDefinition>;

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct VariableDefinition {
    pub name: Spanning<ArcStr>,
    pub var_type: Spanning<Type>,
    pub default_value: Option<Spanning<InputValue>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Directive {
    pub name: Spanning<ArcStr>,
    pub arguments: Option<Spanning<Arguments>>,
}

impl Directive {
    /// Looks up an argument value by name.
    pub fn argument(&self, name: &str) -> Option<&Spanning<InputValue>> {
        self.arguments
            .as_ref()
            .and_then(|args| args.item.get(name))
            .map(|arg| &arg.value)
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Field {
    pub alias: Option<Spanning<ArcStr>>,
    pub name: Spanning<ArcStr>,
    pub arguments: Option<Spanning<Arguments>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub selection_set: Option<Vec<Selection>>,
}

impl Field {
    /// The key under which this field appears in the response.
    pub fn response_key(&self) -> &ArcStr {
        &self.alias.as_ref().unwrap_or(&self.name).item
    }

    /// Looks up an argument value by name.
    pub fn argument(&self, name: &str) -> Option<&Spanning<InputValue>> {
        self.arguments
            .as_ref()
            .and_then(|args| args.item.get(name))
            .map(|arg| &arg.value)
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct FragmentSpread {
    pub name: Spanning<ArcStr>,
    pub directives: Option<Vec<Spanning<Directive>>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct InlineFragment {
    pub type_condition: Option<Spanning<ArcStr>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub selection_set: Vec<Selection>,
}

/// Entry in a GraphQL selection set
///
/// This enum represents one of the three variants of a selection that exists
/// in GraphQL: a field, a fragment spread, or an inline fragment. Each of the
/// variants references their location in the query source.
///
/// ```text
/// {
///   field(withArg: 123) { subField }
///   ...fragmentSpread
///   ...on User {
///     inlineFragmentField
///   }
/// }
/// ```
#[derive(Clone, PartialEq, Debug)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum Selection {
    Field(Spanning<Field>),
    FragmentSpread(Spanning<FragmentSpread>),
    InlineFragment(Spanning<InlineFragment>),
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationType {
    Query,
    Mutation,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Operation {
    pub operation_type: OperationType,
    pub name: Option<Spanning<ArcStr>>,
    pub variable_definitions: Option<Spanning<VariableDefinitions>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub selection_set: Vec<Selection>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Fragment {
    pub name: Spanning<ArcStr>,
    pub type_condition: Spanning<ArcStr>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub selection_set: Vec<Selection>,
}

/// Whether a field or enum value is deprecated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum DeprecationStatus {
    /// The field/variant is not deprecated.
    #[default]
    Current,

    /// The field/variant is deprecated, with an optional reason
    Deprecated(Option<ArcStr>),
}

impl DeprecationStatus {
    /// If this deprecation status indicates the item is deprecated.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Deprecated(_))
    }

    /// An optional reason for the deprecation, or none if `Current`.
    pub fn reason(&self) -> Option<&ArcStr> {
        match self {
            Self::Current => None,
            Self::Deprecated(rsn) => rsn.as_ref(),
        }
    }
}

/// Fields of an object or interface type, indexed by name in source order.
pub type FieldDefinitions = IndexMap<ArcStr, Spanning<FieldDefinition>>;

/// Arguments or input fields, indexed by name in source order.
pub type InputValueDefinitions = IndexMap<ArcStr, Spanning<InputValueDefinition>>;

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct ObjectTypeDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
    pub interfaces: Vec<Spanning<ArcStr>>,
    pub fields: FieldDefinitions,
}

impl ObjectTypeDefinition {
    /// Whether this object type declares that it implements `interface`.
    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i.item == interface)
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct FieldDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
    pub arguments: InputValueDefinitions,
    pub field_type: Spanning<Type>,
    pub deprecation: DeprecationStatus,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct InputValueDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
    pub value_type: Spanning<Type>,
    pub default_value: Option<Spanning<InputValue>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct InterfaceTypeDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
    pub fields: FieldDefinitions,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct UnionTypeDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
    pub members: Vec<Spanning<ArcStr>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct ScalarTypeDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct EnumTypeDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
    pub values: IndexMap<ArcStr, Spanning<EnumValueDefinition>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct EnumValueDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
    pub deprecation: DeprecationStatus,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct InputObjectTypeDefinition {
    pub name: Spanning<ArcStr>,
    pub description: Option<String>,
    pub fields: InputValueDefinitions,
}

/// `extend type T { ... }`, whose fields get merged into `T`.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct TypeExtensionDefinition {
    pub definition: ObjectTypeDefinition,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub enum Definition {
    Operation(Spanning<Operation>),
    Fragment(Spanning<Fragment>),
    Object(Spanning<ObjectTypeDefinition>),
    Interface(Spanning<InterfaceTypeDefinition>),
    Union(Spanning<UnionTypeDefinition>),
    Scalar(Spanning<ScalarTypeDefinition>),
    Enum(Spanning<EnumTypeDefinition>),
    InputObject(Spanning<InputObjectTypeDefinition>),
    Extension(Spanning<TypeExtensionDefinition>),
}

/// Borrowed view of any named type definition of a [`Document`].
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug)]
pub enum TypeDefinition<'a> {
    Scalar(&'a ScalarTypeDefinition),
    Object(&'a ObjectTypeDefinition),
    Interface(&'a InterfaceTypeDefinition),
    Union(&'a UnionTypeDefinition),
    Enum(&'a EnumTypeDefinition),
    InputObject(&'a InputObjectTypeDefinition),
}

impl<'a> TypeDefinition<'a> {
    /// Name of the defined type.
    pub fn name(&self) -> &'a ArcStr {
        match *self {
            Self::Scalar(t) => &t.name.item,
            Self::Object(t) => &t.name.item,
            Self::Interface(t) => &t.name.item,
            Self::Union(t) => &t.name.item,
            Self::Enum(t) => &t.name.item,
            Self::InputObject(t) => &t.name.item,
        }
    }

    /// Description collected from `##` comments, if any.
    pub fn description(&self) -> Option<&'a str> {
        match *self {
            Self::Scalar(t) => t.description.as_deref(),
            Self::Object(t) => t.description.as_deref(),
            Self::Interface(t) => t.description.as_deref(),
            Self::Union(t) => t.description.as_deref(),
            Self::Enum(t) => t.description.as_deref(),
            Self::InputObject(t) => t.description.as_deref(),
        }
    }

    /// Introspection kind of the defined type.
    pub fn kind(&self) -> TypeKind {
        match *self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::Enum(_) => TypeKind::Enum,
            Self::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Output fields, for object and interface types only.
    pub fn fields(&self) -> Option<&'a FieldDefinitions> {
        match *self {
            Self::Object(t) => Some(&t.fields),
            Self::Interface(t) => Some(&t.fields),
            _ => None,
        }
    }

    /// Whether this is an interface or union type.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }
}

/// A parsed GraphQL document together with its lookup indices.
///
/// The indices are built once by [`Document::new`] and map names to positions
/// in [`Document::definitions`].
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    definitions: Vec<Definition>,
    span: Span,
    types: FnvHashMap<ArcStr, usize>,
    fragments: FnvHashMap<ArcStr, usize>,
    operations: FnvHashMap<ArcStr, usize>,
    extensions: Vec<usize>,
    possible_types: FnvHashMap<ArcStr, Vec<ArcStr>>,
}

impl Document {
    /// Indexes `definitions`, rejecting names defined more than once.
    pub fn new(definitions: Vec<Definition>, span: Span) -> Result<Self, Spanning<ParseError>> {
        let mut doc = Self {
            definitions,
            span,
            types: FnvHashMap::default(),
            fragments: FnvHashMap::default(),
            operations: FnvHashMap::default(),
            extensions: Vec::new(),
            possible_types: FnvHashMap::default(),
        };

        for (idx, def) in doc.definitions.iter().enumerate() {
            let (index, kind, name) = match def {
                Definition::Operation(op) => match &op.item.name {
                    Some(name) => (&mut doc.operations, "operation", name),
                    None => continue,
                },
                Definition::Fragment(f) => (&mut doc.fragments, "fragment", &f.item.name),
                Definition::Object(t) => (&mut doc.types, "type", &t.item.name),
                Definition::Interface(t) => (&mut doc.types, "type", &t.item.name),
                Definition::Union(t) => (&mut doc.types, "type", &t.item.name),
                Definition::Scalar(t) => (&mut doc.types, "type", &t.item.name),
                Definition::Enum(t) => (&mut doc.types, "type", &t.item.name),
                Definition::InputObject(t) => (&mut doc.types, "type", &t.item.name),
                Definition::Extension(_) => {
                    doc.extensions.push(idx);
                    continue;
                }
            };
            if index.insert(name.item.clone(), idx).is_some() {
                return Err(Spanning::new(
                    name.span,
                    ParseError::DuplicateDefinition {
                        kind,
                        name: name.item.to_string(),
                    },
                ));
            }
        }

        doc.index_possible_types();

        Ok(doc)
    }

    /// Rebuilds the reverse index from interfaces and unions to the object
    /// types implementing or belonging to them.
    pub(crate) fn index_possible_types(&mut self) {
        let mut possible_types = FnvHashMap::<ArcStr, Vec<ArcStr>>::default();
        for def in &self.definitions {
            match def {
                Definition::Object(obj) => {
                    for iface in &obj.item.interfaces {
                        let bucket = possible_types.entry(iface.item.clone()).or_default();
                        if !bucket.contains(&obj.item.name.item) {
                            bucket.push(obj.item.name.item.clone());
                        }
                    }
                }
                Definition::Union(union) => {
                    let bucket = possible_types.entry(union.item.name.item.clone()).or_default();
                    for member in &union.item.members {
                        if !bucket.contains(&member.item) {
                            bucket.push(member.item.clone());
                        }
                    }
                }
                _ => {}
            }
        }
        self.possible_types = possible_types;
    }

    /// All definitions in source order.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub(crate) fn definitions_mut(&mut self) -> &mut [Definition] {
        &mut self.definitions
    }

    /// The span of the whole document.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// All operations, named or not, in source order.
    pub fn operations(&self) -> impl Iterator<Item = &Spanning<Operation>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            _ => None,
        })
    }

    /// Looks up a named operation.
    pub fn operation(&self, name: &str) -> Option<&Spanning<Operation>> {
        match self.definitions.get(*self.operations.get(name)?)? {
            Definition::Operation(op) => Some(op),
            _ => None,
        }
    }

    /// Looks up a fragment definition.
    pub fn fragment(&self, name: &str) -> Option<&Spanning<Fragment>> {
        match self.definitions.get(*self.fragments.get(name)?)? {
            Definition::Fragment(f) => Some(f),
            _ => None,
        }
    }

    /// Type extensions in source order.
    pub fn extensions(&self) -> impl Iterator<Item = &Spanning<TypeExtensionDefinition>> {
        self.extensions
            .iter()
            .filter_map(|&idx| match &self.definitions[idx] {
                Definition::Extension(ext) => Some(ext),
                _ => None,
            })
    }

    /// Looks up any named type definition.
    pub fn type_definition(&self, name: &str) -> Option<TypeDefinition<'_>> {
        Some(match self.definitions.get(*self.types.get(name)?)? {
            Definition::Object(t) => TypeDefinition::Object(&t.item),
            Definition::Interface(t) => TypeDefinition::Interface(&t.item),
            Definition::Union(t) => TypeDefinition::Union(&t.item),
            Definition::Scalar(t) => TypeDefinition::Scalar(&t.item),
            Definition::Enum(t) => TypeDefinition::Enum(&t.item),
            Definition::InputObject(t) => TypeDefinition::InputObject(&t.item),
            Definition::Operation(_) | Definition::Fragment(_) | Definition::Extension(_) => {
                return None;
            }
        })
    }

    /// All named type definitions in source order.
    pub fn type_definitions(&self) -> impl Iterator<Item = TypeDefinition<'_>> {
        self.definitions.iter().filter_map(|def| {
            Some(match def {
                Definition::Object(t) => TypeDefinition::Object(&t.item),
                Definition::Interface(t) => TypeDefinition::Interface(&t.item),
                Definition::Union(t) => TypeDefinition::Union(&t.item),
                Definition::Scalar(t) => TypeDefinition::Scalar(&t.item),
                Definition::Enum(t) => TypeDefinition::Enum(&t.item),
                Definition::InputObject(t) => TypeDefinition::InputObject(&t.item),
                Definition::Operation(_) | Definition::Fragment(_) | Definition::Extension(_) => {
                    return None;
                }
            })
        })
    }

    /// Looks up an object type definition.
    pub fn object_type(&self, name: &str) -> Option<&ObjectTypeDefinition> {
        match self.type_definition(name)? {
            TypeDefinition::Object(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up an interface type definition.
    pub fn interface_type(&self, name: &str) -> Option<&InterfaceTypeDefinition> {
        match self.type_definition(name)? {
            TypeDefinition::Interface(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up a union type definition.
    pub fn union_type(&self, name: &str) -> Option<&UnionTypeDefinition> {
        match self.type_definition(name)? {
            TypeDefinition::Union(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up a scalar type definition.
    pub fn scalar_type(&self, name: &str) -> Option<&ScalarTypeDefinition> {
        match self.type_definition(name)? {
            TypeDefinition::Scalar(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up an enum type definition.
    pub fn enum_type(&self, name: &str) -> Option<&EnumTypeDefinition> {
        match self.type_definition(name)? {
            TypeDefinition::Enum(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up an input object type definition.
    pub fn input_object_type(&self, name: &str) -> Option<&InputObjectTypeDefinition> {
        match self.type_definition(name)? {
            TypeDefinition::InputObject(t) => Some(t),
            _ => None,
        }
    }

    /// Names of the object types implementing the interface, or belonging to
    /// the union, called `name`.
    pub fn possible_types(&self, name: &str) -> &[ArcStr] {
        self.possible_types.get(name).map_or(&[], Vec::as_slice)
    }

    /// Whether `object_type` is one of the possible types of `abstract_type`.
    pub fn is_possible_type(&self, abstract_type: &str, object_type: &str) -> bool {
        self.possible_types(abstract_type)
            .iter()
            .any(|t| t == object_type)
    }
}

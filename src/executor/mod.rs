//! Resolution of requests against a schema and a set of resolvers

mod input_value;
mod resolve;

use std::fmt::Display;

use arcstr::ArcStr;
use fnv::FnvHashMap;

use crate::{
    GraphQLError,
    ast::{
        DeprecationStatus, Document, Field, FieldDefinition, InputValue, InputValueDefinitions,
        ObjectTypeDefinition, Operation, OperationType, Type,
    },
    introspection::{self, INTROSPECTION_QUERY},
    parser::{SourcePosition, Span, Spanning, excerpt, parse_document_source},
    schema::{Schema, SchemaError},
    types::name::Name,
    value::{Object, Value},
};

use self::resolve::Execution;

/// Chain of response keys from the operation root to the field being
/// resolved
#[derive(Clone, Debug)]
pub enum FieldPath<'a> {
    /// The operation itself.
    Root(SourcePosition),
    /// A field, with its location and the path of its parent.
    Field(&'a str, SourcePosition, &'a FieldPath<'a>),
}

impl FieldPath<'_> {
    fn construct_path(&self, acc: &mut Vec<String>) {
        match self {
            Self::Root(_) => (),
            Self::Field(name, _, parent) => {
                parent.construct_path(acc);
                acc.push((*name).into());
            }
        }
    }

    fn location(&self) -> SourcePosition {
        match self {
            Self::Root(pos) | Self::Field(_, pos, _) => *pos,
        }
    }
}

/// Error type for errors that occur during query execution
///
/// All execution errors contain the source position in the query of the field
/// that failed to resolve. It also contains the field stack.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionError {
    location: SourcePosition,
    path: Vec<String>,
    error: FieldError,
}

impl ExecutionError {
    /// Construct a new execution error occuring at the beginning of the query
    pub fn at_origin(error: FieldError) -> Self {
        Self {
            location: SourcePosition::new_origin(),
            path: Vec::new(),
            error,
        }
    }

    #[doc(hidden)]
    pub fn new(location: SourcePosition, path: &[&str], error: FieldError) -> Self {
        Self {
            location,
            path: path.iter().map(|s| (*s).into()).collect(),
            error,
        }
    }

    /// The error message
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    /// The source location _in the query_ of the field that failed to resolve
    pub fn location(&self) -> &SourcePosition {
        &self.location
    }

    /// The path of fields leading to the field that generated this error
    pub fn path(&self) -> &[String] {
        &self.path
    }
}

/// Error type for errors that occur during field resolution
///
/// Field errors are represented by a human-readable error message and an
/// optional `Value` structure containing additional information.
///
/// They can be converted to from any type that implements `std::fmt::Display`,
/// which makes error chaining with the `?` operator a breeze:
///
/// ```rust
/// # use dynql::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Value,
}

impl<T: Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            extensions: Value::Null,
        }
    }
}

impl FieldError {
    /// Construct a new [`FieldError`] with additional data.
    ///
    /// You can use the [`graphql_value!`] macro for construction:
    /// ```rust
    /// use dynql::{graphql_value, FieldError};
    ///
    /// # let _: FieldError =
    /// FieldError::new(
    ///     "Could not open connection to the database",
    ///     graphql_value!({"internal_error": "Connection refused"}),
    /// );
    /// ```
    ///
    /// The `extensions` parameter will be added to the `"extensions"` field of
    /// the `"errors"` object in response:
    /// ```json
    /// {
    ///   "errors": [
    ///     "message": "Could not open connection to the database",
    ///     "locations": [{"line": 2, "column": 4}],
    ///     "extensions": {
    ///       "internal_error": "Connection refused"
    ///     }
    ///   ]
    /// }
    /// ```
    ///
    /// If the argument is [`Value::Null`], then no extra data will be included.
    ///
    /// [`graphql_value!`]: macro@crate::graphql_value
    pub fn new<T: Display>(e: T, extensions: Value) -> Self {
        Self {
            message: e.to_string(),
            extensions,
        }
    }

    /// Returns `"message"` field of this [`FieldError`].
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `"extensions"` field of this [`FieldError`].
    ///
    /// If there is no `"extensions"`, then [`Value::Null`] will be returned.
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

/// The result of resolving the value of a field
pub type FieldResult<T> = Result<T, FieldError>;

/// The map of variables used for substitution during query execution
pub type Variables = Object;

/// Everything a resolver gets to see about the field it resolves.
pub struct ResolveParams<'a, CtxT> {
    /// The executor running the request.
    pub executor: &'a Executor<CtxT>,
    /// The parsed request.
    pub document: &'a Document,
    /// The schema the request runs against.
    pub schema: &'a Schema,
    /// The application context passed to [`Executor::execute`].
    pub context: &'a CtxT,
    /// The value of the parent object.
    pub source: &'a Value,
    /// Coerced argument values, nullish ones left out.
    pub args: &'a Object,
    /// The field being resolved, as written in the request.
    pub field: &'a Spanning<Field>,
    /// The object type declaring the field.
    pub object_type: &'a ObjectTypeDefinition,
}

impl<CtxT> ResolveParams<'_, CtxT> {
    /// Looks up a coerced argument value by name.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get_field_value(name)
    }
}

/// Resolver callback of a single field.
pub type ResolveFn<CtxT> = dyn Fn(&ResolveParams<'_, CtxT>) -> FieldResult<Value> + Send + Sync;

/// Post-processing callback of a single field.
pub type AfterFn<CtxT> =
    dyn Fn(&ResolveParams<'_, CtxT>, Value) -> FieldResult<Value> + Send + Sync;

/// Callback naming the concrete object type of an interface or union value.
pub type ResolveTypeFn = dyn Fn(&Value) -> Option<String> + Send + Sync;

/// Callback deciding which values count as absent.
pub type NullishFn = dyn Fn(&Value) -> bool + Send + Sync;

/// Callback rendering an [`ExecutionError`] for the response, given the
/// request source.
pub type ErrorSerializer = dyn Fn(&ExecutionError, &str) -> Value + Send + Sync;

/// A field resolver with optional hooks around it
///
/// `before` runs first and its result replaces the source value handed to
/// `resolve`; `after` receives the resolved value and may replace it. An
/// error from any of them nulls the field.
pub struct FieldResolver<CtxT> {
    before: Option<Box<ResolveFn<CtxT>>>,
    resolve: Box<ResolveFn<CtxT>>,
    after: Option<Box<AfterFn<CtxT>>>,
}

impl<CtxT> FieldResolver<CtxT> {
    /// Wraps a plain resolver callback.
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn(&ResolveParams<'_, CtxT>) -> FieldResult<Value> + Send + Sync + 'static,
    {
        Self {
            before: None,
            resolve: Box::new(resolve),
            after: None,
        }
    }

    /// Sets the hook producing the source value for the resolver.
    #[must_use]
    pub fn before<F>(mut self, before: F) -> Self
    where
        F: Fn(&ResolveParams<'_, CtxT>) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.before = Some(Box::new(before));
        self
    }

    /// Sets the hook post-processing the resolved value.
    #[must_use]
    pub fn after<F>(mut self, after: F) -> Self
    where
        F: Fn(&ResolveParams<'_, CtxT>, Value) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.after = Some(Box::new(after));
        self
    }
}

/// Resolvers keyed by `"TypeName/fieldName"`
///
/// ```rust
/// # use dynql::{Resolvers, Value};
/// #
/// let resolvers = Resolvers::<()>::new()
///     .field("Query/hello", |_| Ok(Value::from("world")))
///     .field("Query/echo", |p| Ok(p.arg("text").cloned().unwrap_or(Value::Null)));
/// ```
pub struct Resolvers<CtxT> {
    entries: Vec<(String, FieldResolver<CtxT>)>,
}

impl<CtxT> Default for Resolvers<CtxT> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<CtxT> Resolvers<CtxT> {
    /// An empty set of resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plain resolver callback under `key`.
    #[must_use]
    pub fn field<F>(self, key: impl Into<String>, resolve: F) -> Self
    where
        F: Fn(&ResolveParams<'_, CtxT>) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.resolver(key, FieldResolver::new(resolve))
    }

    /// Registers a resolver with hooks under `key`.
    #[must_use]
    pub fn resolver(mut self, key: impl Into<String>, resolver: FieldResolver<CtxT>) -> Self {
        self.insert(key, resolver);
        self
    }

    /// Registers a resolver with hooks under `key`, replacing any earlier
    /// registration.
    pub fn insert(&mut self, key: impl Into<String>, resolver: FieldResolver<CtxT>) {
        self.entries.push((key.into(), resolver));
    }
}

/// Parsing and serialization callbacks of a user-defined scalar
///
/// `parse_value` receives variable values, `parse_literal` argument literals
/// written in the request, and `serialize` the values resolvers return for
/// fields of the scalar's type.
pub struct ScalarCallbacks<CtxT> {
    parse_value: Box<dyn Fn(&CtxT, &Value) -> FieldResult<Value> + Send + Sync>,
    parse_literal: Box<dyn Fn(&CtxT, &InputValue) -> FieldResult<Value> + Send + Sync>,
    serialize: Box<dyn Fn(&CtxT, &Value) -> FieldResult<Value> + Send + Sync>,
}

impl<CtxT> ScalarCallbacks<CtxT> {
    /// Bundles the callbacks of a scalar.
    pub fn new<P, L, S>(parse_value: P, parse_literal: L, serialize: S) -> Self
    where
        P: Fn(&CtxT, &Value) -> FieldResult<Value> + Send + Sync + 'static,
        L: Fn(&CtxT, &InputValue) -> FieldResult<Value> + Send + Sync + 'static,
        S: Fn(&CtxT, &Value) -> FieldResult<Value> + Send + Sync + 'static,
    {
        Self {
            parse_value: Box::new(parse_value),
            parse_literal: Box::new(parse_literal),
            serialize: Box::new(serialize),
        }
    }
}

/// Nullish policy treating only `null` as absent.
pub fn is_null(value: &Value) -> bool {
    value.is_null()
}

/// Nullish policy treating `null` and the empty string as absent.
pub fn is_null_or_empty(value: &Value) -> bool {
    matches!(value, Value::Null) || value.as_string_value() == Some("")
}

/// Reads the concrete type name from a `__typename` string field of the value.
///
/// Suitable as [`Executor::set_resolve_type`] callback for values carrying
/// their own type name.
pub fn typename_field(value: &Value) -> Option<String> {
    match value.field("__typename")? {
        Value::String(name) => Some(name),
        _ => None,
    }
}

/// Renders `{message, locations, path?, extensions?}`.
pub fn default_error_serializer(error: &ExecutionError, _source: &str) -> Value {
    let location = error.location();
    let mut record = Object::with_capacity(4);
    record.add_field("message", error.error().message().into());
    record.add_field(
        "locations",
        graphql_value!([{
            "line": (i32::try_from(location.line()).unwrap_or(i32::MAX)),
            "column": (i32::try_from(location.column()).unwrap_or(i32::MAX)),
        }]),
    );
    if !error.path().is_empty() {
        record.add_field(
            "path",
            Value::list(error.path().iter().map(|key| key.as_str().into()).collect()),
        );
    }
    if !error.error().extensions().is_null() {
        record.add_field("extensions", error.error().extensions().clone());
    }
    Value::Object(record)
}

/// Like [`default_error_serializer`], with an excerpt of the request source
/// underlining the failing token appended to the message.
pub fn verbose_error_serializer(error: &ExecutionError, source: &str) -> Value {
    let mut record = default_error_serializer(error, source);
    let span = token_span(source, *error.location());
    let message = format!("{}\n{}", error.error().message(), excerpt(source, &span));
    if let Some(record) = record.as_mut_object_value() {
        record.add_field("message", message.into());
    }
    record
}

/// Span of the name starting at `start`, or of a single character if there
/// is none.
fn token_span(source: &str, start: SourcePosition) -> Span {
    let len = source
        .get(start.index()..)
        .map_or(0, |rest| {
            rest.chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .count()
        })
        .max(1);
    Span {
        start,
        end: SourcePosition::new(start.index() + len, start.line(), start.column() + len),
    }
}

/// Query execution engine
///
/// Owns the schema, the resolvers keyed by type and field name, and the
/// policies applied while executing: user scalars, abstract type resolution,
/// what counts as null, and how errors are rendered. The executor is
/// read-only while requests run, so it can be shared between threads.
pub struct Executor<CtxT> {
    schema: Schema,
    resolvers: FnvHashMap<ArcStr, FnvHashMap<ArcStr, FieldResolver<CtxT>>>,
    scalars: FnvHashMap<ArcStr, ScalarCallbacks<CtxT>>,
    resolve_type: Box<ResolveTypeFn>,
    is_nullish: Box<NullishFn>,
    error_serializer: Box<ErrorSerializer>,
    typename_field: FieldDefinition,
}

impl<CtxT: 'static> Executor<CtxT> {
    /// Builds the schema out of `sdl` and indexes `resolvers` by type and
    /// field.
    ///
    /// The introspection resolvers and a `__typename` resolver for every
    /// object type are registered first, so user resolvers may override
    /// them.
    pub fn new(
        sdl: &str,
        query_root: &str,
        mutation_root: Option<&str>,
        resolvers: Resolvers<CtxT>,
    ) -> Result<Self, GraphQLError> {
        let schema = Schema::new(sdl, query_root, mutation_root)?;

        let mut index = FnvHashMap::<ArcStr, FnvHashMap<_, _>>::default();
        for (key, resolver) in introspection::resolvers(&schema)
            .entries
            .into_iter()
            .chain(resolvers.entries)
        {
            let (type_name, field_name) = key
                .split_once('/')
                .and_then(|(t, f)| Some((t.parse::<Name>().ok()?, f.parse::<Name>().ok()?)))
                .ok_or_else(|| SchemaError::InvalidResolverKey(key.clone()))?;
            if schema
                .field_definition(type_name.as_str(), field_name.as_str())
                .is_none()
                && field_name.as_str() != "__typename"
            {
                __dynql_warn!("resolver {key} does not match any field of the schema");
            }
            index
                .entry(type_name.into())
                .or_default()
                .insert(field_name.into(), resolver);
        }

        Ok(Self {
            schema,
            resolvers: index,
            scalars: FnvHashMap::default(),
            resolve_type: Box::new(|_| None),
            is_nullish: Box::new(is_null),
            error_serializer: Box::new(default_error_serializer),
            typename_field: FieldDefinition {
                name: Spanning::unlocated(arcstr::literal!("__typename")),
                description: None,
                arguments: InputValueDefinitions::new(),
                field_type: Spanning::unlocated(Type::NonNull(Box::new(Type::Named(
                    arcstr::literal!("String"),
                )))),
                deprecation: DeprecationStatus::Current,
            },
        })
    }
}

impl<CtxT> Executor<CtxT> {
    /// The schema requests run against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Registers parsing and serialization callbacks for the user-defined
    /// scalar `name`.
    ///
    /// Values of scalars without callbacks pass through unchanged.
    pub fn register_scalar(&mut self, name: &str, callbacks: ScalarCallbacks<CtxT>) {
        self.scalars.insert(name.into(), callbacks);
    }

    /// Sets the callback naming the concrete object type of values returned
    /// for interface and union fields.
    ///
    /// Returning `None` or an empty name nulls the field with an error. The
    /// default callback always does so; see [`typename_field`] for a ready
    /// made one.
    pub fn set_resolve_type<F>(&mut self, resolve_type: F)
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Box::new(resolve_type);
    }

    /// Sets the policy deciding which values count as absent, [`is_null`] by
    /// default.
    pub fn set_is_nullish<F>(&mut self, is_nullish: F)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.is_nullish = Box::new(is_nullish);
    }

    /// Sets how execution errors are rendered into the response,
    /// [`default_error_serializer`] by default.
    pub fn set_error_serializer<F>(&mut self, serializer: F)
    where
        F: Fn(&ExecutionError, &str) -> Value + Send + Sync + 'static,
    {
        self.error_serializer = Box::new(serializer);
    }

    /// Whether `value` counts as absent under the configured policy.
    pub fn is_nullish(&self, value: &Value) -> bool {
        (self.is_nullish)(value)
    }

    /// The resolver registered for `type_name/field_name`, if any.
    pub fn resolver(&self, type_name: &str, field_name: &str) -> Option<&FieldResolver<CtxT>> {
        self.resolvers.get(type_name)?.get(field_name)
    }

    /// Picks the operation of `document` to run.
    ///
    /// Without a name the document must contain exactly one operation.
    pub fn operation<'d>(
        &self,
        document: &'d Document,
        operation_name: Option<&str>,
    ) -> Result<&'d Spanning<Operation>, GraphQLError> {
        match operation_name.filter(|name| !name.is_empty()) {
            Some(name) => document
                .operation(name)
                .ok_or_else(|| GraphQLError::UnknownOperationName(name.into())),
            None => {
                let mut operations = document.operations();
                match (operations.next(), operations.next()) {
                    (Some(operation), None) => Ok(operation),
                    (None, _) => Err(GraphQLError::NoOperationProvided),
                    (Some(_), Some(_)) => Err(GraphQLError::MultipleOperationsProvided),
                }
            }
        }
    }

    /// Executes `request` and returns the response.
    ///
    /// The response is an object holding `data` and, if any field failed,
    /// `errors`. Failing to pick an operation yields a response holding only
    /// `errors`. Syntax errors in the request are returned as `Err`.
    pub fn execute(
        &self,
        context: &CtxT,
        request: &str,
        variables: &Variables,
        operation_name: Option<&str>,
    ) -> Result<Value, GraphQLError> {
        let document = parse_document_source(request)?;

        let operation = match self.operation(&document, operation_name) {
            Ok(operation) => operation,
            Err(e) => return Ok(error_response(&e)),
        };
        let root_type = match operation.item.operation_type {
            OperationType::Query => self.schema.query_type(),
            OperationType::Mutation => match self.schema.mutation_type() {
                Some(mutation_type) => mutation_type,
                None => return Ok(error_response(&GraphQLError::MutationsNotSupported)),
            },
        };

        __dynql_debug!(
            operation = ?operation.item.name.as_ref().map(|n| n.item.as_str()),
            kind = ?operation.item.operation_type,
            "executing operation"
        );

        let mut execution = Execution::new(self, context, &document);
        let coerced = execution.coerce_variable_values(operation, variables);
        execution.variables = coerced;

        let data = execution.execute_operation(operation, root_type);
        let errors = execution.into_errors();

        let mut response = Object::with_capacity(2);
        response.add_field("data", data);
        if !errors.is_empty() {
            response.add_field(
                "errors",
                Value::list(
                    errors
                        .iter()
                        .map(|e| (self.error_serializer)(e, request))
                        .collect(),
                ),
            );
        }
        Ok(Value::Object(response))
    }

    /// Like [`Executor::execute`], taking variables and returning the
    /// response as JSON.
    ///
    /// Variables other than a JSON object are ignored.
    pub fn execute_json(
        &self,
        context: &CtxT,
        request: &str,
        variables: serde_json::Value,
        operation_name: Option<&str>,
    ) -> Result<serde_json::Value, GraphQLError> {
        let variables = Value::from(variables).into_object().unwrap_or_default();
        self.execute(context, request, &variables, operation_name)
            .map(serde_json::Value::from)
    }

    /// Runs the standard introspection query and returns its `data`.
    pub fn introspect(&self, context: &CtxT) -> Result<Value, GraphQLError> {
        let response = self.execute(
            context,
            INTROSPECTION_QUERY,
            &Variables::default(),
            Some("IntrospectionQuery"),
        )?;
        Ok(response.field("data").unwrap_or(Value::Null))
    }

    /// Renders the introspection data as pretty-printed JSON.
    pub fn print_schema(&self, context: &CtxT) -> Result<String, GraphQLError> {
        let data = self.introspect(context)?;
        Ok(format!("{:#}", serde_json::Value::from(data)))
    }

    fn field_definition<'s>(
        &'s self,
        object_type: &'s ObjectTypeDefinition,
        field_name: &str,
    ) -> Option<&'s FieldDefinition> {
        if field_name == "__typename" {
            return Some(&self.typename_field);
        }
        object_type.fields.get(field_name).map(|f| &f.item)
    }
}

fn error_response(error: &GraphQLError) -> Value {
    __dynql_debug!("request failed: {error}");
    graphql_value!({ "errors": [{ "message": (error.to_string()) }] })
}

use std::sync::{PoisonError, RwLock};

use fnv::FnvHashSet;
use indexmap::IndexMap;

use super::{ExecutionError, Executor, FieldError, FieldPath, FieldResult, ResolveParams, Variables};
use crate::{
    ast::{
        Directive, Document, Field, FieldDefinition, ObjectTypeDefinition, Operation, Selection,
        Type, TypeDefinition,
    },
    parser::{SourcePosition, Spanning},
    schema::Schema,
    types::scalars::{BuiltinScalar, coerce_boolean, coerce_enum},
    value::{Object, Value},
};

/// A `null` in a non-null position, travelling up to the nearest nullable
/// field.
///
/// The error describing it has already been recorded.
#[derive(Debug)]
pub(super) struct Bubble;

/// Fields to resolve, grouped by response key in order of first appearance.
type GroupedFields<'r> = IndexMap<&'r str, Vec<&'r Spanning<Field>>>;

/// The field whose value is being completed.
struct FieldScope<'a, 'r> {
    parent_type: &'r ObjectTypeDefinition,
    field: &'r Spanning<Field>,
    selection_sets: &'a [&'r [Selection]],
    path: &'a FieldPath<'a>,
}

/// State of a single request
///
/// Borrows the executor and the parsed request; owns the coerced variables
/// and the errors recorded so far.
pub(super) struct Execution<'r, CtxT> {
    pub(super) executor: &'r Executor<CtxT>,
    pub(super) context: &'r CtxT,
    pub(super) document: &'r Document,
    pub(super) variables: Variables,
    errors: RwLock<Vec<ExecutionError>>,
}

impl<'r, CtxT> Execution<'r, CtxT> {
    pub(super) fn new(executor: &'r Executor<CtxT>, context: &'r CtxT, document: &'r Document) -> Self {
        Self {
            executor,
            context,
            document,
            variables: Variables::default(),
            errors: RwLock::new(Vec::new()),
        }
    }

    pub(super) fn schema(&self) -> &'r Schema {
        &self.executor.schema
    }

    /// The recorded errors, in recording order.
    pub(super) fn into_errors(self) -> Vec<ExecutionError> {
        self.errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `error` at the field `path` points to.
    pub(super) fn push_error(&self, error: FieldError, path: &FieldPath<'_>) {
        let mut keys = Vec::new();
        path.construct_path(&mut keys);
        self.push(ExecutionError {
            location: path.location(),
            path: keys,
            error,
        });
    }

    /// Records `error` at `location`, outside of any field.
    pub(super) fn push_error_at(&self, error: FieldError, location: SourcePosition) {
        self.push(ExecutionError {
            location,
            path: Vec::new(),
            error,
        });
    }

    fn push(&self, error: ExecutionError) {
        __dynql_debug!(
            path = ?error.path,
            location = %error.location,
            "{}",
            error.error.message
        );
        self.errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    /// Resolves the top-level selection set of `operation` against
    /// `root_type`.
    ///
    /// Fields are resolved one after another in source order, which is what
    /// mutations require.
    pub(super) fn execute_operation(
        &self,
        operation: &'r Spanning<Operation>,
        root_type: &'r ObjectTypeDefinition,
    ) -> Value {
        __dynql_span_trace!("execute_operation", root = %root_type.name.item);

        let mut groups = GroupedFields::default();
        self.collect_fields(
            root_type,
            &operation.item.selection_set,
            &mut FnvHashSet::default(),
            &mut groups,
        );

        let root = Value::Object(Object::default());
        let path = FieldPath::Root(operation.span.start);
        match self.execute_fields(root_type, &root, groups, &path) {
            Ok(data) => Value::Object(data),
            Err(Bubble) => Value::Null,
        }
    }

    /// Groups the fields of `selection_set` that apply to `object_type` by
    /// response key, expanding fragments.
    ///
    /// `@skip` and `@include` are honoured, each fragment is expanded at most
    /// once.
    pub(super) fn collect_fields(
        &self,
        object_type: &ObjectTypeDefinition,
        selection_set: &'r [Selection],
        visited_fragments: &mut FnvHashSet<&'r str>,
        groups: &mut GroupedFields<'r>,
    ) {
        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    if !self.should_include(field.item.directives.as_deref()) {
                        continue;
                    }
                    groups
                        .entry(field.item.response_key().as_str())
                        .or_default()
                        .push(field);
                }
                Selection::FragmentSpread(spread) => {
                    if !self.should_include(spread.item.directives.as_deref()) {
                        continue;
                    }
                    let name = spread.item.name.item.as_str();
                    if !visited_fragments.insert(name) {
                        continue;
                    }
                    let Some(fragment) = self.document.fragment(name) else {
                        continue;
                    };
                    if !self.should_include(fragment.item.directives.as_deref())
                        || !self.does_fragment_type_apply(object_type, &fragment.item.type_condition.item)
                    {
                        continue;
                    }
                    self.collect_fields(
                        object_type,
                        &fragment.item.selection_set,
                        visited_fragments,
                        groups,
                    );
                }
                Selection::InlineFragment(fragment) => {
                    if !self.should_include(fragment.item.directives.as_deref()) {
                        continue;
                    }
                    if let Some(type_condition) = &fragment.item.type_condition {
                        if !self.does_fragment_type_apply(object_type, &type_condition.item) {
                            continue;
                        }
                    }
                    self.collect_fields(
                        object_type,
                        &fragment.item.selection_set,
                        visited_fragments,
                        groups,
                    );
                }
            }
        }
    }

    fn should_include(&self, directives: Option<&[Spanning<Directive>]>) -> bool {
        directives.into_iter().flatten().all(|directive| {
            match directive.item.name.item.as_str() {
                "skip" => self.directive_condition(&directive.item) != Some(true),
                "include" => self.directive_condition(&directive.item) != Some(false),
                _ => true,
            }
        })
    }

    /// The `if` argument of a directive, `None` when missing or not a boolean.
    fn directive_condition(&self, directive: &Directive) -> Option<bool> {
        coerce_boolean(&self.value_from_literal(&directive.argument("if")?.item))
    }

    fn does_fragment_type_apply(&self, object_type: &ObjectTypeDefinition, type_condition: &str) -> bool {
        object_type.name.item == type_condition
            || self
                .schema()
                .is_possible_type(type_condition, &object_type.name.item)
    }

    fn execute_fields(
        &self,
        object_type: &'r ObjectTypeDefinition,
        source: &Value,
        groups: GroupedFields<'r>,
        path: &FieldPath<'_>,
    ) -> Result<Object, Bubble> {
        let mut result = Object::with_capacity(groups.len());
        for (response_key, fields) in groups {
            let field = fields[0];
            let Some(field_def) = self
                .executor
                .field_definition(object_type, &field.item.name.item)
            else {
                continue;
            };

            let field_path = FieldPath::Field(response_key, field.item.name.span.start, path);
            let value = self.resolve_field_entry(object_type, source, &fields, field_def, &field_path)?;
            result.add_field(response_key, value);
        }
        Ok(result)
    }

    fn resolve_field_entry(
        &self,
        object_type: &'r ObjectTypeDefinition,
        source: &Value,
        fields: &[&'r Spanning<Field>],
        field_def: &'r FieldDefinition,
        path: &FieldPath<'_>,
    ) -> Result<Value, Bubble> {
        let field = fields[0];
        __dynql_span_trace!(
            "resolve_field",
            object_type = %object_type.name.item,
            field = %field.item.name.item
        );

        let resolved = match self.resolve_field_value(object_type, source, field, field_def) {
            Ok(value) => value,
            Err(e) => {
                self.push_error(e, path);
                Value::Null
            }
        };

        let selection_sets = fields
            .iter()
            .filter_map(|f| f.item.selection_set.as_deref())
            .collect::<Vec<_>>();
        let scope = FieldScope {
            parent_type: object_type,
            field,
            selection_sets: &selection_sets,
            path,
        };
        self.complete_value(&scope, &field_def.field_type.item, resolved)
    }

    /// Runs the registered resolver of the field, or looks the field up on
    /// `source` when there is none.
    fn resolve_field_value(
        &self,
        object_type: &'r ObjectTypeDefinition,
        source: &Value,
        field: &'r Spanning<Field>,
        field_def: &FieldDefinition,
    ) -> FieldResult<Value> {
        let field_name = field.item.name.item.as_str();
        let Some(resolver) = self.executor.resolver(&object_type.name.item, field_name) else {
            return Ok(source.field(field_name).unwrap_or(Value::Null));
        };

        let args = self.coerce_argument_values(field_def, &field.item)?;
        let replaced_source;
        let mut params = ResolveParams {
            executor: self.executor,
            document: self.document,
            schema: self.schema(),
            context: self.context,
            source,
            args: &args,
            field,
            object_type,
        };
        if let Some(before) = &resolver.before {
            replaced_source = before(&params)?;
            params.source = &replaced_source;
        }

        let value = (resolver.resolve)(&params)?;
        match &resolver.after {
            Some(after) => after(&params, value),
            None => Ok(value),
        }
    }

    fn complete_value(&self, scope: &FieldScope<'_, 'r>, ty: &Type, value: Value) -> Result<Value, Bubble> {
        match ty {
            Type::NonNull(inner) => {
                let value = self.complete_nullable(scope, inner, value)?;
                if value.is_null() {
                    self.push_error(
                        format!(
                            "Cannot return null for non-nullable field {}.{}",
                            scope.parent_type.name.item, scope.field.item.name.item,
                        )
                        .into(),
                        scope.path,
                    );
                    return Err(Bubble);
                }
                Ok(value)
            }
            _ => Ok(self
                .complete_nullable(scope, ty, value)
                .unwrap_or(Value::Null)),
        }
    }

    fn complete_nullable(&self, scope: &FieldScope<'_, 'r>, ty: &Type, value: Value) -> Result<Value, Bubble> {
        if self.executor.is_nullish(&value) {
            return Ok(Value::Null);
        }
        match ty {
            Type::NonNull(_) => self.complete_value(scope, ty, value),
            Type::List(inner) => {
                let Value::List(items) = value else {
                    self.push_error("Expected a list but did not find one".into(), scope.path);
                    return Ok(Value::Null);
                };
                items
                    .into_iter()
                    .map(|item| self.complete_value(scope, inner, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            Type::Named(name) => self.complete_named(scope, name, value),
        }
    }

    fn complete_named(&self, scope: &FieldScope<'_, 'r>, name: &str, value: Value) -> Result<Value, Bubble> {
        match self.schema().type_by_name(name) {
            Some(TypeDefinition::Scalar(_)) => Ok(match BuiltinScalar::from_name(name) {
                Some(scalar) => scalar.coerce(&value).unwrap_or_else(|| {
                    __dynql_trace!("cannot serialize {value} as {scalar}");
                    Value::Null
                }),
                None => self.serialize_scalar(scope, name, value),
            }),
            Some(TypeDefinition::Enum(_)) => Ok(coerce_enum(&value).map_or(Value::Null, Value::String)),
            Some(TypeDefinition::Object(object_type)) => self.complete_object(scope, object_type, &value),
            Some(def @ (TypeDefinition::Interface(_) | TypeDefinition::Union(_))) => {
                self.complete_abstract(scope, def, &value)
            }
            Some(TypeDefinition::InputObject(_)) => {
                self.push_error(format!("Type {name} is not an output type").into(), scope.path);
                Ok(Value::Null)
            }
            None => {
                self.push_error(format!("Unknown type {name}").into(), scope.path);
                Ok(Value::Null)
            }
        }
    }

    fn serialize_scalar(&self, scope: &FieldScope<'_, 'r>, name: &str, value: Value) -> Value {
        let Some(callbacks) = self.executor.scalars.get(name) else {
            return value;
        };
        match (callbacks.serialize)(self.context, &value) {
            Ok(value) => value,
            Err(e) => {
                self.push_error(e, scope.path);
                Value::Null
            }
        }
    }

    fn complete_object(
        &self,
        scope: &FieldScope<'_, 'r>,
        object_type: &'r ObjectTypeDefinition,
        value: &Value,
    ) -> Result<Value, Bubble> {
        let mut groups = GroupedFields::default();
        let mut visited_fragments = FnvHashSet::default();
        for &selection_set in scope.selection_sets {
            self.collect_fields(object_type, selection_set, &mut visited_fragments, &mut groups);
        }
        self.execute_fields(object_type, value, groups, scope.path)
            .map(Value::Object)
    }

    fn complete_abstract(
        &self,
        scope: &FieldScope<'_, 'r>,
        abstract_type: TypeDefinition<'r>,
        value: &Value,
    ) -> Result<Value, Bubble> {
        let Some(type_name) = (self.executor.resolve_type)(value).filter(|n| !n.is_empty()) else {
            self.push_error(
                "The type of the value could not be determined".into(),
                scope.path,
            );
            return Ok(Value::Null);
        };

        let abstract_name = abstract_type.name();
        let object_type = self
            .schema()
            .is_possible_type(abstract_name, &type_name)
            .then(|| self.schema().document().object_type(&type_name))
            .flatten();
        let Some(object_type) = object_type else {
            let kind = match abstract_type {
                TypeDefinition::Union(_) => "union",
                _ => "interface",
            };
            self.push_error(
                format!(
                    "Runtime object type \"{type_name}\" is not a possible type for \
                     {kind} type \"{abstract_name}\"",
                )
                .into(),
                scope.path,
            );
            return Ok(Value::Null);
        };

        self.complete_object(scope, object_type, value)
    }
}

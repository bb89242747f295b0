use arcstr::ArcStr;

use super::{FieldError, Variables, resolve::Execution};
use crate::{
    ast::{
        Field, FieldDefinition, InputObjectTypeDefinition, InputValue, Operation, Type,
        TypeDefinition, VariableDefinition,
    },
    parser::Spanning,
    schema::meta::is_input_type,
    types::scalars::{BuiltinScalar, coerce_enum},
    value::{Object, Value},
};

impl<CtxT> Execution<'_, CtxT> {
    /// Coerces the provided `inputs` against the variable definitions of
    /// `operation`, applying defaults.
    ///
    /// Failures are recorded at the operation's name and leave the variable
    /// unset.
    pub(super) fn coerce_variable_values(
        &self,
        operation: &Spanning<Operation>,
        inputs: &Variables,
    ) -> Variables {
        let mut values = Variables::default();
        let Some(definitions) = &operation.item.variable_definitions else {
            return values;
        };
        let location = operation
            .item
            .name
            .as_ref()
            .map_or(operation.span.start, |name| name.span.start);

        for (name, definition) in &definitions.item {
            match self.coerce_variable_value(name, definition, inputs) {
                Ok(Some(value)) => {
                    values.add_field(name.as_str(), value);
                }
                Ok(None) => {}
                Err(e) => self.push_error_at(e.into(), location),
            }
        }
        values
    }

    fn coerce_variable_value(
        &self,
        name: &str,
        definition: &VariableDefinition,
        inputs: &Variables,
    ) -> Result<Option<Value>, String> {
        let var_type = &definition.var_type.item;
        let type_name = var_type.innermost_name();
        match self.schema().type_by_name(type_name) {
            Some(def) if is_input_type(def) => {}
            Some(_) => {
                return Err(format!(
                    "Variable \"${name}\" expected value of type \"{var_type}\" which cannot \
                     be used as an input type",
                ));
            }
            None => return Err(format!("Unknown type {type_name}")),
        }

        let invalid = |e: String| format!("Variable \"${name}\" got invalid value \n{e}");
        let mut value = match inputs.get_field_value(name) {
            Some(input) => self.coerce_input(var_type.nullable(), input).map_err(invalid)?,
            None => Value::Null,
        };
        if self.executor.is_nullish(&value) {
            if let Some(default) = &definition.default_value {
                value = self
                    .coerce_literal(var_type.nullable(), &default.item)
                    .map_err(invalid)?;
            }
        }

        if self.executor.is_nullish(&value) {
            if var_type.is_non_null() {
                return Err(format!(
                    "Variable \"${name}\" of required type \"{var_type}\" was not provided",
                ));
            }
            return Ok(None);
        }
        Ok(Some(value))
    }

    /// Coerces the arguments `field` passes against the ones `field_def`
    /// declares, applying defaults and leaving nullish ones out.
    pub(super) fn coerce_argument_values(
        &self,
        field_def: &FieldDefinition,
        field: &Field,
    ) -> Result<Object, FieldError> {
        let mut args = Object::with_capacity(field_def.arguments.len());
        for (name, argument) in &field_def.arguments {
            let arg_type = &argument.item.value_type.item;
            let invalid = |e: String| FieldError::from(format!("Argument \"{name}\" got invalid value \n{e}"));

            let mut value = match field.argument(name) {
                Some(literal) => self
                    .coerce_literal(arg_type.nullable(), &literal.item)
                    .map_err(invalid)?,
                None => Value::Null,
            };
            if self.executor.is_nullish(&value) {
                if let Some(default) = &argument.item.default_value {
                    value = self
                        .coerce_literal(arg_type.nullable(), &default.item)
                        .map_err(invalid)?;
                }
            }

            if self.executor.is_nullish(&value) {
                if arg_type.is_non_null() {
                    return Err(format!(
                        "Argument \"{name}\" of required type \"{arg_type}\" was not provided",
                    )
                    .into());
                }
                continue;
            }
            args.add_field(name.as_str(), value);
        }
        Ok(args)
    }

    /// Coerces a runtime value, e.g. a variable, against `ty`.
    fn coerce_input(&self, ty: &Type, value: &Value) -> Result<Value, String> {
        match ty {
            Type::NonNull(inner) => {
                let value = self.coerce_input(inner, value)?;
                if self.executor.is_nullish(&value) {
                    return Err(format!("Expected \"{ty}\", found null"));
                }
                Ok(value)
            }
            _ if self.executor.is_nullish(value) => Ok(Value::Null),
            Type::List(inner) => match value {
                Value::List(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.coerce_input(inner, item)
                            .map_err(|e| format!("In element #{i}: {e}"))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                _ => self
                    .coerce_input(inner, value)
                    .map(|item| Value::list(vec![item])),
            },
            Type::Named(name) => match self.schema().type_by_name(name) {
                Some(TypeDefinition::InputObject(input)) => {
                    let Value::Object(fields) = value else {
                        return Err(format!("Expected \"{name}\", found not an object"));
                    };
                    self.coerce_input_object(
                        input,
                        fields.iter().map(|(key, _)| key.as_str()),
                        |key, ty| {
                            fields
                                .get_field_value(key)
                                .map(|v| self.coerce_input(ty, v))
                                .transpose()
                        },
                    )
                }
                Some(TypeDefinition::Scalar(_)) if BuiltinScalar::from_name(name).is_none() => {
                    self.parse_scalar_value(name, value)
                }
                _ => self.coerce_leaf(name, value),
            },
        }
    }

    /// Coerces a literal written in the request or a schema default against
    /// `ty`, resolving the variables it references.
    fn coerce_literal(&self, ty: &Type, literal: &InputValue) -> Result<Value, String> {
        match (ty, literal) {
            (Type::NonNull(inner), _) => {
                let value = self.coerce_literal(inner, literal)?;
                if self.executor.is_nullish(&value) {
                    return Err(format!("Expected \"{ty}\", found null"));
                }
                Ok(value)
            }
            (_, InputValue::Variable(name)) => Ok(self.variable_value(name)),
            (_, InputValue::Null) => Ok(Value::Null),
            (Type::List(inner), InputValue::List(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    self.coerce_literal(inner, &item.item)
                        .map_err(|e| format!("In element #{i}: {e}"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            (Type::List(inner), _) => self
                .coerce_literal(inner, literal)
                .map(|item| Value::list(vec![item])),
            (Type::Named(name), _) => match self.schema().type_by_name(name) {
                Some(TypeDefinition::InputObject(input)) => {
                    let InputValue::Object(fields) = literal else {
                        return Err(format!("Expected \"{name}\", found not an object"));
                    };
                    self.coerce_input_object(
                        input,
                        fields.keys().map(ArcStr::as_str),
                        |key, ty| {
                            fields
                                .get(key)
                                .map(|f| self.coerce_literal(ty, &f.value.item))
                                .transpose()
                        },
                    )
                }
                Some(TypeDefinition::Scalar(_)) if BuiltinScalar::from_name(name).is_none() => {
                    self.parse_scalar_literal(name, literal)
                }
                _ => self.coerce_leaf(name, &self.value_from_literal(literal)),
            },
        }
    }

    /// Coerces the fields of an input object, given its keys and a coercion
    /// of each provided field against a type.
    ///
    /// Defaults fill in missing fields, nullish ones are left out.
    fn coerce_input_object<'k, F>(
        &self,
        input: &InputObjectTypeDefinition,
        mut keys: impl Iterator<Item = &'k str>,
        mut coerce_field: F,
    ) -> Result<Value, String>
    where
        F: FnMut(&str, &Type) -> Result<Option<Value>, String>,
    {
        if let Some(unknown) = keys.find(|key| !input.fields.contains_key(*key)) {
            return Err(format!("In field \"{unknown}\": Unknown field"));
        }

        let mut coerced = Object::with_capacity(input.fields.len());
        for (name, field) in &input.fields {
            let field_type = &field.item.value_type.item;
            let in_field = |e: String| format!("In field \"{name}\": {e}");

            let mut value = coerce_field(name.as_str(), field_type.nullable())
                .map_err(in_field)?
                .unwrap_or(Value::Null);
            if self.executor.is_nullish(&value) {
                if let Some(default) = &field.item.default_value {
                    value = self
                        .coerce_literal(field_type.nullable(), &default.item)
                        .map_err(in_field)?;
                }
            }

            if self.executor.is_nullish(&value) {
                if field_type.is_non_null() {
                    return Err(in_field(format!("Expected \"{field_type}\", found null")));
                }
                continue;
            }
            coerced.add_field(name.as_str(), value);
        }
        Ok(Value::Object(coerced))
    }

    /// Coerces into a built-in scalar or an enum.
    fn coerce_leaf(&self, name: &str, value: &Value) -> Result<Value, String> {
        match self.schema().type_by_name(name) {
            Some(TypeDefinition::Scalar(_)) => BuiltinScalar::from_name(name)
                .and_then(|scalar| scalar.coerce(value))
                .ok_or_else(|| format!("Failed to coerce value to {name}")),
            Some(TypeDefinition::Enum(enum_type)) => match coerce_enum(value) {
                Some(v) if enum_type.values.contains_key(v.as_str()) => Ok(Value::String(v)),
                Some(v) => Err(format!("Invalid value \"{v}\" for enum \"{name}\"")),
                None => Err(format!("Failed to coerce value to {name}")),
            },
            Some(_) => Err(format!("Type {name} is not an input type")),
            None => Err(format!("Unknown type {name}")),
        }
    }

    fn parse_scalar_value(&self, name: &str, value: &Value) -> Result<Value, String> {
        match self.executor.scalars.get(name) {
            Some(callbacks) => {
                (callbacks.parse_value)(self.context, value).map_err(|e| e.message().into())
            }
            None => Ok(value.clone()),
        }
    }

    fn parse_scalar_literal(&self, name: &str, literal: &InputValue) -> Result<Value, String> {
        match self.executor.scalars.get(name) {
            Some(callbacks) => {
                (callbacks.parse_literal)(self.context, literal).map_err(|e| e.message().into())
            }
            None => Ok(self.value_from_literal(literal)),
        }
    }

    fn variable_value(&self, name: &str) -> Value {
        self.variables
            .get_field_value(name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Converts a literal into a [`Value`] as written, substituting
    /// variables.
    pub(super) fn value_from_literal(&self, literal: &InputValue) -> Value {
        match literal {
            InputValue::Null => Value::Null,
            InputValue::Int(i) => Value::Int(*i),
            InputValue::Float(f) => Value::Float(*f),
            InputValue::String(s) | InputValue::Enum(s) => Value::String(s.clone()),
            InputValue::Boolean(b) => Value::Boolean(*b),
            InputValue::Variable(name) => self.variable_value(name),
            InputValue::List(items) => {
                Value::List(items.iter().map(|i| self.value_from_literal(&i.item)).collect())
            }
            InputValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, f)| (key.as_str(), self.value_from_literal(&f.value.item)))
                    .collect(),
            ),
        }
    }
}

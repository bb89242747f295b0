use std::fmt;

use crate::value::Value;

/// One of the scalars every schema provides
///
/// Coercion between these and dynamic [`Value`]s is total for numbers,
/// booleans and strings, and fails for lists, objects and opaque records.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BuiltinScalar {
    /// A signed 32-bit integer.
    Int,
    /// A 32-bit floating-point number.
    Float,
    /// A UTF-8 string.
    String,
    /// A unique identifier, serialized as a string.
    Id,
    /// `true` or `false`.
    Boolean,
}

impl BuiltinScalar {
    /// Looks a built-in scalar up by its GraphQL name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Int" => Some(Self::Int),
            "Float" => Some(Self::Float),
            "String" => Some(Self::String),
            "ID" => Some(Self::Id),
            "Boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// The GraphQL name of this scalar.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Id => "ID",
            Self::Boolean => "Boolean",
        }
    }

    /// Coerces `value` into this scalar, returning `None` if its kind is
    /// incompatible.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match self {
            Self::Int => coerce_int(value).map(Value::Int),
            Self::Float => coerce_float(value).map(Value::Float),
            Self::String | Self::Id => coerce_string(value).map(Value::String),
            Self::Boolean => coerce_boolean(value).map(Value::Boolean),
        }
    }
}

impl fmt::Display for BuiltinScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coerces into an `Int`: floats truncate, booleans become `1`/`0` and strings
/// are parsed as decimal 64-bit integers, then truncated to 32 bits.
pub fn coerce_int(value: &Value) -> Option<i32> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) => Some(*f as i64 as i32),
        Value::Boolean(b) => Some(i32::from(*b)),
        Value::String(s) => s.parse::<i64>().ok().map(|i| i as i32),
        Value::Null | Value::List(_) | Value::Object(_) | Value::Opaque(_) => None,
    }
}

/// Coerces into a `Float`: integers are promoted, booleans become `1`/`0` and
/// strings are parsed.
pub fn coerce_float(value: &Value) -> Option<f32> {
    match value {
        Value::Int(i) => Some(*i as f32),
        Value::Float(f) => Some(*f),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.parse::<f64>().ok().map(|f| f as f32),
        Value::Null | Value::List(_) | Value::Object(_) | Value::Opaque(_) => None,
    }
}

/// Coerces into a `String`: numbers print in their shortest decimal form,
/// booleans as `true`/`false`.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::List(_) | Value::Object(_) | Value::Opaque(_) => None,
    }
}

/// Coerces into a `Boolean`: non-zero numbers are `true`, and every string
/// except `""` and `"false"` is `true`.
pub fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Int(i) => Some(*i != 0),
        Value::Float(f) => Some(*f != 0.0),
        Value::Boolean(b) => Some(*b),
        Value::String(s) => Some(!(s.is_empty() || s == "false")),
        Value::Null | Value::List(_) | Value::Object(_) | Value::Opaque(_) => None,
    }
}

/// Coerces into an enum value name: strings as-is, integers as decimal text.
pub fn coerce_enum(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Null
        | Value::Float(_)
        | Value::Boolean(_)
        | Value::List(_)
        | Value::Object(_)
        | Value::Opaque(_) => None,
    }
}

use std::fmt;

use serde::{
    Deserialize, Serialize,
    de::{self, Deserializer},
    ser::{SerializeMap as _, Serializer},
};

use crate::{
    GraphQLError, Object, Value,
    executor::ExecutionError,
    parser::{ParseError, SourcePosition, Spanning},
};

impl Serialize for ExecutionError {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(4))?;

        map.serialize_key("message")?;
        map.serialize_value(self.error().message())?;

        let locations = vec![self.location()];
        map.serialize_key("locations")?;
        map.serialize_value(&locations)?;

        if !self.path().is_empty() {
            map.serialize_key("path")?;
            map.serialize_value(self.path())?;
        }

        if !self.error().extensions().is_null() {
            map.serialize_key("extensions")?;
            map.serialize_value(self.error().extensions())?;
        }

        map.end()
    }
}

impl Serialize for GraphQLError {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Helper {
            message: String,
        }

        match self {
            Self::ParseError(e) => [e].serialize(ser),
            other => [Helper {
                message: other.to_string(),
            }]
            .serialize(ser),
        }
    }
}

impl Serialize for SourcePosition {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(2))?;

        map.serialize_key("line")?;
        map.serialize_value(&self.line())?;

        map.serialize_key("column")?;
        map.serialize_value(&self.column())?;

        map.end()
    }
}

impl Serialize for Spanning<ParseError> {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(2))?;

        let msg = self.item.to_string();
        map.serialize_key("message")?;
        map.serialize_value(&msg)?;

        let locations = vec![self.span.start];
        map.serialize_key("locations")?;
        map.serialize_value(&locations)?;

        map.end()
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(self.field_count()))?;
        for (f, v) in self.iter() {
            map.serialize_key(f)?;
            map.serialize_value(v)?;
        }
        map.end()
    }
}

/// Opaque host records have no wire form and serialize as `null`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null | Self::Opaque(_) => ser.serialize_unit(),
            Self::Boolean(b) => ser.serialize_bool(*b),
            Self::Int(i) => ser.serialize_i32(*i),
            Self::Float(f) => ser.serialize_f64(f64::from(*f)),
            Self::String(s) => ser.serialize_str(s),
            Self::List(l) => l.serialize(ser),
            Self::Object(o) => o.serialize(ser),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a valid input value")
            }

            fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
                Ok(Value::Boolean(b))
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
                // Integers out of the `Int` range travel as floats, the way
                // `JSON.stringify()` emits large whole numbers.
                Ok(i32::try_from(n).map_or(Value::Float(n as f32), Value::Int))
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
                Ok(i32::try_from(n).map_or(Value::Float(n as f32), Value::Int))
            }

            fn visit_f64<E: de::Error>(self, f: f64) -> Result<Self::Value, E> {
                Ok(Value::Float(f as f32))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
                self.visit_string(s.into())
            }

            fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
                Ok(Value::String(s))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_seq<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut vals = Vec::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some(v) = visitor.next_element()? {
                    vals.push(v);
                }
                Ok(Value::list(vals))
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut obj = Object::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some((key, val)) = visitor.next_entry::<String, Value>()? {
                    obj.add_field(key, val);
                }
                Ok(Value::object(obj))
            }
        }

        de.deserialize_any(Visitor)
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null | Value::Opaque(_) => Self::Null,
            Value::Boolean(b) => Self::Bool(b),
            Value::Int(i) => Self::from(i),
            Value::Float(f) => {
                serde_json::Number::from_f64(f64::from(f)).map_or(Self::Null, Self::Number)
            }
            Value::String(s) => Self::String(s),
            Value::List(l) => Self::Array(l.into_iter().map(Self::from).collect()),
            Value::Object(o) => {
                Self::Object(o.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

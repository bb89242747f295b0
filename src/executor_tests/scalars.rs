use pretty_assertions::assert_eq;

use crate::{
    FieldError, InputValue, Value, Variables,
    executor::{Executor, Resolvers, ScalarCallbacks},
};

const SCHEMA: &str = r#"
scalar Tag
scalar Json

enum Color {
  RED
  GREEN
}

type Query {
  tag(value: Tag): Tag
  rawTag: Tag
  badTag: Tag
  json: Json
  int: Int
  bigInt: Int
  float: Float
  string: String
  id: ID
  bool: Boolean
  color: Color
  notAScalar: Int
  echo(n: Int): Int
}
"#;

fn expect_string(value: &Value) -> Result<&str, FieldError> {
    value
        .as_string_value()
        .ok_or_else(|| FieldError::from(format!("Tag must be a string, got {value}")))
}

fn executor() -> Executor<()> {
    let resolvers = Resolvers::<()>::new()
        .field("Query/tag", |p| Ok(p.arg("value").cloned().unwrap_or(Value::Null)))
        .field("Query/rawTag", |_| Ok("Plain".into()))
        .field("Query/badTag", |_| Ok(Value::Int(1)))
        .field("Query/json", |_| Ok(graphql_value!({ "nested": [1, "two"] })))
        .field("Query/int", |_| Ok("42".into()))
        .field("Query/bigInt", |_| Ok(Value::Float(3.9)))
        .field("Query/float", |_| Ok(Value::Int(2)))
        .field("Query/string", |_| Ok(Value::Float(1.5)))
        .field("Query/id", |_| Ok(Value::Int(5)))
        .field("Query/bool", |_| Ok("false".into()))
        .field("Query/color", |_| Ok("RED".into()))
        .field("Query/notAScalar", |_| Ok(graphql_value!([1])))
        .field("Query/echo", |p| Ok(p.arg("n").cloned().unwrap_or(Value::Null)));

    let mut executor = Executor::new(SCHEMA, "Query", None, resolvers).expect("valid schema");
    executor.register_scalar(
        "Tag",
        ScalarCallbacks::new(
            |_, value| Ok(expect_string(value)?.to_lowercase().into()),
            |_, literal| match literal {
                InputValue::String(s) => Ok(s.to_lowercase().into()),
                _ => Err("Expected a string".into()),
            },
            |_, value| Ok(format!("#{}", expect_string(value)?).into()),
        ),
    );
    executor
}

fn run_variable_query(query: &str, vars: Variables) -> Value {
    executor()
        .execute(&(), query, &vars, None)
        .expect("Execution failed")
}

fn run_query(query: &str) -> Value {
    run_variable_query(query, Variables::default())
}

#[test]
fn parses_literals_and_serializes_results() {
    assert_eq!(
        run_query(r#"{ tag(value: "RuSt") rawTag }"#),
        graphql_value!({ "data": { "tag": "#rust", "rawTag": "#Plain" } }),
    );
}

#[test]
fn parses_variables() {
    assert_eq!(
        run_variable_query(
            "query q($t: Tag) { tag(value: $t) }",
            graphql_vars! { "t": "GraphQL" },
        ),
        graphql_value!({ "data": { "tag": "#graphql" } }),
    );
}

#[test]
fn literal_parse_errors() {
    assert_eq!(
        run_query("{ tag(value: 1) }"),
        graphql_value!({
            "data": { "tag": null },
            "errors": [{
                "message": "Argument \"value\" got invalid value \nExpected a string",
                "locations": [{ "line": 1, "column": 3 }],
                "path": ["tag"],
            }],
        }),
    );
}

#[test]
fn variable_parse_errors() {
    assert_eq!(
        run_variable_query(
            "query q($t: Tag) { tag(value: $t) }",
            graphql_vars! { "t": true },
        ),
        graphql_value!({
            "data": { "tag": null },
            "errors": [{
                "message": "Variable \"$t\" got invalid value \nTag must be a string, got true",
                "locations": [{ "line": 1, "column": 7 }],
            }],
        }),
    );
}

#[test]
fn serialize_errors() {
    assert_eq!(
        run_query("{ badTag }"),
        graphql_value!({
            "data": { "badTag": null },
            "errors": [{
                "message": "Tag must be a string, got 1",
                "locations": [{ "line": 1, "column": 3 }],
                "path": ["badTag"],
            }],
        }),
    );
}

#[test]
fn scalars_without_callbacks_pass_through() {
    assert_eq!(
        run_query("{ json }"),
        graphql_value!({ "data": { "json": { "nested": [1, "two"] } } }),
    );
}

#[test]
fn builtin_scalars_coerce_results() {
    assert_eq!(
        run_query("{ int bigInt float string id bool color }"),
        graphql_value!({
            "data": {
                "int": 42,
                "bigInt": 3,
                "float": 2.0,
                "string": "1.5",
                "id": "5",
                "bool": false,
                "color": "RED",
            },
        }),
    );
}

#[test]
fn incompatible_results_are_nulled() {
    assert_eq!(
        run_query("{ notAScalar }"),
        graphql_value!({ "data": { "notAScalar": null } }),
    );
}

#[test]
fn oversized_int_literals_are_truncated() {
    assert_eq!(
        run_query("{ echo(n: 4294967297) negative: echo(n: -4294967297) }"),
        graphql_value!({ "data": { "echo": 1, "negative": -1 } }),
    );
}

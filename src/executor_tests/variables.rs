use pretty_assertions::assert_eq;

use crate::{
    Value, Variables,
    executor::{Executor, ResolveParams, Resolvers},
};

const SCHEMA: &str = r#"
enum Color {
  RED
  GREEN
  BLUE
}

input TestInputObject {
  a: String
  b: [String]
  c: String!
}

input TestNestedInputObject {
  na: TestInputObject!
  nb: String!
}

input InputWithDefaults {
  a: Int = 1
  color: Color = GREEN
}

type TestType {
  fieldWithObjectInput(input: TestInputObject): String
  fieldWithNullableStringInput(input: String): String
  fieldWithNonNullableStringInput(input: String!): String
  fieldWithDefaultArgumentValue(input: String = "Hello World"): String
  fieldWithNestedInputObject(input: TestNestedInputObject): String
  fieldWithDefaults(input: InputWithDefaults = {}): String
  list(input: [String]): String
  nnList(input: [String]!): String
  listNN(input: [String!]): String
  intInput(value: Int): String
  colorInput(color: Color): String
}
"#;

/// Renders the `input` argument as JSON, or `null` when it is absent.
fn input_as_json(p: &ResolveParams<'_, ()>) -> Value {
    match p.arg("input") {
        Some(v) => serde_json::Value::from(v.clone()).to_string().into(),
        None => Value::Null,
    }
}

fn executor() -> Executor<()> {
    let mut resolvers = Resolvers::<()>::new();
    for field in [
        "fieldWithObjectInput",
        "fieldWithNullableStringInput",
        "fieldWithNonNullableStringInput",
        "fieldWithDefaultArgumentValue",
        "fieldWithNestedInputObject",
        "fieldWithDefaults",
        "list",
        "nnList",
        "listNN",
    ] {
        resolvers = resolvers.field(format!("TestType/{field}"), |p| Ok(input_as_json(p)));
    }
    let resolvers = resolvers
        .field("TestType/intInput", |p| {
            Ok(p.arg("value").map_or(Value::Null, |v| v.to_string().into()))
        })
        .field("TestType/colorInput", |p| Ok(p.arg("color").cloned().unwrap_or(Value::Null)));

    Executor::new(SCHEMA, "TestType", None, resolvers).expect("valid schema")
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
fn inline_complex_input() {
    assert_eq!(
        run_query(r#"{ fieldWithObjectInput(input: {a: "foo", b: ["bar"], c: "baz"}) }"#),
        graphql_value!({
            "data": { "fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"# },
        }),
    );
}

#[test]
fn inline_single_value_to_list() {
    assert_eq!(
        run_query(r#"{ fieldWithObjectInput(input: {a: "foo", b: "bar", c: "baz"}) }"#),
        graphql_value!({
            "data": { "fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"# },
        }),
    );
}

#[test]
fn variable_defaults_apply_when_not_provided() {
    let query = r#"
        query q($input: TestInputObject = {a: "foo", b: ["bar"], c: "baz"}) {
            fieldWithObjectInput(input: $input)
        }
    "#;

    assert_eq!(
        run_query(query),
        graphql_value!({
            "data": { "fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"# },
        }),
    );
}

#[test]
fn variable_complex_input() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            graphql_vars! { "input": { "a": "foo", "b": ["bar"], "c": "baz" } },
        ),
        graphql_value!({
            "data": { "fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"# },
        }),
    );
}

#[test]
fn variable_single_value_to_list() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            graphql_vars! { "input": { "b": "bar", "c": "baz" } },
        ),
        graphql_value!({
            "data": { "fieldWithObjectInput": r#"{"b":["bar"],"c":"baz"}"# },
        }),
    );
}

#[test]
fn variables_inside_literals() {
    assert_eq!(
        run_variable_query(
            r#"query q($c: String) { fieldWithObjectInput(input: {b: ["x", $c], c: $c}) }"#,
            graphql_vars! { "c": "baz" },
        ),
        graphql_value!({
            "data": { "fieldWithObjectInput": r#"{"b":["x","baz"],"c":"baz"}"# },
        }),
    );
}

#[test]
fn variable_error_on_missing_input_field() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            graphql_vars! { "input": { "a": "foo", "b": "bar" } },
        ),
        graphql_value!({
            "data": { "fieldWithObjectInput": null },
            "errors": [{
                "message": "Variable \"$input\" got invalid value \n\
                            In field \"c\": Expected \"String!\", found null",
                "locations": [{ "line": 1, "column": 7 }],
            }],
        }),
    );
}

#[test]
fn variable_error_on_additional_field() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            graphql_vars! { "input": { "c": "baz", "extra": "dog" } },
        ),
        graphql_value!({
            "data": { "fieldWithObjectInput": null },
            "errors": [{
                "message": "Variable \"$input\" got invalid value \n\
                            In field \"extra\": Unknown field",
                "locations": [{ "line": 1, "column": 7 }],
            }],
        }),
    );
}

#[test]
fn variable_error_on_nested_non_null() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestNestedInputObject) { fieldWithNestedInputObject(input: $input) }",
            graphql_vars! { "input": { "na": { "a": "foo" }, "nb": "bar" } },
        ),
        graphql_value!({
            "data": { "fieldWithNestedInputObject": null },
            "errors": [{
                "message": "Variable \"$input\" got invalid value \n\
                            In field \"na\": In field \"c\": Expected \"String!\", found null",
                "locations": [{ "line": 1, "column": 7 }],
            }],
        }),
    );
}

#[test]
fn variable_error_on_incorrect_type() {
    assert_eq!(
        run_variable_query(
            "query q($value: Int) { intInput(value: $value) }",
            graphql_vars! { "value": [1] },
        ),
        graphql_value!({
            "data": { "intInput": null },
            "errors": [{
                "message": "Variable \"$value\" got invalid value \nFailed to coerce value to Int",
                "locations": [{ "line": 1, "column": 7 }],
            }],
        }),
    );
}

#[test]
fn variables_coerce_builtin_scalars() {
    assert_eq!(
        run_variable_query(
            "query q($value: Int) { intInput(value: $value) }",
            graphql_vars! { "value": "42" },
        ),
        graphql_value!({ "data": { "intInput": "42" } }),
    );
}

#[test]
fn required_variable_not_provided() {
    assert_eq!(
        run_query(
            "query q($value: String!) { fieldWithNonNullableStringInput(input: $value) }",
        ),
        graphql_value!({
            "data": { "fieldWithNonNullableStringInput": null },
            "errors": [
                {
                    "message": "Variable \"$value\" of required type \"String!\" was not provided",
                    "locations": [{ "line": 1, "column": 7 }],
                },
                {
                    "message": "Argument \"input\" of required type \"String!\" was not provided",
                    "locations": [{ "line": 1, "column": 28 }],
                    "path": ["fieldWithNonNullableStringInput"],
                },
            ],
        }),
    );
}

#[test]
fn variables_of_output_types() {
    assert_eq!(
        run_query("query q($v: TestType) { list(input: null) }"),
        graphql_value!({
            "data": { "list": null },
            "errors": [{
                "message": "Variable \"$v\" expected value of type \"TestType\" \
                            which cannot be used as an input type",
                "locations": [{ "line": 1, "column": 7 }],
            }],
        }),
    );
}

#[test]
fn anonymous_operation_errors_point_at_the_operation() {
    assert_eq!(
        run_variable_query(
            "query ($value: Int) { intInput(value: $value) }",
            graphql_vars! { "value": "x" },
        ),
        graphql_value!({
            "data": { "intInput": null },
            "errors": [{
                "message": "Variable \"$value\" got invalid value \nFailed to coerce value to Int",
                "locations": [{ "line": 1, "column": 1 }],
            }],
        }),
    );
}

#[test]
fn nullable_argument_absent_and_null() {
    assert_eq!(
        run_query("{ a: fieldWithNullableStringInput b: fieldWithNullableStringInput(input: null) }"),
        graphql_value!({ "data": { "a": null, "b": null } }),
    );
}

#[test]
fn argument_default_values() {
    assert_eq!(
        run_query("{ fieldWithDefaultArgumentValue }"),
        graphql_value!({ "data": { "fieldWithDefaultArgumentValue": r#""Hello World""# } }),
    );
}

#[test]
fn input_field_default_values() {
    assert_eq!(
        run_query("{ a: fieldWithDefaults b: fieldWithDefaults(input: {a: 5}) }"),
        graphql_value!({
            "data": {
                "a": r#"{"a":1,"color":"GREEN"}"#,
                "b": r#"{"a":5,"color":"GREEN"}"#,
            },
        }),
    );
}

#[test]
fn lists() {
    assert_eq!(
        run_variable_query(
            "query q($input: [String]) { list(input: $input) nnList(input: $input) }",
            graphql_vars! { "input": ["A", null, "B"] },
        ),
        graphql_value!({
            "data": {
                "list": r#"["A",null,"B"]"#,
                "nnList": r#"["A",null,"B"]"#,
            },
        }),
    );
}

#[test]
fn list_with_non_null_items_rejects_nulls() {
    assert_eq!(
        run_variable_query(
            "query q($input: [String!]) { listNN(input: $input) }",
            graphql_vars! { "input": ["A", null, "B"] },
        ),
        graphql_value!({
            "data": { "listNN": null },
            "errors": [{
                "message": "Variable \"$input\" got invalid value \n\
                            In element #1: Expected \"String!\", found null",
                "locations": [{ "line": 1, "column": 7 }],
            }],
        }),
    );
}

#[test]
fn enum_arguments() {
    assert_eq!(
        run_query("{ colorInput(color: RED) }"),
        graphql_value!({ "data": { "colorInput": "RED" } }),
    );
    assert_eq!(
        run_variable_query(
            "query q($color: Color) { colorInput(color: $color) }",
            graphql_vars! { "color": "GREEN" },
        ),
        graphql_value!({ "data": { "colorInput": "GREEN" } }),
    );
}

#[test]
fn enum_values_are_checked() {
    assert_eq!(
        run_variable_query(
            "query q($color: Color) { colorInput(color: $color) }",
            graphql_vars! { "color": "PURPLE" },
        ),
        graphql_value!({
            "data": { "colorInput": null },
            "errors": [{
                "message": "Variable \"$color\" got invalid value \n\
                            Invalid value \"PURPLE\" for enum \"Color\"",
                "locations": [{ "line": 1, "column": 7 }],
            }],
        }),
    );
    assert_eq!(
        run_query("{ colorInput(color: PURPLE) }"),
        graphql_value!({
            "data": { "colorInput": null },
            "errors": [{
                "message": "Argument \"color\" got invalid value \n\
                            Invalid value \"PURPLE\" for enum \"Color\"",
                "locations": [{ "line": 1, "column": 3 }],
                "path": ["colorInput"],
            }],
        }),
    );
}

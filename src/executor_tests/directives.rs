use pretty_assertions::assert_eq;

use crate::{
    Object, Value, Variables,
    executor::{Executor, Resolvers},
};

fn run_variable_query<F>(query: &str, vars: Variables, f: F)
where
    F: Fn(&Object),
{
    let resolvers = Resolvers::<()>::new()
        .field("TestType/a", |_| Ok("a".into()))
        .field("TestType/b", |_| Ok("b".into()));
    let executor = Executor::new("type TestType { a: String b: String }", "TestType", None, resolvers)
        .expect("valid schema");

    let result = executor
        .execute(&(), query, &vars, None)
        .expect("Execution failed");

    assert_eq!(result.field("errors"), None);

    let data = result
        .field("data")
        .and_then(Value::into_object)
        .expect("Result is not an object");

    f(&data);
}

fn run_query<F>(query: &str, f: F)
where
    F: Fn(&Object),
{
    run_variable_query(query, Variables::default(), f);
}

#[test]
fn scalar_include_true() {
    run_query("{ a, b @include(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    });
}

#[test]
fn scalar_include_false() {
    run_query("{ a, b @include(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn scalar_skip_false() {
    run_query("{ a, b @skip(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    });
}

#[test]
fn scalar_skip_true() {
    run_query("{ a, b @skip(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn fragment_spread_include_false() {
    run_query(
        "{ a, ...Frag @include(if: false) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}

#[test]
fn fragment_spread_skip_false() {
    run_query(
        "{ a, ...Frag @skip(if: false) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
        },
    );
}

#[test]
fn fragment_definition_skip_true() {
    run_query(
        "{ a, ...Frag } fragment Frag on TestType @skip(if: true) { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}

#[test]
fn inline_fragment_include_false() {
    run_query(
        "{ a, ... on TestType @include(if: false) { b } }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}

#[test]
fn anonymous_inline_fragment_skip_false() {
    run_query("{ a, ... @skip(if: false) { b } }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    });
}

#[test]
fn skip_wins_over_include() {
    run_query("{ a, b @include(if: true) @skip(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn variable_conditions() {
    run_variable_query(
        "query q($skip: Boolean!) { a, b @skip(if: $skip) }",
        graphql_vars! { "skip": true },
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}

#[test]
fn unknown_directives_are_ignored() {
    run_query("{ a, b @uppercase }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    });
}

use pretty_assertions::assert_eq;

use crate::{
    GraphQLError, SchemaError, Value, Variables,
    executor::{Executor, FieldResolver, Resolvers, is_null_or_empty, verbose_error_serializer},
    value::FieldSource,
};

const SCHEMA: &str = r#"
type Query {
  hello: String
  fail: String
  nickname: String
  echo(text: String = "default"): String
  greeting: String
  guarded: String
  hero: Hero
  droid: Hero
  tags: [String]
  whoami: String
}

type Hero {
  id: ID
  name: String
  friends: [Hero]
}

type Mutation {
  noop: Boolean
}
"#;

#[derive(Debug)]
struct Droid {
    name: &'static str,
}

impl FieldSource for Droid {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some("2001".into()),
            "name" => Some(self.name.into()),
            _ => None,
        }
    }
}

fn resolvers() -> Resolvers<String> {
    Resolvers::<String>::new()
        .field("Query/hello", |_| Ok("world".into()))
        .field("Query/fail", |_| Err("boom".into()))
        .field("Query/nickname", |_| Ok("".into()))
        .field("Query/echo", |p| Ok(p.arg("text").cloned().unwrap_or(Value::Null)))
        .resolver(
            "Query/greeting",
            FieldResolver::new(|p| {
                Ok(format!("Hello, {}", p.source.as_string_value().unwrap_or("?")).into())
            })
            .before(|_| Ok("World".into()))
            .after(|_, v| Ok(format!("{}!", v.as_string_value().unwrap_or_default()).into())),
        )
        .resolver(
            "Query/guarded",
            FieldResolver::new(|_| Ok("secret".into())).before(|_| Err("denied".into())),
        )
        .field("Query/hero", |_| {
            Ok(graphql_value!({
                "id": 1,
                "name": "R2-D2",
                "friends": [{ "id": 2, "name": "Luke" }, { "id": 3, "name": "Leia" }],
            }))
        })
        .field("Query/droid", |_| Ok(Value::opaque(Droid { name: "C-3PO" })))
        .field("Query/tags", |_| Ok("not a list".into()))
        .field("Query/whoami", |p| Ok(p.context.as_str().into()))
}

fn executor() -> Executor<String> {
    Executor::new(SCHEMA, "Query", None, resolvers()).expect("valid schema")
}

fn run(executor: &Executor<String>, query: &str) -> Value {
    run_operation(executor, query, None)
}

fn run_operation(executor: &Executor<String>, query: &str, operation: Option<&str>) -> Value {
    executor
        .execute(&"Leia".to_owned(), query, &Variables::default(), operation)
        .expect("Execution failed")
}

#[test]
fn simple_query() {
    assert_eq!(
        run(&executor(), "{ hello }"),
        graphql_value!({ "data": { "hello": "world" } }),
    );
}

#[test]
fn aliases() {
    assert_eq!(
        run(&executor(), "{ a: hello, b: hello }"),
        graphql_value!({ "data": { "a": "world", "b": "world" } }),
    );
}

#[test]
fn fields_without_resolver_read_the_source() {
    assert_eq!(
        run(&executor(), "{ hero { id name friends { name } } }"),
        graphql_value!({
            "data": {
                "hero": {
                    "id": "1",
                    "name": "R2-D2",
                    "friends": [{ "name": "Luke" }, { "name": "Leia" }],
                },
            },
        }),
    );
}

#[test]
fn opaque_source_records() {
    assert_eq!(
        run(&executor(), "{ droid { id name friends { name } } }"),
        graphql_value!({
            "data": { "droid": { "id": "2001", "name": "C-3PO", "friends": null } },
        }),
    );
}

#[test]
fn merges_selection_sets_of_the_same_key() {
    assert_eq!(
        run(&executor(), "{ hero { id } hero { name } }"),
        graphql_value!({ "data": { "hero": { "id": "1", "name": "R2-D2" } } }),
    );
}

#[test]
fn fragments() {
    let query = r#"
        {
            ...HeroFields
            hero { ... on Hero { id } }
        }

        fragment HeroFields on Query {
            hero { name }
        }
    "#;

    assert_eq!(
        run(&executor(), query),
        graphql_value!({ "data": { "hero": { "name": "R2-D2", "id": "1" } } }),
    );
}

#[test]
fn fragment_cycles_terminate() {
    let query = r#"
        { ...A }
        fragment A on Query { hello ...B }
        fragment B on Query { whoami ...A }
    "#;

    assert_eq!(
        run(&executor(), query),
        graphql_value!({ "data": { "hello": "world", "whoami": "Leia" } }),
    );
}

#[test]
fn fragments_on_other_types_do_not_apply() {
    assert_eq!(
        run(&executor(), "{ hello ... on Hero { id } }"),
        graphql_value!({ "data": { "hello": "world" } }),
    );
}

#[test]
fn unknown_fields_are_skipped() {
    assert_eq!(
        run(&executor(), "{ hello nope }"),
        graphql_value!({ "data": { "hello": "world" } }),
    );
}

#[test]
fn typename() {
    assert_eq!(
        run(&executor(), "{ __typename hero { __typename } }"),
        graphql_value!({ "data": { "__typename": "Query", "hero": { "__typename": "Hero" } } }),
    );
}

#[test]
fn context() {
    assert_eq!(
        run(&executor(), "{ whoami }"),
        graphql_value!({ "data": { "whoami": "Leia" } }),
    );
}

#[test]
fn argument_defaults() {
    assert_eq!(
        run(&executor(), r#"{ a: echo(text: "hi") b: echo c: echo(text: null) }"#),
        graphql_value!({ "data": { "a": "hi", "b": "default", "c": "default" } }),
    );
}

#[test]
fn resolver_errors_null_the_field() {
    assert_eq!(
        run(&executor(), "{ hello fail }"),
        graphql_value!({
            "data": { "hello": "world", "fail": null },
            "errors": [{
                "message": "boom",
                "locations": [{ "line": 1, "column": 9 }],
                "path": ["fail"],
            }],
        }),
    );
}

#[test]
fn before_and_after_hooks() {
    assert_eq!(
        run(&executor(), "{ greeting }"),
        graphql_value!({ "data": { "greeting": "Hello, World!" } }),
    );
}

#[test]
fn before_hook_errors_null_the_field() {
    assert_eq!(
        run(&executor(), "{ guarded }"),
        graphql_value!({
            "data": { "guarded": null },
            "errors": [{
                "message": "denied",
                "locations": [{ "line": 1, "column": 3 }],
                "path": ["guarded"],
            }],
        }),
    );
}

#[test]
fn non_list_values_for_list_fields() {
    assert_eq!(
        run(&executor(), "{ tags }"),
        graphql_value!({
            "data": { "tags": null },
            "errors": [{
                "message": "Expected a list but did not find one",
                "locations": [{ "line": 1, "column": 3 }],
                "path": ["tags"],
            }],
        }),
    );
}

#[test]
fn nullish_policy() {
    let mut executor = executor();

    assert_eq!(
        run(&executor, "{ nickname }"),
        graphql_value!({ "data": { "nickname": "" } }),
    );

    executor.set_is_nullish(is_null_or_empty);

    assert_eq!(
        run(&executor, "{ nickname }"),
        graphql_value!({ "data": { "nickname": null } }),
    );
}

#[test]
fn verbose_errors() {
    let mut executor = executor();
    executor.set_error_serializer(verbose_error_serializer);

    assert_eq!(
        run(&executor, "{\n  fail\n}"),
        graphql_value!({
            "data": { "fail": null },
            "errors": [{
                "message": "boom\n1|{\n2|  fail\n    ^^^^\n3|}",
                "locations": [{ "line": 2, "column": 3 }],
                "path": ["fail"],
            }],
        }),
    );
}

#[test]
fn operation_selection() {
    let executor = executor();
    let query = "query A { hello } query B { whoami }";

    assert_eq!(
        run_operation(&executor, query, Some("B")),
        graphql_value!({ "data": { "whoami": "Leia" } }),
    );
    assert_eq!(
        run_operation(&executor, query, None),
        graphql_value!({
            "errors": [{
                "message": "GraphQL Runtime Error: Must provide operation name \
                            if query contains multiple operations",
            }],
        }),
    );
    assert_eq!(
        run_operation(&executor, query, Some("C")),
        graphql_value!({
            "errors": [{
                "message": "GraphQL Runtime Error: Operation with name \"C\" not found in document",
            }],
        }),
    );
    assert_eq!(
        run_operation(&executor, "query A { hello }", Some("")),
        graphql_value!({ "data": { "hello": "world" } }),
    );
    assert_eq!(
        run(&executor, "fragment F on Query { hello }"),
        graphql_value!({
            "errors": [{ "message": "GraphQL Runtime Error: Must provide an operation" }],
        }),
    );
}

#[test]
fn mutations_need_a_mutation_root() {
    assert_eq!(
        run(&executor(), "mutation { noop }"),
        graphql_value!({
            "errors": [{ "message": "GraphQL Runtime Error: Schema is not configured for mutations" }],
        }),
    );
}

#[test]
fn syntax_errors_fail_the_request() {
    let result = executor().execute(&String::new(), "{ hello", &Variables::default(), None);

    assert!(
        matches!(result, Err(GraphQLError::ParseError(_))),
        "unexpected result: {result:?}",
    );
}

#[test]
fn invalid_resolver_keys() {
    let result = Executor::<String>::new(
        SCHEMA,
        "Query",
        None,
        Resolvers::<String>::new().field("Query.hello", |_| Ok(Value::Null)),
    );

    assert_eq!(
        result.err(),
        Some(GraphQLError::SchemaError(SchemaError::InvalidResolverKey(
            "Query.hello".into(),
        ))),
    );
}

#[test]
fn schema_errors_fail_construction() {
    let result = Executor::<String>::new(SCHEMA, "Root", None, Resolvers::<String>::new());

    assert_eq!(
        result.err(),
        Some(GraphQLError::SchemaError(SchemaError::MissingQueryRoot(
            "Root".into(),
        ))),
    );
}

#[test]
fn json_requests() {
    let response = executor()
        .execute_json(
            &String::new(),
            "query q($text: String) { echo(text: $text) }",
            serde_json::json!({ "text": "hi" }),
            None,
        )
        .expect("Execution failed");

    assert_eq!(response, serde_json::json!({ "data": { "echo": "hi" } }));
}

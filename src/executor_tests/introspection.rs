use pretty_assertions::assert_eq;

use crate::{
    Value, Variables,
    executor::{Executor, Resolvers},
};

const SCHEMA: &str = r#"
## A character of the saga
interface Character {
  id: ID!
  name: String
}

## A mechanical creature
type Droid implements Character {
  id: ID!
  name: String
  primaryFunction: String
}

type Human implements Character {
  id: ID!
  name: String
  homePlanet: String @deprecated(reason: "Use `origin`")
  origin: String
}

union SearchResult = Human | Droid

enum Episode {
  ## Released in 1977
  NEWHOPE
  EMPIRE
  JEDI @deprecated
}

input ReviewInput {
  stars: Int! = 5
  commentary: String
}

type Query {
  ## Looks up a character
  hero(episode: Episode = NEWHOPE): Character
  search(text: String!): [SearchResult!]
}

type Mutation {
  createReview(review: ReviewInput): Int
}
"#;

fn executor() -> Executor<()> {
    Executor::new(SCHEMA, "Query", Some("Mutation"), Resolvers::<()>::new()).expect("valid schema")
}

fn run(query: &str) -> Value {
    let response = executor()
        .execute(&(), query, &Variables::default(), None)
        .expect("Execution failed");

    assert_eq!(response.field("errors"), None);

    response.field("data").expect("response has data")
}

#[test]
fn schema_roots() {
    assert_eq!(
        run(r#"{
            __schema {
                queryType { name kind }
                mutationType { name }
                subscriptionType { name }
            }
        }"#),
        graphql_value!({
            "__schema": {
                "queryType": { "name": "Query", "kind": "OBJECT" },
                "mutationType": { "name": "Mutation" },
                "subscriptionType": null,
            },
        }),
    );
}

#[test]
fn schema_types_include_user_and_introspection_types() {
    let data = run("{ __schema { types { name } } }");
    let names = data
        .field("__schema")
        .and_then(|s| s.field("types"))
        .and_then(|t| t.as_list_value().cloned())
        .expect("types are a list")
        .iter()
        .filter_map(|t| t.field("name")?.as_string_value().map(str::to_owned))
        .collect::<Vec<_>>();

    for name in [
        "Query", "Mutation", "Character", "Droid", "Human", "SearchResult", "Episode",
        "ReviewInput", "String", "Boolean", "Int", "Float", "ID", "__Schema", "__Type",
        "__TypeKind", "__Field", "__InputValue", "__EnumValue", "__Directive",
    ] {
        assert!(names.iter().any(|n| n == name), "missing type {name}");
    }
}

#[test]
fn query_root_hides_introspection_fields() {
    assert_eq!(
        run(r#"{ __type(name: "Query") { fields { name } } }"#),
        graphql_value!({
            "__type": { "fields": [{ "name": "hero" }, { "name": "search" }] },
        }),
    );
}

#[test]
fn object_type() {
    assert_eq!(
        run(r#"{
            __type(name: "Droid") {
                kind
                name
                description
                interfaces { name }
                possibleTypes { name }
                enumValues { name }
                inputFields { name }
                fields {
                    name
                    type { kind name ofType { kind name } }
                }
            }
        }"#),
        graphql_value!({
            "__type": {
                "kind": "OBJECT",
                "name": "Droid",
                "description": "A mechanical creature",
                "interfaces": [{ "name": "Character" }],
                "possibleTypes": null,
                "enumValues": null,
                "inputFields": null,
                "fields": [
                    {
                        "name": "id",
                        "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "ID" } },
                    },
                    {
                        "name": "name",
                        "type": { "kind": "SCALAR", "name": "String", "ofType": null },
                    },
                    {
                        "name": "primaryFunction",
                        "type": { "kind": "SCALAR", "name": "String", "ofType": null },
                    },
                ],
            },
        }),
    );
}

#[test]
fn field_arguments() {
    assert_eq!(
        run(r#"{
            __type(name: "Query") {
                fields {
                    name
                    description
                    args { name defaultValue type { name kind ofType { name } } }
                }
            }
        }"#),
        graphql_value!({
            "__type": {
                "fields": [
                    {
                        "name": "hero",
                        "description": "Looks up a character",
                        "args": [{
                            "name": "episode",
                            "defaultValue": "NEWHOPE",
                            "type": { "name": "Episode", "kind": "ENUM", "ofType": null },
                        }],
                    },
                    {
                        "name": "search",
                        "description": null,
                        "args": [{
                            "name": "text",
                            "defaultValue": null,
                            "type": { "name": null, "kind": "NON_NULL", "ofType": { "name": "String" } },
                        }],
                    },
                ],
            },
        }),
    );
}

#[test]
fn abstract_types() {
    assert_eq!(
        run(r#"{
            character: __type(name: "Character") { kind description possibleTypes { name } }
            result: __type(name: "SearchResult") { kind possibleTypes { name } fields { name } }
        }"#),
        graphql_value!({
            "character": {
                "kind": "INTERFACE",
                "description": "A character of the saga",
                "possibleTypes": [{ "name": "Droid" }, { "name": "Human" }],
            },
            "result": {
                "kind": "UNION",
                "possibleTypes": [{ "name": "Human" }, { "name": "Droid" }],
                "fields": null,
            },
        }),
    );
}

#[test]
fn deprecated_fields() {
    assert_eq!(
        run(r#"{
            current: __type(name: "Human") { fields { name } }
            all: __type(name: "Human") {
                fields(includeDeprecated: true) { name isDeprecated deprecationReason }
            }
        }"#),
        graphql_value!({
            "current": {
                "fields": [{ "name": "id" }, { "name": "name" }, { "name": "origin" }],
            },
            "all": {
                "fields": [
                    { "name": "id", "isDeprecated": false, "deprecationReason": null },
                    { "name": "name", "isDeprecated": false, "deprecationReason": null },
                    {
                        "name": "homePlanet",
                        "isDeprecated": true,
                        "deprecationReason": "Use `origin`",
                    },
                    { "name": "origin", "isDeprecated": false, "deprecationReason": null },
                ],
            },
        }),
    );
}

#[test]
fn enum_values() {
    assert_eq!(
        run(r#"{
            current: __type(name: "Episode") { kind enumValues { name description } }
            all: __type(name: "Episode") { enumValues(includeDeprecated: true) { name isDeprecated } }
        }"#),
        graphql_value!({
            "current": {
                "kind": "ENUM",
                "enumValues": [
                    { "name": "NEWHOPE", "description": "Released in 1977" },
                    { "name": "EMPIRE", "description": null },
                ],
            },
            "all": {
                "enumValues": [
                    { "name": "NEWHOPE", "isDeprecated": false },
                    { "name": "EMPIRE", "isDeprecated": false },
                    { "name": "JEDI", "isDeprecated": true },
                ],
            },
        }),
    );
}

#[test]
fn input_object() {
    assert_eq!(
        run(r#"{
            __type(name: "ReviewInput") {
                kind
                fields { name }
                inputFields { name defaultValue type { kind ofType { name } } }
            }
        }"#),
        graphql_value!({
            "__type": {
                "kind": "INPUT_OBJECT",
                "fields": null,
                "inputFields": [
                    {
                        "name": "stars",
                        "defaultValue": "5",
                        "type": { "kind": "NON_NULL", "ofType": { "name": "Int" } },
                    },
                    {
                        "name": "commentary",
                        "defaultValue": null,
                        "type": { "kind": "SCALAR", "ofType": null },
                    },
                ],
            },
        }),
    );
}

#[test]
fn unknown_type() {
    assert_eq!(
        run(r#"{ __type(name: "Wookiee") { name } }"#),
        graphql_value!({ "__type": null }),
    );
}

#[test]
fn directives() {
    assert_eq!(
        run("{ __schema { directives { name onOperation onFragment onField args { name type { kind ofType { name } } } } } }"),
        graphql_value!({
            "__schema": {
                "directives": [
                    {
                        "name": "skip",
                        "onOperation": false,
                        "onFragment": true,
                        "onField": true,
                        "args": [{ "name": "if", "type": { "kind": "NON_NULL", "ofType": { "name": "Boolean" } } }],
                    },
                    {
                        "name": "include",
                        "onOperation": false,
                        "onFragment": true,
                        "onField": true,
                        "args": [{ "name": "if", "type": { "kind": "NON_NULL", "ofType": { "name": "Boolean" } } }],
                    },
                ],
            },
        }),
    );
}

#[test]
fn introspection_query() {
    let data = executor().introspect(&()).expect("introspection succeeds");

    let schema = data.field("__schema").expect("has __schema");
    assert_eq!(
        schema.field("queryType"),
        Some(graphql_value!({ "name": "Query" })),
    );
    assert_eq!(
        schema.field("mutationType"),
        Some(graphql_value!({ "name": "Mutation" })),
    );

    let human = schema
        .field("types")
        .and_then(|types| {
            types
                .as_list_value()?
                .iter()
                .find(|t| t.field("name") == Some(graphql_value!("Human")))
                .cloned()
        })
        .expect("Human is listed");
    assert_eq!(human.field("kind"), Some(graphql_value!("OBJECT")));
    assert_eq!(
        human.field("interfaces"),
        Some(graphql_value!([{ "kind": "INTERFACE", "name": "Character", "ofType": null }])),
    );
}

#[test]
fn print_schema() {
    let printed = executor().print_schema(&()).expect("introspection succeeds");

    assert!(printed.starts_with("{\n  \"__schema\": {"), "{printed}");
    assert!(printed.contains("\"name\": \"ReviewInput\""), "{printed}");

    let parsed: serde_json::Value = serde_json::from_str(&printed).expect("valid JSON");
    assert_eq!(
        parsed["__schema"]["queryType"],
        serde_json::json!({ "name": "Query" }),
    );
}

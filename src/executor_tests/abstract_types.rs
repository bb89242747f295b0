use pretty_assertions::assert_eq;

use crate::{
    Value, Variables,
    executor::{Executor, Resolvers, typename_field},
};

const SCHEMA: &str = r#"
interface Named {
  name: String
}

type Dog implements Named {
  name: String
  woofs: Boolean
}

type Cat implements Named {
  name: String
  meows: Boolean
}

type Person implements Named {
  name: String
  pets: [Pet]
}

union Pet = Dog | Cat

type Query {
  pets: [Pet]
  named: [Named]
  owner: Person
}
"#;

fn pets() -> Value {
    graphql_value!([
        { "__typename": "Dog", "name": "Odie", "woofs": true },
        { "__typename": "Cat", "name": "Garfield", "meows": false },
    ])
}

fn executor() -> Executor<()> {
    let resolvers = Resolvers::<()>::new()
        .field("Query/pets", |_| {
            let mut pets = pets();
            if let Value::List(items) = &mut pets {
                items.push(graphql_value!({ "__typename": "Person", "name": "Jon" }));
            }
            Ok(pets)
        })
        .field("Query/named", |_| {
            let mut named = pets();
            if let Value::List(items) = &mut named {
                items.push(graphql_value!({ "__typename": "Person", "name": "Jon" }));
            }
            Ok(named)
        })
        .field("Query/owner", |_| {
            Ok(graphql_value!({ "__typename": "Person", "name": "Jon", "pets": (pets()) }))
        });

    let mut executor = Executor::new(SCHEMA, "Query", None, resolvers).expect("valid schema");
    executor.set_resolve_type(typename_field);
    executor
}

fn run(executor: &Executor<()>, query: &str) -> Value {
    executor
        .execute(&(), query, &Variables::default(), None)
        .expect("Execution failed")
}

#[test]
fn union_fragment_dispatch() {
    let query = r#"{
  pets {
    ... on Dog { name woofs }
    ... on Cat { name meows }
  }
}"#;

    assert_eq!(
        run(&executor(), query),
        graphql_value!({
            "data": {
                "pets": [
                    { "name": "Odie", "woofs": true },
                    { "name": "Garfield", "meows": false },
                    null,
                ],
            },
            "errors": [{
                "message": "Runtime object type \"Person\" is not a possible type \
                            for union type \"Pet\"",
                "locations": [{ "line": 2, "column": 3 }],
                "path": ["pets"],
            }],
        }),
    );
}

#[test]
fn interface_fields_and_fragments() {
    let query = r#"{
  named {
    __typename
    name
    ... on Dog { woofs }
    ...PersonPets
  }
}

fragment PersonPets on Person {
  pets { ... on Cat { meows } }
}"#;

    assert_eq!(
        run(&executor(), query),
        graphql_value!({
            "data": {
                "named": [
                    { "__typename": "Dog", "name": "Odie", "woofs": true },
                    { "__typename": "Cat", "name": "Garfield" },
                    { "__typename": "Person", "name": "Jon", "pets": null },
                ],
            },
        }),
    );
}

#[test]
fn fragments_on_abstract_types_apply_to_their_members() {
    let query = r#"{
  owner {
    ... on Named { name }
    pets {
      ... on Named { name }
      ... on Pet { __typename }
    }
  }
}"#;

    assert_eq!(
        run(&executor(), query),
        graphql_value!({
            "data": {
                "owner": {
                    "name": "Jon",
                    "pets": [
                        { "name": "Odie", "__typename": "Dog" },
                        { "name": "Garfield", "__typename": "Cat" },
                    ],
                },
            },
        }),
    );
}

#[test]
fn undetermined_types() {
    let resolvers = Resolvers::<()>::new().field("Query/pets", |_| Ok(pets()));
    let executor = Executor::new(SCHEMA, "Query", None, resolvers).expect("valid schema");

    assert_eq!(
        run(&executor, "{ pets { ... on Dog { name } } }"),
        graphql_value!({
            "data": { "pets": [null, null] },
            "errors": [
                {
                    "message": "The type of the value could not be determined",
                    "locations": [{ "line": 1, "column": 3 }],
                    "path": ["pets"],
                },
                {
                    "message": "The type of the value could not be determined",
                    "locations": [{ "line": 1, "column": 3 }],
                    "path": ["pets"],
                },
            ],
        }),
    );
}

#[test]
fn resolve_type_callback_sees_the_value() {
    let resolvers = Resolvers::<()>::new().field("Query/pets", |_| Ok(pets()));
    let mut executor = Executor::new(SCHEMA, "Query", None, resolvers).expect("valid schema");
    executor.set_resolve_type(|value| {
        let name = if value.field("woofs").is_some() { "Dog" } else { "Cat" };
        Some(name.into())
    });

    assert_eq!(
        run(&executor, "{ pets { __typename } }"),
        graphql_value!({
            "data": { "pets": [{ "__typename": "Dog" }, { "__typename": "Cat" }] },
        }),
    );
}

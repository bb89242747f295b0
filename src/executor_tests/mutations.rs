use std::sync::Mutex;

use pretty_assertions::assert_eq;

use crate::{
    Value, Variables,
    executor::{Executor, Resolvers},
};

const SCHEMA: &str = r#"
type Query {
  numberHolder: NumberHolder
}

type NumberHolder {
  theNumber: Int
}

type Mutation {
  changeTheNumber(newNumber: Int): NumberHolder
  failToChangeTheNumber(newNumber: Int): NumberHolder
}
"#;

struct Root {
    number: Mutex<i32>,
}

fn executor() -> Executor<Root> {
    let resolvers = Resolvers::<Root>::new()
        .field("Query/numberHolder", |p| {
            let number = *p.context.number.lock().unwrap();
            Ok(graphql_value!({ "theNumber": number }))
        })
        .field("Mutation/changeTheNumber", |p| {
            let number = p.arg("newNumber").and_then(Value::as_int).unwrap_or(0);
            *p.context.number.lock().unwrap() = number;
            Ok(graphql_value!({ "theNumber": number }))
        })
        .field("Mutation/failToChangeTheNumber", |_| {
            Err("Cannot change the number".into())
        });

    Executor::new(SCHEMA, "Query", Some("Mutation"), resolvers).expect("valid schema")
}

#[test]
fn evaluates_mutations_serially_in_source_order() {
    let root = Root {
        number: Mutex::new(6),
    };
    let query = r#"mutation M {
  first: changeTheNumber(newNumber: 1) { theNumber }
  second: failToChangeTheNumber(newNumber: 2) { theNumber }
  third: changeTheNumber(newNumber: 3) { theNumber }
  fourth: failToChangeTheNumber(newNumber: 4) { theNumber }
  fifth: changeTheNumber(newNumber: 5) { theNumber }
}"#;

    let response = executor()
        .execute(&root, query, &Variables::default(), None)
        .expect("Execution failed");

    assert_eq!(
        response,
        graphql_value!({
            "data": {
                "first": { "theNumber": 1 },
                "second": null,
                "third": { "theNumber": 3 },
                "fourth": null,
                "fifth": { "theNumber": 5 },
            },
            "errors": [
                {
                    "message": "Cannot change the number",
                    "locations": [{ "line": 3, "column": 11 }],
                    "path": ["second"],
                },
                {
                    "message": "Cannot change the number",
                    "locations": [{ "line": 5, "column": 11 }],
                    "path": ["fourth"],
                },
            ],
        }),
    );
    assert_eq!(*root.number.lock().unwrap(), 5);
}

#[test]
fn response_keys_follow_source_order() {
    let root = Root {
        number: Mutex::new(0),
    };

    let response = executor()
        .execute(
            &root,
            "mutation { b: changeTheNumber(newNumber: 2) { theNumber } a: changeTheNumber(newNumber: 1) { theNumber } }",
            &Variables::default(),
            None,
        )
        .expect("Execution failed");
    let keys = response
        .field("data")
        .and_then(Value::into_object)
        .expect("data is an object")
        .iter()
        .map(|(k, _)| k.clone())
        .collect::<Vec<_>>();

    assert_eq!(keys, ["b", "a"]);
    assert_eq!(*root.number.lock().unwrap(), 1);
}

#[test]
fn queries_use_the_query_root() {
    let root = Root {
        number: Mutex::new(7),
    };

    assert_eq!(
        executor()
            .execute(&root, "{ numberHolder { theNumber } }", &Variables::default(), None)
            .expect("Execution failed"),
        graphql_value!({ "data": { "numberHolder": { "theNumber": 7 } } }),
    );
}

//! [`graphql_vars!`] macro implementation.
//!
//! [`graphql_vars!`]: graphql_vars

/// Constructs [`Variables`] via JSON-like syntax.
///
/// Takes the same syntax as the inside of a [`graphql_value!`] object.
/// ```rust
/// # use dynql::{graphql_vars, Variables};
/// #
/// let code = 200;
///
/// let vars: Variables = graphql_vars! {
///     "code": code,
///     "tags": ["a", "b"],
///     "input": { "a": "foo", "b": null },
/// };
/// ```
///
/// [`graphql_value!`]: crate::graphql_value
/// [`Variables`]: crate::Variables
#[macro_export]
macro_rules! graphql_vars {
    () => {
        $crate::Variables::with_capacity(0)
    };

    ($($map:tt)+) => {{
        let mut object = $crate::Variables::with_capacity(0);
        $crate::graphql_value!(@object object $($map)+);
        object
    }};
}

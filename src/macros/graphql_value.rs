//! [`graphql_value!`] macro implementation.
//!
//! [`graphql_value!`]: graphql_value

/// Constructs [`Value`]s via JSON-like syntax.
///
/// Object keys are string literals or parenthesized expressions converting
/// [`Into`]`<`[`String`]`>`; anything else in value position goes through
/// [`Value::from`].
/// ```rust
/// # use dynql::{graphql_value, Value};
/// #
/// let code = 200;
///
/// let value: Value = graphql_value!({
///     "code": code,
///     "success": code == 200,
///     "payload": { ("feat".to_owned() + "ures"): ["key", "value", null] },
/// });
/// ```
///
/// [`Value`]: crate::Value
/// [`Value::from`]: crate::Value::from
#[macro_export]
macro_rules! graphql_value {
    //////////
    // List //
    //////////

    (@list [$($done:expr),*]) => {
        $crate::Value::list(vec![$($done),*])
    };

    (@list [$($done:expr),*] null $(, $($rest:tt)*)?) => {
        $crate::graphql_value!(@list [$($done,)* $crate::Value::Null] $($($rest)*)?)
    };

    (@list [$($done:expr),*] None $(, $($rest:tt)*)?) => {
        $crate::graphql_value!(@list [$($done,)* $crate::Value::Null] $($($rest)*)?)
    };

    (@list [$($done:expr),*] [$($list:tt)*] $(, $($rest:tt)*)?) => {
        $crate::graphql_value!(
            @list [$($done,)* $crate::graphql_value!([$($list)*])] $($($rest)*)?
        )
    };

    (@list [$($done:expr),*] {$($map:tt)*} $(, $($rest:tt)*)?) => {
        $crate::graphql_value!(
            @list [$($done,)* $crate::graphql_value!({$($map)*})] $($($rest)*)?
        )
    };

    (@list [$($done:expr),*] $next:expr $(, $($rest:tt)*)?) => {
        $crate::graphql_value!(
            @list [$($done,)* $crate::Value::from($next)] $($($rest)*)?
        )
    };

    ////////////
    // Object //
    ////////////

    (@object $object:ident) => {};

    (@object $object:ident $key:tt : null $(, $($rest:tt)*)?) => {
        let _ = $object.add_field($key, $crate::Value::Null);
        $crate::graphql_value!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:tt : None $(, $($rest:tt)*)?) => {
        let _ = $object.add_field($key, $crate::Value::Null);
        $crate::graphql_value!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:tt : [$($list:tt)*] $(, $($rest:tt)*)?) => {
        let _ = $object.add_field($key, $crate::graphql_value!([$($list)*]));
        $crate::graphql_value!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:tt : {$($map:tt)*} $(, $($rest:tt)*)?) => {
        let _ = $object.add_field($key, $crate::graphql_value!({$($map)*}));
        $crate::graphql_value!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:tt : $value:expr $(, $($rest:tt)*)?) => {
        let _ = $object.add_field($key, $crate::Value::from($value));
        $crate::graphql_value!(@object $object $($($rest)*)?);
    };

    //////////////
    // Defaults //
    //////////////

    (null) => ($crate::Value::Null);

    (None) => ($crate::Value::Null);

    ([ $($list:tt)* ]) => {
        $crate::graphql_value!(@list [] $($list)*)
    };

    ({}) => {
        $crate::Value::object($crate::Object::with_capacity(0))
    };

    ({ $($map:tt)+ }) => {
        $crate::Value::object({
            let mut object = $crate::Object::with_capacity(0);
            $crate::graphql_value!(@object object $($map)+);
            object
        })
    };

    ($e:expr) => ($crate::Value::from($e));
}

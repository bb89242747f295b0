//! Built-in scalar coercion and name helpers

pub mod name;
pub mod scalars;

//! Declarative macros for building values and instrumenting execution.

#[macro_use]
mod tracing;
#[macro_use]
mod graphql_value;
#[macro_use]
mod graphql_vars;

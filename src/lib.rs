#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::fmt;

// These are required by the `__dynql_*` tracing macros.
#[cfg(feature = "tracing")]
#[doc(hidden)]
pub use tracing;

#[doc(hidden)]
#[macro_use]
pub mod macros;
pub mod ast;
pub mod executor;
mod introspection;
pub mod integrations;
pub mod parser;
pub mod schema;
pub mod types;
mod value;

#[cfg(test)]
mod executor_tests;

use static_assertions as sa;

pub use crate::{
    ast::{Document, InputValue, Type},
    executor::{
        ErrorSerializer, ExecutionError, Executor, FieldError, FieldPath, FieldResolver,
        FieldResult, ResolveParams, Resolvers, ScalarCallbacks, Variables,
        default_error_serializer, is_null, is_null_or_empty, typename_field,
        verbose_error_serializer,
    },
    parser::{ParseError, SourcePosition, Span, Spanning},
    schema::{Schema, SchemaError, TypeKind},
    value::{FieldSource, Object, Value},
};

sa::assert_impl_all!(Value: Send, Sync);
sa::assert_impl_all!(Executor<()>: Send, Sync);

/// An error that prevented a request from executing at all
#[derive(Clone, Debug, PartialEq)]
pub enum GraphQLError {
    /// The request (or the schema it was checked against) failed to parse.
    ParseError(Spanning<ParseError>),
    /// The schema or the resolver registry is inconsistent.
    SchemaError(SchemaError),
    /// The request contains no operation.
    NoOperationProvided,
    /// The request contains several operations and no name picks one.
    MultipleOperationsProvided,
    /// No operation in the request carries the given name.
    UnknownOperationName(String),
    /// A mutation was requested but the schema has no mutation root.
    MutationsNotSupported,
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError(e) => write!(f, "{e}"),
            Self::SchemaError(e) => write!(f, "{e}"),
            Self::NoOperationProvided => {
                write!(f, "GraphQL Runtime Error: Must provide an operation")
            }
            Self::MultipleOperationsProvided => write!(
                f,
                "GraphQL Runtime Error: Must provide operation name \
                 if query contains multiple operations",
            ),
            Self::UnknownOperationName(name) => write!(
                f,
                "GraphQL Runtime Error: Operation with name \"{name}\" not found in document",
            ),
            Self::MutationsNotSupported => write!(
                f,
                "GraphQL Runtime Error: Schema is not configured for mutations",
            ),
        }
    }
}

impl std::error::Error for GraphQLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseError(e) => Some(e),
            Self::SchemaError(e) => Some(e),
            Self::NoOperationProvided
            | Self::MultipleOperationsProvided
            | Self::UnknownOperationName(_)
            | Self::MutationsNotSupported => None,
        }
    }
}

impl From<Spanning<ParseError>> for GraphQLError {
    fn from(e: Spanning<ParseError>) -> Self {
        Self::ParseError(e)
    }
}

impl From<SchemaError> for GraphQLError {
    fn from(e: SchemaError) -> Self {
        Self::SchemaError(e)
    }
}

//! Schema construction and metadata

pub mod meta;
pub mod model;

pub use self::{
    meta::TypeKind,
    model::{Schema, SchemaError},
};

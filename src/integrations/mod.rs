//! Wire formats of values, errors and responses

pub mod serde;

//! Value types and the crate-wide error type.

pub mod core;
pub mod error;

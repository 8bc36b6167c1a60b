//! # Filter Engine
//!
//! Translates list query parameters into a predicate over books. Each
//! criterion is an exact match; criteria are combined with AND.

mod criterion;
mod registry;

pub use criterion::{BookFilter, Criterion};
pub use registry::FilterRegistry;

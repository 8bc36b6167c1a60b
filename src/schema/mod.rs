//! Declarative entity schemas and field validation
//!
//! # Design Principles
//!
//! - Entities declare their fields and constraints as static data
//! - Validation is an explicit routine over that data, not reflection
//! - Violations are collected per field
//! - Coercion is limited to numbers as text and numeric strings as integers

mod errors;
mod types;
mod validator;

pub use errors::{messages, ValidationErrors, NON_FIELD_ERRORS};
pub use types::{EntitySchema, FieldDef, FieldType};
pub use validator::{validate_value, FieldValue, SchemaValidator, ValidatedFields, ValidationMode};

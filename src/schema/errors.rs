//! Field-level validation errors
//!
//! Errors are collected per field name so a single response can report every
//! violation at once. Messages are stable strings clients may match on.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Key under which errors not tied to a single field are reported
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Stable validation messages
pub mod messages {
    pub const REQUIRED: &str = "This field is required.";
    pub const BLANK: &str = "This field may not be blank.";
    pub const NULL: &str = "This field may not be null.";
    pub const NOT_A_STRING: &str = "Not a valid string.";
    pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";
    pub const NOT_AN_INTEGER: &str = "A valid integer is required.";
    pub const ALREADY_EXISTS: &str = "already exists";
    pub const INVALID_NUMBER: &str = "Enter a number.";
    pub const INVALID_UUID: &str = "Enter a valid UUID.";
    pub const INVALID_DATETIME: &str = "Enter a valid date/time.";
    pub const INVALID_CHOICE: &str =
        "Select a valid choice. That choice is not one of the available choices.";
    pub const UNKNOWN_FILTER: &str = "Unknown filter field.";

    /// Message for strings longer than the field allows
    pub fn max_length(limit: usize) -> String {
        format!("Ensure this field has no more than {} characters.", limit)
    }

    /// Message for integers below the accepted range
    pub fn min_value(limit: i64) -> String {
        format!("Ensure this value is greater than or equal to {}.", limit)
    }

    /// Message for integers above the accepted range
    pub fn max_value(limit: i64) -> String {
        format!("Ensure this value is less than or equal to {}.", limit)
    }

    /// Message for a payload that is not a JSON object
    pub fn expected_object(actual: &str) -> String {
        format!("Invalid data. Expected a dictionary, but got {}.", actual)
    }
}

/// Per-field validation failures, serialized as `{field: [messages]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message for one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Appends a message to the given field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Whether a field has at least one message
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns `Ok(value)` when no error was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

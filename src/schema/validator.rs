//! Payload validation against an entity schema
//!
//! Validation semantics:
//! - Only writable fields (optionally restricted to an exposed subset) are read
//! - Unknown and read-only keys are ignored
//! - Full mode reports every missing required field
//! - Partial mode checks only the supplied fields
//! - Strings are trimmed before the blank and length checks; JSON numbers
//!   are accepted as their text
//! - Integers may also be sent as numeric strings
//! - Every violation is collected, validation does not stop at the first one
//!
//! Uniqueness is not checked here: it needs the store and is left to callers.

use std::collections::BTreeMap;
use std::num::IntErrorKind;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::errors::{messages, ValidationErrors, NON_FIELD_ERRORS};
use super::types::{EntitySchema, FieldDef, FieldType};

/// Whether missing required fields are violations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every required field must be supplied
    Full,
    /// Only supplied fields are validated
    Partial,
}

/// A validated, typed input value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i32),
    Id(Uuid),
    Ids(Vec<Uuid>),
    Timestamp(DateTime<Utc>),
}

/// Validated values keyed by field name
pub type ValidatedFields = BTreeMap<&'static str, FieldValue>;

/// Validates inbound JSON documents against an `EntitySchema`.
///
/// Validator does not mutate documents and is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator {
    schema: &'static EntitySchema,
    exposed: Option<&'static [&'static str]>,
}

impl SchemaValidator {
    /// Validator over every writable field of the schema
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            exposed: None,
        }
    }

    /// Restricts validation to the named fields
    pub fn exposing(mut self, fields: &'static [&'static str]) -> Self {
        self.exposed = Some(fields);
        self
    }

    /// Fields this validator reads from a payload
    pub fn input_fields(&self) -> impl Iterator<Item = &'static FieldDef> + '_ {
        self.schema
            .writable_fields()
            .filter(move |f| self.exposed.map_or(true, |names| names.contains(&f.name)))
    }

    /// Validates a document and returns the typed values it supplied.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` if the document is not an object, a
    /// supplied value violates its field definition, or (in full mode) a
    /// required field is missing.
    pub fn validate_document(
        &self,
        document: &Value,
        mode: ValidationMode,
    ) -> Result<ValidatedFields, ValidationErrors> {
        let obj = document.as_object().ok_or_else(|| {
            ValidationErrors::single(
                NON_FIELD_ERRORS,
                messages::expected_object(json_type_name(document)),
            )
        })?;

        let mut errors = ValidationErrors::new();
        let mut values = ValidatedFields::new();

        for def in self.input_fields() {
            match obj.get(def.name) {
                Some(value) => match validate_value(def, value) {
                    Ok(v) => {
                        values.insert(def.name, v);
                    }
                    Err(message) => errors.add(def.name, message),
                },
                None => {
                    if mode == ValidationMode::Full && def.required {
                        errors.add(def.name, messages::REQUIRED);
                    }
                }
            }
        }

        errors.into_result(values)
    }
}

/// Validates a single value against its field definition.
pub fn validate_value(def: &FieldDef, value: &Value) -> Result<FieldValue, String> {
    if value.is_null() {
        return if def.nullable {
            Ok(FieldValue::Null)
        } else {
            Err(messages::NULL.to_string())
        };
    }

    match def.field_type {
        FieldType::String => {
            let owned;
            let text = match value {
                Value::String(s) => s.trim(),
                Value::Number(n) => {
                    owned = n.to_string();
                    owned.as_str()
                }
                _ => return Err(messages::NOT_A_STRING.to_string()),
            };
            if text.is_empty() {
                return Err(messages::BLANK.to_string());
            }
            if let Some(limit) = def.max_length {
                if text.chars().count() > limit {
                    return Err(messages::max_length(limit));
                }
            }
            if text.contains('\0') {
                return Err(messages::NULL_CHARACTERS.to_string());
            }
            Ok(FieldValue::Text(text.to_string()))
        }
        FieldType::Int => validate_int(value).map(FieldValue::Int),
        FieldType::Uuid | FieldType::Reference { .. } => parse_uuid(value).map(FieldValue::Id),
        FieldType::ReferenceSet { .. } => {
            let items = value
                .as_array()
                .ok_or_else(|| messages::INVALID_UUID.to_string())?;
            items
                .iter()
                .map(parse_uuid)
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::Ids)
        }
        FieldType::Timestamp => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| FieldValue::Timestamp(dt.with_timezone(&Utc)))
            .ok_or_else(|| messages::INVALID_DATETIME.to_string()),
    }
}

/// Integers are JSON numbers or numeric strings without a fractional part,
/// within i32 range. A trailing `.0` is accepted.
fn validate_int(value: &Value) -> Result<i32, String> {
    let wide = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i128::from(i)
            } else if let Some(u) = n.as_u64() {
                i128::from(u)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.is_finite() => f as i128,
                    _ => return Err(messages::NOT_AN_INTEGER.to_string()),
                }
            }
        }
        Value::String(s) => parse_int_text(s)?,
        _ => return Err(messages::NOT_AN_INTEGER.to_string()),
    };

    if wide < i128::from(i32::MIN) {
        return Err(messages::min_value(i64::from(i32::MIN)));
    }
    if wide > i128::from(i32::MAX) {
        return Err(messages::max_value(i64::from(i32::MAX)));
    }
    Ok(wide as i32)
}

fn parse_int_text(raw: &str) -> Result<i128, String> {
    let text = raw.trim();
    let digits = match text.split_once('.') {
        Some((whole, zeros)) if zeros.chars().all(|c| c == '0') => whole,
        Some(_) => return Err(messages::NOT_AN_INTEGER.to_string()),
        None => text,
    };
    match digits.parse::<i128>() {
        Ok(n) => Ok(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i128::MAX),
            IntErrorKind::NegOverflow => Ok(i128::MIN),
            _ => Err(messages::NOT_AN_INTEGER.to_string()),
        },
    }
}

fn parse_uuid(value: &Value) -> Result<Uuid, String> {
    value
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| messages::INVALID_UUID.to_string())
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

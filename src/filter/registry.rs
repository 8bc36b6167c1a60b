//! Query parameter registry
//!
//! Maps each filterable book field to the function that parses its query
//! values into a `Criterion`. Names missing from the registry are rejected.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::catalog::{AuthorId, BookId, PublisherId};
use crate::schema::{messages, ValidationErrors};

use super::criterion::{BookFilter, Criterion};

/// Parses the trimmed, non-empty values given for one field.
///
/// Single-valued fields receive only the last value.
type ParseFn = fn(&[&str]) -> Result<Criterion, String>;

#[derive(Debug, Clone, Copy)]
struct FieldFilter {
    multi: bool,
    parse: ParseFn,
}

/// Field name to parser map, built once and shared across requests
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    fields: BTreeMap<&'static str, FieldFilter>,
}

impl FilterRegistry {
    /// Registry covering every declared book field
    pub fn books() -> Self {
        let mut registry = Self {
            fields: BTreeMap::new(),
        };
        registry.register("id", false, parse_id);
        registry.register("title", false, parse_title);
        registry.register("price", false, parse_price);
        registry.register("publisher", false, parse_publisher);
        registry.register("authors", true, parse_authors);
        registry.register("created_at", false, parse_created_at);
        registry
    }

    fn register(&mut self, name: &'static str, multi: bool, parse: ParseFn) {
        self.fields.insert(name, FieldFilter { multi, parse });
    }

    /// Parses query parameters, in request order, into a filter.
    ///
    /// Values are trimmed; blank values are skipped. Every unknown name and
    /// malformed value is reported, keyed by the parameter name.
    pub fn parse(&self, params: &[(String, String)]) -> Result<BookFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut grouped: BTreeMap<&'static str, Vec<&str>> = BTreeMap::new();

        for (name, value) in params {
            match self.fields.get_key_value(name.as_str()) {
                Some((key, _)) => grouped.entry(*key).or_default().push(value.as_str()),
                None => {
                    if !errors.contains(name) {
                        errors.add(name.as_str(), messages::UNKNOWN_FILTER);
                    }
                }
            }
        }

        let mut criteria = Vec::new();
        for (name, raw) in grouped {
            let Some(field) = self.fields.get(name) else {
                continue;
            };

            let values: Vec<&str> = if field.multi {
                raw.into_iter().map(str::trim).filter(|v| !v.is_empty()).collect()
            } else {
                raw.last()
                    .copied()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .into_iter()
                    .collect()
            };
            if values.is_empty() {
                continue;
            }

            match (field.parse)(&values) {
                Ok(criterion) => criteria.push(criterion),
                Err(message) => errors.add(name, message),
            }
        }

        errors.into_result(BookFilter::new(criteria))
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw).map_err(|_| messages::INVALID_UUID.to_string())
}

fn parse_id(values: &[&str]) -> Result<Criterion, String> {
    let raw = values.last().copied().unwrap_or_default();
    parse_uuid(raw).map(|u| Criterion::Id(BookId::from_uuid(u)))
}

fn parse_title(values: &[&str]) -> Result<Criterion, String> {
    let raw = values.last().copied().unwrap_or_default();
    Ok(Criterion::Title(raw.to_string()))
}

fn parse_price(values: &[&str]) -> Result<Criterion, String> {
    let raw = values.last().copied().unwrap_or_default();
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Criterion::Price(n)),
        _ => Err(messages::INVALID_NUMBER.to_string()),
    }
}

fn parse_publisher(values: &[&str]) -> Result<Criterion, String> {
    let raw = values.last().copied().unwrap_or_default();
    parse_uuid(raw).map(|u| Criterion::Publisher(PublisherId::from_uuid(u)))
}

fn parse_authors(values: &[&str]) -> Result<Criterion, String> {
    values
        .iter()
        .map(|raw| parse_uuid(raw).map(AuthorId::from_uuid))
        .collect::<Result<_, _>>()
        .map(Criterion::Authors)
}

/// Accepts RFC 3339, or a naive `YYYY-MM-DD[ HH:MM[:SS[.f]]]` read as UTC.
fn parse_created_at(values: &[&str]) -> Result<Criterion, String> {
    let raw = values.last().copied().unwrap_or_default();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Criterion::CreatedAt(dt.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Criterion::CreatedAt(naive.and_utc()));
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Criterion::CreatedAt(midnight.and_utc()));
    }

    Err(messages::INVALID_DATETIME.to_string())
}

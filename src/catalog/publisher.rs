//! Publisher and author records
//!
//! Both are plain named entities: a generated identity, a short name and a
//! creation timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{validate_value, EntitySchema, FieldDef, FieldValue, ValidationErrors};

use super::ids::{AuthorId, PublisherId};

/// Maximum length of publisher and author names
pub const NAME_MAX_LENGTH: usize = 20;

pub static PUBLISHER_SCHEMA: EntitySchema = EntitySchema {
    name: "publisher",
    fields: &[
        FieldDef::id(),
        FieldDef::string("name", NAME_MAX_LENGTH),
        FieldDef::created_at("created_at"),
    ],
};

pub static AUTHOR_SCHEMA: EntitySchema = EntitySchema {
    name: "author",
    fields: &[
        FieldDef::id(),
        FieldDef::string("name", NAME_MAX_LENGTH),
        FieldDef::created_at("created_at"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: PublisherId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Publisher {
    /// Creates a publisher with a validated name
    pub fn new(name: &str) -> Result<Self, ValidationErrors> {
        Ok(Self {
            id: PublisherId::new(),
            name: validated_name(&PUBLISHER_SCHEMA, name)?,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Author {
    /// Creates an author with a validated name
    pub fn new(name: &str) -> Result<Self, ValidationErrors> {
        Ok(Self {
            id: AuthorId::new(),
            name: validated_name(&AUTHOR_SCHEMA, name)?,
            created_at: Utc::now(),
        })
    }
}

fn validated_name(schema: &'static EntitySchema, name: &str) -> Result<String, ValidationErrors> {
    let def = schema
        .field("name")
        .ok_or_else(|| ValidationErrors::single("name", "field not declared"))?;

    match validate_value(def, &Value::String(name.to_string())) {
        Ok(FieldValue::Text(text)) => Ok(text),
        Ok(_) => Err(ValidationErrors::single("name", "unexpected value")),
        Err(message) => Err(ValidationErrors::single("name", message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::messages;

    #[test]
    fn test_publisher_name_trimmed() {
        let publisher = Publisher::new("  Penguin ").unwrap();
        assert_eq!(publisher.name, "Penguin");
    }

    #[test]
    fn test_name_limits() {
        let errors = Author::new(&"x".repeat(21)).unwrap_err();
        assert_eq!(
            errors.get("name").unwrap(),
            &[messages::max_length(NAME_MAX_LENGTH)]
        );
        assert!(Author::new(&"x".repeat(20)).is_ok());
        assert!(Publisher::new("").is_err());
    }
}

//! Field and entity schema definitions
//!
//! Supported field types:
//! - uuid: opaque identity, generated by the store
//! - string: UTF-8 string with an optional maximum length (in characters)
//! - int: 32-bit signed integer
//! - timestamp: UTC date/time
//! - reference: identity of a record in another entity
//! - reference_set: set of identities of records in another entity

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Opaque unique identity
    Uuid,
    /// UTF-8 string
    String,
    /// 32-bit signed integer
    Int,
    /// UTC timestamp
    Timestamp,
    /// Single reference to another entity
    Reference {
        /// Name of the referenced entity
        target: &'static str,
    },
    /// Many-to-many reference to another entity
    ReferenceSet {
        /// Name of the referenced entity
        target: &'static str,
    },
}

/// Field definition with its constraint metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name as seen on the wire
    pub name: &'static str,
    /// Field data type
    pub field_type: FieldType,
    /// Maximum length in characters (strings only)
    pub max_length: Option<usize>,
    /// Whether `null` is an accepted value
    pub nullable: bool,
    /// Whether the field must be supplied on a full write
    pub required: bool,
    /// Whether the field is assigned by the system and ignored on input
    pub read_only: bool,
}

impl FieldDef {
    const fn base(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            max_length: None,
            nullable: false,
            required: false,
            read_only: false,
        }
    }

    /// System-assigned identity field
    pub const fn id() -> Self {
        Self {
            read_only: true,
            ..Self::base("id", FieldType::Uuid)
        }
    }

    /// System-assigned creation timestamp
    pub const fn created_at(name: &'static str) -> Self {
        Self {
            read_only: true,
            ..Self::base(name, FieldType::Timestamp)
        }
    }

    /// Required string field limited to `max_length` characters
    pub const fn string(name: &'static str, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            required: true,
            ..Self::base(name, FieldType::String)
        }
    }

    /// Required integer field
    pub const fn int(name: &'static str) -> Self {
        Self {
            required: true,
            ..Self::base(name, FieldType::Int)
        }
    }

    /// Required reference to another entity
    pub const fn reference(name: &'static str, target: &'static str) -> Self {
        Self {
            required: true,
            ..Self::base(name, FieldType::Reference { target })
        }
    }

    /// Many-to-many reference to another entity
    pub const fn reference_set(name: &'static str, target: &'static str) -> Self {
        Self::base(name, FieldType::ReferenceSet { target })
    }

    /// Marks the field as nullable and no longer required
    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            required: false,
            ..self
        }
    }

    /// Whether clients may write this field
    pub fn is_writable(&self) -> bool {
        !self.read_only
    }
}

/// Complete schema of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Entity name, also used in constraint messages
    pub name: &'static str,
    /// Field definitions in declaration order
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }

    /// Fields that accept client input
    pub fn writable_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter().filter(|f| f.is_writable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: EntitySchema = EntitySchema {
        name: "sample",
        fields: &[
            FieldDef::id(),
            FieldDef::string("name", 10),
            FieldDef::int("count").nullable(),
            FieldDef::created_at("created_at"),
        ],
    };

    #[test]
    fn test_field_lookup() {
        let name = SAMPLE.field("name").unwrap();
        assert_eq!(name.max_length, Some(10));
        assert!(name.required);
        assert!(SAMPLE.field("missing").is_none());
    }

    #[test]
    fn test_nullable_clears_required() {
        let count = SAMPLE.field("count").unwrap();
        assert!(count.nullable);
        assert!(!count.required);
    }

    #[test]
    fn test_read_only_fields_not_writable() {
        let writable: Vec<_> = SAMPLE.writable_fields().map(|f| f.name).collect();
        assert_eq!(writable, vec!["name", "count"]);
    }
}

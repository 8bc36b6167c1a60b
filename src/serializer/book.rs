//! Book serializer
//!
//! Only `id`, `title` and `price` cross the wire. Publisher, authors and the
//! creation timestamp are stored but never exposed or accepted here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{Book, BookId, BOOK_SCHEMA};
use crate::schema::{
    messages, FieldValue, SchemaValidator, ValidatedFields, ValidationErrors, ValidationMode,
};
use crate::store::{EntityStore, StoreError};

/// Fields exposed by the book representation
pub const BOOK_FIELDS: &[&str] = &["id", "title", "price"];

/// Wire representation of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRepr {
    pub id: BookId,
    pub title: String,
    pub price: Option<i32>,
}

impl From<&Book> for BookRepr {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            price: book.price,
        }
    }
}

impl BookRepr {
    pub fn many(books: &[Book]) -> Vec<BookRepr> {
        books.iter().map(BookRepr::from).collect()
    }
}

/// Validated field updates for a book.
///
/// `price: Some(None)` clears the price, `price: None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChangeSet {
    pub title: Option<String>,
    pub price: Option<Option<i32>>,
}

impl BookChangeSet {
    fn from_values(values: ValidatedFields) -> Self {
        let mut changes = Self::default();
        for (field, value) in values {
            match (field, value) {
                ("title", FieldValue::Text(title)) => changes.title = Some(title),
                ("price", FieldValue::Int(price)) => changes.price = Some(Some(price)),
                ("price", FieldValue::Null) => changes.price = Some(None),
                _ => {}
            }
        }
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.price.is_none()
    }

    /// Merges the supplied fields onto `book`
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title.clone_from(title);
        }
        if let Some(price) = self.price {
            book.price = price;
        }
    }
}

#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationErrors> for SerializerError {
    fn from(errors: ValidationErrors) -> Self {
        SerializerError::Invalid(errors)
    }
}

/// Validates book payloads against `BOOK_SCHEMA` and the current store.
pub struct BookSerializer<'a, S: EntityStore + ?Sized> {
    store: &'a S,
    validator: SchemaValidator,
}

impl<'a, S: EntityStore + ?Sized> BookSerializer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            validator: SchemaValidator::new(&BOOK_SCHEMA).exposing(BOOK_FIELDS),
        }
    }

    /// Full validation of a create payload into a new, unsaved book.
    pub fn validate_create(&self, payload: &Value) -> Result<Book, SerializerError> {
        let changes = self.validate(payload, ValidationMode::Full, None)?;

        let mut book = Book::new(String::new(), None);
        changes.apply(&mut book);
        Ok(book)
    }

    /// Partial validation of an update payload against `existing`.
    pub fn validate_update(
        &self,
        payload: &Value,
        existing: &Book,
    ) -> Result<BookChangeSet, SerializerError> {
        self.validate(payload, ValidationMode::Partial, Some(existing.id))
    }

    fn validate(
        &self,
        payload: &Value,
        mode: ValidationMode,
        existing: Option<BookId>,
    ) -> Result<BookChangeSet, SerializerError> {
        let values = self.validator.validate_document(payload, mode)?;
        let changes = BookChangeSet::from_values(values);

        if let Some(title) = &changes.title {
            if self.store.title_taken(title, existing)? {
                return Err(ValidationErrors::single("title", messages::ALREADY_EXISTS).into());
            }
        }

        Ok(changes)
    }
}

//! Book and stock records
//!
//! Book is the aggregation root for catalog queries. BookStock is keyed by
//! the book it counts and lives and dies with it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{EntitySchema, FieldDef};

use super::ids::{AuthorId, BookId, PublisherId};

/// Maximum length of a book title
pub const TITLE_MAX_LENGTH: usize = 20;

pub static BOOK_SCHEMA: EntitySchema = EntitySchema {
    name: "book",
    fields: &[
        FieldDef::id(),
        FieldDef::string("title", TITLE_MAX_LENGTH),
        FieldDef::int("price").nullable(),
        FieldDef::reference("publisher", "publisher").nullable(),
        FieldDef::reference_set("authors", "author"),
        FieldDef::created_at("created_at"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub price: Option<i32>,
    pub publisher: Option<PublisherId>,
    pub authors: BTreeSet<AuthorId>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Creates an unpublished, author-less book stamped with the current time.
    ///
    /// Callers are expected to have validated `title` against `BOOK_SCHEMA`.
    pub fn new(title: impl Into<String>, price: Option<i32>) -> Self {
        Self {
            id: BookId::new(),
            title: title.into(),
            price,
            publisher: None,
            authors: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_publisher(mut self, publisher: PublisherId) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_author(mut self, author: AuthorId) -> Self {
        self.authors.insert(author);
        self
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStock {
    pub book: BookId,
    pub quantity: i32,
}

impl BookStock {
    /// Stock record with the default quantity of zero
    pub fn empty(book: BookId) -> Self {
        Self { book, quantity: 0 }
    }
}

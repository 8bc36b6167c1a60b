//! # Serialization Layer
//!
//! Converts between the wire representation of a book (`{id, title, price}`)
//! and stored records, validating inbound payloads into change-sets.

mod book;

pub use book::{BookChangeSet, BookRepr, BookSerializer, SerializerError, BOOK_FIELDS};

//! Catalog data model
//!
//! Publisher, Author, Book and BookStock records, and the schemas client
//! input is validated against.

mod book;
mod ids;
mod publisher;

pub use book::{Book, BookStock, BOOK_SCHEMA, TITLE_MAX_LENGTH};
pub use ids::{AuthorId, BookId, PublisherId};
pub use publisher::{Author, Publisher, AUTHOR_SCHEMA, NAME_MAX_LENGTH, PUBLISHER_SCHEMA};

//! # Entity Store
//!
//! Persistence seam for catalog records. The store owns referential rules
//! and uniqueness so that they hold under concurrent requests:
//!
//! - Book titles are unique, re-checked inside the write
//! - Deleting a publisher clears `publisher` on its books
//! - Deleting an author removes it from every book
//! - Deleting a book deletes its stock record

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;

use crate::catalog::{Author, AuthorId, Book, BookId, BookStock, Publisher, PublisherId};

/// Storage operations used by the request handlers.
///
/// Every mutating call is atomic with respect to every other call.
pub trait EntityStore: Send + Sync {
    fn insert_publisher(&self, publisher: Publisher) -> StoreResult<Publisher>;

    fn get_publisher(&self, id: PublisherId) -> StoreResult<Option<Publisher>>;

    /// Deletes a publisher and detaches it from its books
    fn delete_publisher(&self, id: PublisherId) -> StoreResult<()>;

    fn insert_author(&self, author: Author) -> StoreResult<Author>;

    fn get_author(&self, id: AuthorId) -> StoreResult<Option<Author>>;

    /// Deletes an author and unlinks it from its books
    fn delete_author(&self, id: AuthorId) -> StoreResult<()>;

    /// Inserts a book, failing on a duplicate title or a dangling reference
    fn insert_book(&self, book: Book) -> StoreResult<Book>;

    fn get_book(&self, id: BookId) -> StoreResult<Option<Book>>;

    /// Books accepted by `predicate`, ordered by creation time then id
    fn list_books(&self, predicate: &dyn Fn(&Book) -> bool) -> StoreResult<Vec<Book>>;

    /// Applies `change` to the stored book inside the write, failing on a
    /// duplicate title or a dangling reference
    fn update_book(&self, id: BookId, change: &dyn Fn(&mut Book)) -> StoreResult<Book>;

    /// Deletes a book together with its stock record
    fn delete_book(&self, id: BookId) -> StoreResult<()>;

    /// Whether another book already uses `title`
    fn title_taken(&self, title: &str, except: Option<BookId>) -> StoreResult<bool>;

    /// Creates or replaces the stock record of a book
    fn set_stock(&self, book: BookId, quantity: i32) -> StoreResult<BookStock>;

    fn get_stock(&self, book: BookId) -> StoreResult<Option<BookStock>>;

    fn publisher_exists(&self, id: PublisherId) -> StoreResult<bool> {
        Ok(self.get_publisher(id)?.is_some())
    }

    fn author_exists(&self, id: AuthorId) -> StoreResult<bool> {
        Ok(self.get_author(id)?.is_some())
    }
}

//! # Book Handlers
//!
//! One operation per HTTP verb over the book collection. Handlers hold no
//! per-request state; every mutation is a single store call, so a change
//! is merged onto the stored book as it is at write time.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::{Book, BookId};
use crate::filter::FilterRegistry;
use crate::serializer::{BookRepr, BookSerializer};
use crate::store::EntityStore;

use super::errors::{RestError, RestResult};

/// Request handlers for `/books`
pub struct BookHandler<S: EntityStore + ?Sized> {
    store: Arc<S>,
    filters: FilterRegistry,
}

impl<S: EntityStore + ?Sized> Clone for BookHandler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            filters: self.filters.clone(),
        }
    }
}

impl<S: EntityStore + ?Sized> BookHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            filters: FilterRegistry::books(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Validates and stores a new book
    pub fn create(&self, payload: &Value) -> RestResult<BookRepr> {
        let book = BookSerializer::new(self.store.as_ref())
            .validate_create(payload)
            .map_err(reject)?;

        let book = self.store.insert_book(book).map_err(reject)?;
        info!(book_id = %book.id, "book created");
        Ok(BookRepr::from(&book))
    }

    /// Books matching the query parameters, oldest first
    pub fn list(&self, params: &[(String, String)]) -> RestResult<Vec<BookRepr>> {
        let filter = self.filters.parse(params).map_err(reject)?;
        filter
            .unresolved_references(self.store.as_ref())?
            .into_result(())
            .map_err(reject)?;

        let books = self.store.list_books(&|book| filter.matches(book))?;
        Ok(BookRepr::many(&books))
    }

    pub fn retrieve(&self, id: &str) -> RestResult<BookRepr> {
        let book = self.load(id)?;
        Ok(BookRepr::from(&book))
    }

    /// Partial update: only the supplied fields change
    pub fn update(&self, id: &str, payload: &Value) -> RestResult<BookRepr> {
        let existing = self.load(id)?;

        let changes = BookSerializer::new(self.store.as_ref())
            .validate_update(payload, &existing)
            .map_err(reject)?;

        let book = self
            .store
            .update_book(existing.id, &|book| changes.apply(book))
            .map_err(reject)?;
        info!(book_id = %book.id, "book updated");
        Ok(BookRepr::from(&book))
    }

    /// Deletes a book and its stock record
    pub fn delete(&self, id: &str) -> RestResult<()> {
        let id = parse_id(id)?;
        self.store.delete_book(id)?;
        info!(book_id = %id, "book deleted");
        Ok(())
    }

    fn load(&self, id: &str) -> RestResult<Book> {
        let id = parse_id(id)?;
        self.store.get_book(id)?.ok_or(RestError::NotFound)
    }
}

/// Malformed ids cannot name a stored book
fn parse_id(raw: &str) -> RestResult<BookId> {
    raw.parse().map_err(|_| RestError::NotFound)
}

fn reject(err: impl Into<RestError>) -> RestError {
    let err = err.into();
    if let RestError::Validation(errors) = &err {
        debug!(%errors, "request rejected");
    }
    err
}

//! In-memory entity store
//!
//! All tables sit behind one `RwLock`, so every write is serialized and sees
//! a consistent view of every table.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::catalog::{Author, AuthorId, Book, BookId, BookStock, Publisher, PublisherId};

use super::errors::{StoreError, StoreResult};
use super::EntityStore;

#[derive(Debug, Default)]
struct Tables {
    publishers: HashMap<PublisherId, Publisher>,
    authors: HashMap<AuthorId, Author>,
    books: HashMap<BookId, Book>,
    /// title -> book, mirrors `books`
    titles: HashMap<String, BookId>,
    stock: HashMap<BookId, BookStock>,
}

impl Tables {
    fn check_references(&self, book: &Book) -> StoreResult<()> {
        if let Some(publisher) = book.publisher {
            if !self.publishers.contains_key(&publisher) {
                return Err(StoreError::MissingReference {
                    field: "publisher",
                    entity: "publisher",
                    id: publisher.to_string(),
                });
            }
        }
        if let Some(author) = book.authors.iter().find(|a| !self.authors.contains_key(*a)) {
            return Err(StoreError::MissingReference {
                field: "authors",
                entity: "author",
                id: author.to_string(),
            });
        }
        Ok(())
    }

    fn check_title(&self, title: &str, except: Option<BookId>) -> StoreResult<()> {
        match self.titles.get(title) {
            Some(owner) if Some(*owner) != except => Err(StoreError::UniqueViolation {
                entity: "book",
                field: "title",
            }),
            _ => Ok(()),
        }
    }
}

/// Entity store holding every record in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

impl EntityStore for InMemoryStore {
    fn insert_publisher(&self, publisher: Publisher) -> StoreResult<Publisher> {
        let mut tables = self.write()?;
        tables.publishers.insert(publisher.id, publisher.clone());
        Ok(publisher)
    }

    fn get_publisher(&self, id: PublisherId) -> StoreResult<Option<Publisher>> {
        Ok(self.read()?.publishers.get(&id).cloned())
    }

    fn delete_publisher(&self, id: PublisherId) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables
            .publishers
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("publisher", id))?;

        for book in tables.books.values_mut() {
            if book.publisher == Some(id) {
                book.publisher = None;
            }
        }
        Ok(())
    }

    fn insert_author(&self, author: Author) -> StoreResult<Author> {
        let mut tables = self.write()?;
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    fn get_author(&self, id: AuthorId) -> StoreResult<Option<Author>> {
        Ok(self.read()?.authors.get(&id).cloned())
    }

    fn delete_author(&self, id: AuthorId) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables
            .authors
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("author", id))?;

        for book in tables.books.values_mut() {
            book.authors.remove(&id);
        }
        Ok(())
    }

    fn insert_book(&self, book: Book) -> StoreResult<Book> {
        let mut tables = self.write()?;
        tables.check_title(&book.title, None)?;
        tables.check_references(&book)?;

        tables.titles.insert(book.title.clone(), book.id);
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    fn get_book(&self, id: BookId) -> StoreResult<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    fn list_books(&self, predicate: &dyn Fn(&Book) -> bool) -> StoreResult<Vec<Book>> {
        let tables = self.read()?;
        let mut books: Vec<Book> = tables
            .books
            .values()
            .filter(|b| predicate(b))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    fn update_book(&self, id: BookId, change: &dyn Fn(&mut Book)) -> StoreResult<Book> {
        let mut tables = self.write()?;
        let mut book = tables
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("book", id))?;
        let previous_title = book.title.clone();
        change(&mut book);
        book.id = id;

        tables.check_title(&book.title, Some(id))?;
        tables.check_references(&book)?;

        tables.titles.remove(&previous_title);
        tables.titles.insert(book.title.clone(), id);
        tables.books.insert(id, book.clone());
        Ok(book)
    }

    fn delete_book(&self, id: BookId) -> StoreResult<()> {
        let mut tables = self.write()?;
        let book = tables
            .books
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("book", id))?;
        tables.titles.remove(&book.title);
        tables.stock.remove(&id);
        Ok(())
    }

    fn title_taken(&self, title: &str, except: Option<BookId>) -> StoreResult<bool> {
        Ok(self.read()?.check_title(title, except).is_err())
    }

    fn set_stock(&self, book: BookId, quantity: i32) -> StoreResult<BookStock> {
        let mut tables = self.write()?;
        if !tables.books.contains_key(&book) {
            return Err(StoreError::not_found("book", book));
        }
        let stock = tables
            .stock
            .entry(book)
            .or_insert_with(|| BookStock::empty(book));
        stock.quantity = quantity;
        Ok(*stock)
    }

    fn get_stock(&self, book: BookId) -> StoreResult<Option<BookStock>> {
        Ok(self.read()?.stock.get(&book).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get_book() {
        let store = InMemoryStore::new();
        let book = store.insert_book(Book::new("Dune", Some(900))).unwrap();

        assert_eq!(store.get_book(book.id).unwrap(), Some(book));
    }

    #[test]
    fn test_duplicate_title_rejected() {
        let store = InMemoryStore::new();
        store.insert_book(Book::new("Dune", None)).unwrap();

        let err = store.insert_book(Book::new("Dune", Some(1))).unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueViolation {
                entity: "book",
                field: "title"
            }
        );
    }

    #[test]
    fn test_update_keeps_own_title() {
        let store = InMemoryStore::new();
        let book = store.insert_book(Book::new("Dune", None)).unwrap();

        let updated = store
            .update_book(book.id, &|b| b.price = Some(100))
            .unwrap();
        assert_eq!(updated.title, "Dune");
        assert_eq!(updated.price, Some(100));
    }

    #[test]
    fn test_rename_frees_old_title() {
        let store = InMemoryStore::new();
        let book = store.insert_book(Book::new("Dune", None)).unwrap();
        store
            .update_book(book.id, &|b| b.title = "Dune Messiah".into())
            .unwrap();

        assert!(!store.title_taken("Dune", None).unwrap());
        assert!(store.title_taken("Dune Messiah", None).unwrap());
        assert!(store.insert_book(Book::new("Dune", None)).is_ok());
    }

    #[test]
    fn test_update_into_taken_title_rejected() {
        let store = InMemoryStore::new();
        store.insert_book(Book::new("Dune", None)).unwrap();
        let other = store.insert_book(Book::new("Emma", None)).unwrap();

        assert!(matches!(
            store.update_book(other.id, &|b| b.title = "Dune".into()),
            Err(StoreError::UniqueViolation { .. })
        ));
        assert_eq!(store.get_book(other.id).unwrap().unwrap().title, "Emma");
    }

    #[test]
    fn test_update_missing_book() {
        let store = InMemoryStore::new();
        let err = store.update_book(BookId::new(), &|_| {}).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_dangling_publisher_rejected() {
        let store = InMemoryStore::new();
        let book = Book::new("Dune", None).with_publisher(PublisherId::new());

        assert!(matches!(
            store.insert_book(book),
            Err(StoreError::MissingReference { field: "publisher", .. })
        ));
    }

    #[test]
    fn test_list_is_ordered_by_creation() {
        let store = InMemoryStore::new();
        let first = store.insert_book(Book::new("A", None)).unwrap();
        let second = store.insert_book(Book::new("B", None)).unwrap();

        let ids: Vec<_> = store.list_books(&|_| true).unwrap().into_iter().map(|b| b.id).collect();
        let mut expected = vec![first.clone(), second.clone()];
        expected.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        assert_eq!(ids, expected.into_iter().map(|b| b.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_list_applies_predicate() {
        let store = InMemoryStore::new();
        store.insert_book(Book::new("A", Some(1))).unwrap();
        store.insert_book(Book::new("B", Some(2))).unwrap();

        let cheap = store.list_books(&|b| b.price == Some(1)).unwrap();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].title, "A");
    }

    #[test]
    fn test_set_stock_replaces_quantity() {
        let store = InMemoryStore::new();
        let book = store.insert_book(Book::new("Dune", None)).unwrap();

        assert_eq!(store.set_stock(book.id, 3).unwrap().quantity, 3);
        assert_eq!(store.set_stock(book.id, 0).unwrap().quantity, 0);
        assert_eq!(
            store.get_stock(book.id).unwrap(),
            Some(BookStock::empty(book.id))
        );
    }

    #[test]
    fn test_stock_requires_book() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.set_stock(BookId::new(), 3),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_book_cascades_stock() {
        let store = InMemoryStore::new();
        let book = store.insert_book(Book::new("Dune", None)).unwrap();
        store.set_stock(book.id, 5).unwrap();

        store.delete_book(book.id).unwrap();

        assert_eq!(store.get_book(book.id).unwrap(), None);
        assert_eq!(store.get_stock(book.id).unwrap(), None);
        assert!(!store.title_taken("Dune", None).unwrap());
    }

    #[test]
    fn test_delete_missing_book() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.delete_book(BookId::new()),
            Err(StoreError::NotFound { .. })
        ));
    }
}

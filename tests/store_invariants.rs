//! Store Invariant Tests
//!
//! Referential and uniqueness rules of the entity store:
//! - Deleting a publisher clears it from its books
//! - Deleting an author unlinks it from its books
//! - Deleting a book removes its stock record
//! - Updates merge onto the book as stored at write time
//! - Concurrent creates with one title yield exactly one book

use std::sync::{Arc, Barrier};
use std::thread;

use serde_json::json;

use bookstore::catalog::{Author, Book, Publisher};
use bookstore::rest_api::{BookHandler, RestError};
use bookstore::serializer::BookSerializer;
use bookstore::store::{EntityStore, InMemoryStore, StoreError};

// =============================================================================
// Referential Rules
// =============================================================================

#[test]
fn test_publisher_delete_sets_null() {
    let store = InMemoryStore::new();
    let penguin = store.insert_publisher(Publisher::new("Penguin").unwrap()).unwrap();
    let vintage = store.insert_publisher(Publisher::new("Vintage").unwrap()).unwrap();
    let emma = store
        .insert_book(Book::new("Emma", None).with_publisher(penguin.id))
        .unwrap();
    let dune = store
        .insert_book(Book::new("Dune", None).with_publisher(vintage.id))
        .unwrap();

    store.delete_publisher(penguin.id).unwrap();

    assert_eq!(store.get_book(emma.id).unwrap().unwrap().publisher, None);
    assert_eq!(
        store.get_book(dune.id).unwrap().unwrap().publisher,
        Some(vintage.id)
    );
    assert!(!store.publisher_exists(penguin.id).unwrap());
}

#[test]
fn test_author_delete_unlinks() {
    let store = InMemoryStore::new();
    let austen = store.insert_author(Author::new("Austen").unwrap()).unwrap();
    let other = store.insert_author(Author::new("Editor").unwrap()).unwrap();
    let emma = store
        .insert_book(
            Book::new("Emma", None)
                .with_author(austen.id)
                .with_author(other.id),
        )
        .unwrap();

    store.delete_author(austen.id).unwrap();

    let emma = store.get_book(emma.id).unwrap().unwrap();
    assert_eq!(emma.authors.len(), 1);
    assert!(emma.authors.contains(&other.id));
}

#[test]
fn test_book_delete_cascades_stock_only() {
    let store = InMemoryStore::new();
    let emma = store.insert_book(Book::new("Emma", None)).unwrap();
    let dune = store.insert_book(Book::new("Dune", None)).unwrap();
    store.set_stock(emma.id, 3).unwrap();
    store.set_stock(dune.id, 5).unwrap();

    store.delete_book(emma.id).unwrap();

    assert_eq!(store.get_stock(emma.id).unwrap(), None);
    assert_eq!(store.get_stock(dune.id).unwrap().unwrap().quantity, 5);
}

#[test]
fn test_dangling_author_rejected() {
    let store = InMemoryStore::new();
    let ghost = Author::new("Ghost").unwrap();

    let err = store
        .insert_book(Book::new("Emma", None).with_author(ghost.id))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::MissingReference {
            field: "authors",
            ..
        }
    ));
    assert!(!store.title_taken("Emma", None).unwrap());
}

/// A price change validated before a publisher delete keeps the cleared publisher.
#[test]
fn test_update_after_publisher_delete() {
    let store = InMemoryStore::new();
    let penguin = store.insert_publisher(Publisher::new("Penguin").unwrap()).unwrap();
    let emma = store
        .insert_book(Book::new("Emma", Some(10)).with_publisher(penguin.id))
        .unwrap();

    let changes = BookSerializer::new(&store)
        .validate_update(&json!({"price": 12}), &emma)
        .unwrap();
    store.delete_publisher(penguin.id).unwrap();

    let updated = store
        .update_book(emma.id, &|book| changes.apply(book))
        .unwrap();
    assert_eq!(updated.price, Some(12));
    assert_eq!(updated.publisher, None);
}

// =============================================================================
// Uniqueness Under Concurrency
// =============================================================================

/// Racing creates with the same title: one succeeds, the rest fail on title.
#[test]
fn test_concurrent_duplicate_creates() {
    let handler = BookHandler::new(Arc::new(InMemoryStore::new()));
    let racers = 8;
    let barrier = Arc::new(Barrier::new(racers));

    let results: Vec<_> = (0..racers)
        .map(|_| {
            let handler = handler.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                handler.create(&json!({"title": "Moby Dick"}))
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);

    for result in results.iter().filter(|r| r.is_err()) {
        match result {
            Err(RestError::Validation(errors)) => {
                assert_eq!(errors.get("title").unwrap(), &["already exists".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    assert_eq!(handler.store().list_books(&|_| true).unwrap().len(), 1);
}

/// Renaming frees the old title for reuse.
#[test]
fn test_title_index_follows_updates() {
    let handler = BookHandler::new(Arc::new(InMemoryStore::new()));
    let created = handler.create(&json!({"title": "Draft"})).unwrap();

    handler
        .update(&created.id.to_string(), &json!({"title": "Final"}))
        .unwrap();

    assert!(handler.create(&json!({"title": "Draft"})).is_ok());
    assert!(handler.create(&json!({"title": "Final"})).is_err());
}

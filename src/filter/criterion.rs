//! Typed filter criteria over books

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::catalog::{AuthorId, Book, BookId, PublisherId};
use crate::schema::{messages, ValidationErrors};
use crate::store::{EntityStore, StoreResult};

/// One exact-match condition on a book field
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Id(BookId),
    Title(String),
    /// Numeric filters accept decimals; only equal integers match
    Price(f64),
    Publisher(PublisherId),
    /// Matches books linked to any of the authors
    Authors(BTreeSet<AuthorId>),
    CreatedAt(DateTime<Utc>),
}

impl Criterion {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Criterion::Id(id) => book.id == *id,
            Criterion::Title(title) => book.title == *title,
            Criterion::Price(price) => book.price.map_or(false, |p| f64::from(p) == *price),
            Criterion::Publisher(id) => book.publisher == Some(*id),
            Criterion::Authors(ids) => !book.authors.is_disjoint(ids),
            Criterion::CreatedAt(at) => book.created_at == *at,
        }
    }
}

/// Conjunction of criteria, at most one per field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    criteria: Vec<Criterion>,
}

impl BookFilter {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True when every criterion matches; an empty filter matches everything
    pub fn matches(&self, book: &Book) -> bool {
        self.criteria.iter().all(|c| c.matches(book))
    }

    /// Checks that referenced publishers and authors exist.
    ///
    /// Returns the choice errors found, empty when every reference resolves.
    pub fn unresolved_references<S: EntityStore + ?Sized>(
        &self,
        store: &S,
    ) -> StoreResult<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for criterion in &self.criteria {
            match criterion {
                Criterion::Publisher(id) => {
                    if !store.publisher_exists(*id)? {
                        errors.add("publisher", messages::INVALID_CHOICE);
                    }
                }
                Criterion::Authors(ids) => {
                    for id in ids {
                        if !store.author_exists(*id)? {
                            errors.add("authors", messages::INVALID_CHOICE);
                            break;
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Author, Publisher};
    use crate::store::InMemoryStore;

    #[test]
    fn test_title_is_exact() {
        let book = Book::new("Moby Dick", None);
        assert!(Criterion::Title("Moby Dick".into()).matches(&book));
        assert!(!Criterion::Title("moby dick".into()).matches(&book));
        assert!(!Criterion::Title("Moby".into()).matches(&book));
    }

    #[test]
    fn test_price_never_matches_null() {
        let book = Book::new("Emma", None);
        assert!(!Criterion::Price(0.0).matches(&book));
    }

    #[test]
    fn test_price_decimal_matches_equal_integer() {
        let book = Book::new("Emma", Some(12));
        assert!(Criterion::Price(12.0).matches(&book));
        assert!(!Criterion::Price(12.5).matches(&book));
    }

    #[test]
    fn test_authors_match_any() {
        let (a, b, c) = (AuthorId::new(), AuthorId::new(), AuthorId::new());
        let book = Book::new("Emma", None).with_author(a);

        assert!(Criterion::Authors([a, b].into_iter().collect()).matches(&book));
        assert!(!Criterion::Authors([b, c].into_iter().collect()).matches(&book));
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(BookFilter::default().matches(&Book::new("Emma", None)));
    }

    #[test]
    fn test_criteria_are_anded() {
        let book = Book::new("Emma", Some(5));
        let filter = BookFilter::new(vec![
            Criterion::Title("Emma".into()),
            Criterion::Price(6.0),
        ]);
        assert!(!filter.matches(&book));
    }

    #[test]
    fn test_unresolved_references() {
        let store = InMemoryStore::new();
        let publisher = store.insert_publisher(Publisher::new("Penguin").unwrap()).unwrap();
        let author = store.insert_author(Author::new("Austen").unwrap()).unwrap();

        let known = BookFilter::new(vec![
            Criterion::Publisher(publisher.id),
            Criterion::Authors([author.id].into_iter().collect()),
        ]);
        assert!(known.unresolved_references(&store).unwrap().is_empty());

        let unknown = BookFilter::new(vec![
            Criterion::Publisher(PublisherId::new()),
            Criterion::Authors([author.id, AuthorId::new()].into_iter().collect()),
        ]);
        let errors = unknown.unresolved_references(&store).unwrap();
        assert_eq!(
            errors.get("publisher").unwrap(),
            &[messages::INVALID_CHOICE.to_string()]
        );
        assert_eq!(errors.get("authors").unwrap().len(), 1);
    }
}

//! bookstore - A small bookstore catalog served over a CRUD HTTP API
//!
//! Publishers, authors and books with a stock count per book. Books are
//! created, listed with field filters, retrieved, partially updated and
//! deleted through `/books`.

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod filter;
pub mod observability;
pub mod rest_api;
pub mod schema;
pub mod serializer;
pub mod store;

//! # REST API Module
//!
//! HTTP endpoints for CRUD operations on books, with the access policy
//! enforced in front of every book route.

pub mod errors;
pub mod handler;
pub mod server;

pub use errors::{RestError, RestResult};
pub use handler::BookHandler;
pub use server::{router, AppState, BookstoreServer};

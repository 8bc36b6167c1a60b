//! # REST API HTTP Server
//!
//! Axum router binding the book handlers to HTTP.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET, POST | /books | list, create |
//! | GET, PUT, PATCH, DELETE | /books/{id} | retrieve, update, update, delete |
//! | GET | /health | liveness |

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::auth::{Authenticator, JwtManager, RequestContext};
use crate::config::AppConfig;
use crate::serializer::BookRepr;
use crate::store::EntityStore;

use super::errors::{RestError, RestResult};
use super::handler::BookHandler;

/// Shared router state
#[derive(Clone)]
pub struct AppState {
    pub books: BookHandler<dyn EntityStore>,
    pub auth: Authenticator,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>, auth: Authenticator) -> Self {
        Self {
            books: BookHandler::new(store),
            auth,
        }
    }

    /// State wired from configuration
    pub fn from_config(config: &AppConfig, store: Arc<dyn EntityStore>) -> Self {
        let jwt = JwtManager::new(config.auth.jwt_config());
        Self::new(store, Authenticator::new(config.auth.policy, jwt))
    }
}

/// Build the Axum router
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let books = Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(retrieve_book)
                .put(update_book)
                .patch(update_book)
                .delete(delete_book),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authorize));

    Router::new()
        .route("/health", get(health))
        .merge(books)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Applies the access policy before any book handler runs and hands the
/// caller's `RequestContext` to it
async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, RestError> {
    let context = {
        let authorization = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        state.auth.authenticate(request.method(), authorization)?
    };

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Parses a JSON body; an empty body reads as `{}`
fn parse_body(body: &Bytes) -> RestResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|e| RestError::MalformedJson(e.to_string()))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> RestResult<Json<Vec<BookRepr>>> {
    let books = state.books.list(&params)?;
    Ok(Json(books))
}

async fn create_book(
    State(state): State<AppState>,
    Extension(caller): Extension<RequestContext>,
    body: Bytes,
) -> RestResult<(StatusCode, Json<BookRepr>)> {
    let payload = parse_body(&body)?;
    let book = info_span!("write", caller = caller.caller())
        .in_scope(|| state.books.create(&payload))?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn retrieve_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RestResult<Json<BookRepr>> {
    let book = state.books.retrieve(&id)?;
    Ok(Json(book))
}

/// PUT and PATCH both apply a partial update
async fn update_book(
    State(state): State<AppState>,
    Extension(caller): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> RestResult<Json<BookRepr>> {
    let payload = parse_body(&body)?;
    let book = info_span!("write", caller = caller.caller())
        .in_scope(|| state.books.update(&id, &payload))?;
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<AppState>,
    Extension(caller): Extension<RequestContext>,
    Path(id): Path<String>,
) -> RestResult<StatusCode> {
    info_span!("write", caller = caller.caller()).in_scope(|| state.books.delete(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// HTTP server for the catalog
pub struct BookstoreServer {
    addr: String,
    router: Router,
}

impl BookstoreServer {
    pub fn new(config: &AppConfig, store: Arc<dyn EntityStore>) -> Self {
        let state = AppState::from_config(config, store);
        Self {
            addr: config.server.socket_addr(),
            router: router(state, &config.server.cors_origins),
        }
    }

    pub fn socket_addr(&self) -> &str {
        &self.addr
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serves until `shutdown` resolves, then drains open connections
    pub async fn start_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.addr.parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.addr, e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

//! HTTP API application wiring (Axum router + store wiring).

pub mod dto;
pub mod errors;
pub mod routes;

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};
use tower::ServiceBuilder;

use storefront_infra::ProductStore;

/// Build the application router over the given store.
///
/// The store is injected rather than constructed here so tests can run the
/// exact production router against an in-memory backend.
pub fn build_app(store: Arc<dyn ProductStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/products", routes::products::router())
        .layer(axum::Extension(store))
        .layer(ServiceBuilder::new())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

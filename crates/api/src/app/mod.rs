//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: persistence + service wiring
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: translation of domain failures into structured error payloads

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_logging))
                .layer(Extension(services)),
        )
}

/// Router backed by a fresh in-memory store.
pub fn in_memory_app() -> Router {
    build_app(Arc::new(AppServices::in_memory()))
}

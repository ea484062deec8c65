use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::request_id::with_request_tracing;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/hello", get(handlers::hello))
        .route("/health", get(handlers::health));

    with_request_tracing(router).layer(cors).with_state(state)
}

use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use tower_http::request_id::RequestId;

use crate::{error::AppResult, middleware::request_id::request_id_str};

use super::AppState;

/// Greeting endpoint
pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello, World!" }))
}

/// Health check endpoint; fails when the database does not answer
pub async fn health(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<Value>> {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(request_id = request_id_str(&request_id), error = %e, "Health check failed");
        return Err(e);
    }

    Ok(Json(json!({ "status": "ok" })))
}

//! # REST API Interface Layer
//!
//! HTTP endpoints under `/api`. Handlers translate DTOs into domain
//! commands, call one service, and map the result back; every failure goes
//! through [`ApiError`] so clients always see `{error, message}`.

pub mod auth_apis;
pub mod child_apis;
pub mod error;
pub mod extract;
pub mod mappers;
pub mod reward_apis;
pub mod sync_apis;
pub mod task_apis;
pub mod user_apis;
pub mod wish_apis;

use axum::{response::Json, routing::get, Router};
use shared::HealthResponse;

pub use error::ApiError;

use crate::backend::AppState;

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_apis::router())
        .nest("/children", child_apis::router())
        .nest("/tasks", task_apis::router())
        .nest("/wishes", wish_apis::router())
        .nest("/rewards", reward_apis::router())
        .nest("/sync", sync_apis::router())
        .nest("/users", user_apis::router())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

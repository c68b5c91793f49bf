//! Translation of domain failures into HTTP responses.
//!
//! Every non-2xx response carries `{"error": <code>, "message": <text>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::ErrorResponse;
use thiserror::Error;
use tracing::error;

use crate::backend::domain::DomainError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Please login first")]
    MissingToken,

    #[error("{0}")]
    BadRequest(String),

    #[error("Route not found")]
    RouteNotFound,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Domain(err) => match err {
                DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error", err.to_string()),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
                DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden", err.to_string()),
                DomainError::InvalidTransition { .. } => {
                    (StatusCode::CONFLICT, "invalid_transition", err.to_string())
                }
                DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict", err.to_string()),
                DomainError::InsufficientPoints { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_points", err.to_string())
                }
                DomainError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
                }
                DomainError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", err.to_string()),
                DomainError::Storage(source) => {
                    error!("Internal error: {:#}", source);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "Internal server error".to_string(),
                    )
                }
            },
            ApiError::MissingToken => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ErrorResponse {
            error: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(DomainError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(DomainError::not_found("Task")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::forbidden("x")), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(DomainError::invalid_transition("approved", "approved")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::InsufficientPoints { available: 1, required: 2 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(DomainError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::MissingToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(DomainError::Storage(anyhow!("disk full"))), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let (_, code, message) = ApiError::from(DomainError::Storage(anyhow!("secret path"))).parts();
        assert_eq!(code, "internal_error");
        assert!(!message.contains("secret"));
    }
}

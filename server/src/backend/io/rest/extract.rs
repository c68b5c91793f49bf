//! Request extractors: the caller's [`Session`] and JSON bodies whose
//! rejections use the API error format.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::{header, request::Parts};
use serde::Deserialize;
use tracing::warn;

use crate::backend::domain::models::session::Session;
use crate::backend::io::rest::error::ApiError;
use crate::backend::AppState;

/// `Json` with [`ApiError`] as rejection
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Browsers cannot set headers on an `EventSource`, so the token may also
/// arrive as `?token=`
#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.token)
    })
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(session.clone());
        }

        let token = bearer_token(parts)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingToken)?;

        let session = state.auth_service.authenticate(&token).map_err(|e| {
            warn!("Rejected token for {} {}", parts.method, parts.uri.path());
            ApiError::from(e)
        })?;

        parts.extensions.insert(session.clone());
        Ok(session)
    }
}

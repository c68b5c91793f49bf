//! # REST API for Authentication
//!
//! Parent registration, login for either role, and the current profile.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use shared::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use tracing::info;

use crate::backend::domain::commands::auth::{LoginCommand, RegisterCommand};
use crate::backend::domain::models::session::Session;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::ApiJson;
use crate::backend::io::rest::mappers::UserMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// Register a parent account
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    info!("POST /api/auth/register - {} ({})", request.email, request.role);

    let command = RegisterCommand {
        name: request.name,
        email: request.email,
        password: request.password,
        role: request.role,
    };
    let result = state.auth_service.register(command).await?;
    Ok((StatusCode::CREATED, Json(UserMapper::to_auth_response(result))))
}

/// Log in as a parent or a child
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    info!("POST /api/auth/login - {} ({})", request.email, request.role);

    let command = LoginCommand {
        email: request.email,
        password: request.password,
        role: request.role,
    };
    let result = state.auth_service.login(command).await?;
    Ok(Json(UserMapper::to_auth_response(result)))
}

pub async fn me(State(state): State<AppState>, session: Session) -> Result<Json<UserProfile>, ApiError> {
    info!("GET /api/auth/me - {}", session.user_id);

    let account = state.auth_service.me(&session).await?;
    Ok(Json(UserMapper::to_dto(account)))
}

//! # REST API for Family Profiles
//!
//! Lets a child show its parent's name and a parent look up a child's
//! profile. Lookups never leave the caller's family.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use shared::UserProfile;
use tracing::info;

use crate::backend::domain::models::session::Session;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::mappers::UserMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(get_user))
}

pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    info!("GET /api/users/{}", user_id);

    let account = state.auth_service.profile(&session, &user_id).await?;
    Ok(Json(UserMapper::to_dto(account)))
}

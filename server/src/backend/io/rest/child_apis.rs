//! # REST API for Child Management
//!
//! Parents create, list, edit and delete their children. A child may read
//! its own record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use shared::{Child, CreateChildRequest, MessageResponse, UpdateChildRequest};
use tracing::info;

use crate::backend::domain::models::session::Session;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::ApiJson;
use crate::backend::io::rest::mappers::ChildMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_children).post(create_child))
        .route("/:id", get(get_child).put(update_child).delete(delete_child))
}

/// List the caller's children
pub async fn list_children(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Child>>, ApiError> {
    info!("GET /api/children");

    let children = state.child_service.list(&session).await?;
    Ok(Json(children.into_iter().map(ChildMapper::to_dto).collect()))
}

/// Create a new child
pub async fn create_child(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<CreateChildRequest>,
) -> Result<(StatusCode, Json<Child>), ApiError> {
    info!("POST /api/children - {}", request.name);

    let child = state
        .child_service
        .create(&session, ChildMapper::to_create_command(request))
        .await?;
    Ok((StatusCode::CREATED, Json(ChildMapper::to_dto(child))))
}

/// Get a child by ID
pub async fn get_child(
    State(state): State<AppState>,
    session: Session,
    Path(child_id): Path<String>,
) -> Result<Json<Child>, ApiError> {
    info!("GET /api/children/{}", child_id);

    let child = state.child_service.get(&session, &child_id).await?;
    Ok(Json(ChildMapper::to_dto(child)))
}

/// Update a child's profile
pub async fn update_child(
    State(state): State<AppState>,
    session: Session,
    Path(child_id): Path<String>,
    ApiJson(request): ApiJson<UpdateChildRequest>,
) -> Result<Json<Child>, ApiError> {
    info!("PUT /api/children/{}", child_id);

    let child = state
        .child_service
        .update(&session, &child_id, ChildMapper::to_update_command(request))
        .await?;
    Ok(Json(ChildMapper::to_dto(child)))
}

/// Delete a child with its tasks and wishes
pub async fn delete_child(
    State(state): State<AppState>,
    session: Session,
    Path(child_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("DELETE /api/children/{}", child_id);

    state.child_service.delete(&session, &child_id).await?;
    Ok(Json(MessageResponse {
        message: "Child deleted".to_string(),
    }))
}

//! # REST API for Wishes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use shared::{
    CreateTaskFromWishRequest, CreateWishRequest, MessageResponse, Task, UpdateWishRequest, Wish,
};
use tracing::info;

use crate::backend::domain::commands::tasks::CreateTaskFromWishCommand;
use crate::backend::domain::models::session::Session;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::ApiJson;
use crate::backend::io::rest::mappers::{TaskMapper, WishMapper};
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_wish))
        .route("/child/:child_id", get(list_child_wishes))
        .route("/parent/:parent_id", get(list_parent_wishes))
        .route("/:id", put(update_wish).delete(delete_wish))
        .route("/:id/task", post(create_task_from_wish))
}

pub async fn create_wish(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<CreateWishRequest>,
) -> Result<(StatusCode, Json<Wish>), ApiError> {
    info!("POST /api/wishes - '{}'", request.title);

    let wish = state
        .wish_service
        .create(&session, WishMapper::to_create_command(request))
        .await?;
    Ok((StatusCode::CREATED, Json(WishMapper::to_dto(wish))))
}

pub async fn list_child_wishes(
    State(state): State<AppState>,
    session: Session,
    Path(child_id): Path<String>,
) -> Result<Json<Vec<Wish>>, ApiError> {
    info!("GET /api/wishes/child/{}", child_id);

    let wishes = state.wish_service.list_for_child(&session, &child_id).await?;
    Ok(Json(WishMapper::to_dto_list(wishes)))
}

pub async fn list_parent_wishes(
    State(state): State<AppState>,
    session: Session,
    Path(parent_id): Path<String>,
) -> Result<Json<Vec<Wish>>, ApiError> {
    info!("GET /api/wishes/parent/{}", parent_id);

    let wishes = state.wish_service.list_for_parent(&session, &parent_id).await?;
    Ok(Json(WishMapper::to_dto_list(wishes)))
}

/// Edit a wish or move it along its lifecycle
pub async fn update_wish(
    State(state): State<AppState>,
    session: Session,
    Path(wish_id): Path<String>,
    ApiJson(request): ApiJson<UpdateWishRequest>,
) -> Result<Json<Wish>, ApiError> {
    info!("PUT /api/wishes/{} - status {:?}", wish_id, request.status);

    let wish = state
        .wish_service
        .update(&session, &wish_id, WishMapper::to_update_command(request))
        .await?;
    Ok(Json(WishMapper::to_dto(wish)))
}

pub async fn delete_wish(
    State(state): State<AppState>,
    session: Session,
    Path(wish_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("DELETE /api/wishes/{}", wish_id);

    state.wish_service.delete(&session, &wish_id).await?;
    Ok(Json(MessageResponse {
        message: "Wish deleted".to_string(),
    }))
}

/// Turn a wish into a task the child can earn points with
pub async fn create_task_from_wish(
    State(state): State<AppState>,
    session: Session,
    Path(wish_id): Path<String>,
    ApiJson(request): ApiJson<CreateTaskFromWishRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    info!("POST /api/wishes/{}/task", wish_id);

    let command = CreateTaskFromWishCommand {
        wish_id,
        points_awarded: request.points_awarded,
        due_date: request.due_date,
    };
    let task = state.task_service.create_from_wish(&session, command).await?;
    Ok((StatusCode::CREATED, Json(TaskMapper::to_dto(task))))
}

//! # REST API for Tasks
//!
//! `PUT /tasks/:id` accepts field edits, a status change, or both.
//! `PUT /tasks/status/:id` is the status-only form.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use shared::{CreateTaskRequest, MessageResponse, Task, TaskStatusRequest, UpdateTaskRequest};
use tracing::info;

use crate::backend::domain::models::session::Session;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::ApiJson;
use crate::backend::io::rest::mappers::TaskMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_task))
        .route("/child/:child_id", get(list_child_tasks))
        .route("/parent/:parent_id", get(list_parent_tasks))
        .route("/status/:id", put(update_task_status))
        .route("/:id", put(update_task).delete(delete_task))
}

/// Assign a new task to a child
pub async fn create_task(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    info!("POST /api/tasks - '{}' for {}", request.title, request.child_id);

    let task = state
        .task_service
        .create(&session, TaskMapper::to_create_command(request))
        .await?;
    Ok((StatusCode::CREATED, Json(TaskMapper::to_dto(task))))
}

pub async fn list_child_tasks(
    State(state): State<AppState>,
    session: Session,
    Path(child_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    info!("GET /api/tasks/child/{}", child_id);

    let tasks = state.task_service.list_for_child(&session, &child_id).await?;
    Ok(Json(TaskMapper::to_dto_list(tasks)))
}

pub async fn list_parent_tasks(
    State(state): State<AppState>,
    session: Session,
    Path(parent_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    info!("GET /api/tasks/parent/{}", parent_id);

    let tasks = state.task_service.list_for_parent(&session, &parent_id).await?;
    Ok(Json(TaskMapper::to_dto_list(tasks)))
}

/// Move a task along its lifecycle
pub async fn update_task_status(
    State(state): State<AppState>,
    session: Session,
    Path(task_id): Path<String>,
    ApiJson(request): ApiJson<TaskStatusRequest>,
) -> Result<Json<Task>, ApiError> {
    info!("PUT /api/tasks/status/{} - {:?}", task_id, request.status);

    let task = state
        .task_service
        .transition(&session, &task_id, TaskMapper::to_status_command(request))
        .await?;
    Ok(Json(TaskMapper::to_dto(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    session: Session,
    Path(task_id): Path<String>,
    ApiJson(request): ApiJson<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    info!("PUT /api/tasks/{}", task_id);

    let task = state
        .task_service
        .update(&session, &task_id, TaskMapper::to_update_command(request))
        .await?;
    Ok(Json(TaskMapper::to_dto(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    session: Session,
    Path(task_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("DELETE /api/tasks/{}", task_id);

    state.task_service.delete(&session, &task_id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}

//! # REST API for Rewards
//!
//! `GET /rewards/:id` takes either a parent id or a child id and lists the
//! family's rewards. Redemption is `PATCH /rewards/:id` with
//! `{"status": "redeemed"}`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use shared::{
    CreateRewardRequest, MessageResponse, RedeemRewardRequest, RedeemRewardResponse, Reward,
    RewardStatus,
};
use tracing::info;

use crate::backend::domain::commands::rewards::{CreateRewardCommand, RedeemRewardCommand};
use crate::backend::domain::models::session::Session;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::ApiJson;
use crate::backend::io::rest::mappers::RewardMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_reward))
        .route("/:id", get(list_rewards).patch(redeem_reward).delete(delete_reward))
}

pub async fn create_reward(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<CreateRewardRequest>,
) -> Result<(StatusCode, Json<Reward>), ApiError> {
    info!("POST /api/rewards - '{}' for {} points", request.reward_name, request.points);

    let command = CreateRewardCommand {
        reward_name: request.reward_name,
        points: request.points,
    };
    let reward = state.reward_service.create(&session, command).await?;
    Ok((StatusCode::CREATED, Json(RewardMapper::to_dto(reward))))
}

pub async fn list_rewards(
    State(state): State<AppState>,
    session: Session,
    Path(parent_or_child_id): Path<String>,
) -> Result<Json<Vec<Reward>>, ApiError> {
    info!("GET /api/rewards/{}", parent_or_child_id);

    let rewards = state.reward_service.list(&session, &parent_or_child_id).await?;
    Ok(Json(rewards.into_iter().map(RewardMapper::to_dto).collect()))
}

pub async fn redeem_reward(
    State(state): State<AppState>,
    session: Session,
    Path(reward_id): Path<String>,
    ApiJson(request): ApiJson<RedeemRewardRequest>,
) -> Result<Json<RedeemRewardResponse>, ApiError> {
    info!("PATCH /api/rewards/{} - child {:?}", reward_id, request.child_id);

    if request.status != RewardStatus::Redeemed {
        return Err(ApiError::BadRequest(
            "Only status 'redeemed' can be set on a reward".to_string(),
        ));
    }

    let command = RedeemRewardCommand {
        reward_id,
        child_id: request.child_id,
    };
    let result = state.reward_service.redeem(&session, command).await?;
    Ok(Json(RewardMapper::to_redeem_response(result)))
}

pub async fn delete_reward(
    State(state): State<AppState>,
    session: Session,
    Path(reward_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("DELETE /api/rewards/{}", reward_id);

    state.reward_service.delete(&session, &reward_id).await?;
    Ok(Json(MessageResponse {
        message: "Reward deleted".to_string(),
    }))
}

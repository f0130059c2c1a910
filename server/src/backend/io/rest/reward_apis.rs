//! # REST API for Rewards

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use log::{error, info};
use shared::{CreateRewardRequest, RewardListResponse, UpdateRewardRequest};

use crate::backend::io::rest::auth::AuthenticatedAccount;
use crate::backend::io::rest::mappers::reward_mapper::RewardMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rewards).post(create_reward))
        .route("/:id", put(update_reward).delete(delete_reward))
}

pub async fn list_rewards(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> impl IntoResponse {
    info!("GET /api/rewards - account: {}", account.id);

    let rewards = state.reward_service.list_rewards().await;
    let response = RewardListResponse {
        rewards: rewards.into_iter().map(RewardMapper::to_dto).collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn create_reward(
    State(state): State<AppState>,
    AuthenticatedAccount(_account): AuthenticatedAccount,
    Json(request): Json<CreateRewardRequest>,
) -> impl IntoResponse {
    info!("POST /api/rewards - request: {:?}", request);

    match state
        .reward_service
        .add_reward(RewardMapper::to_new_reward(request))
        .await
    {
        Ok(reward) => (StatusCode::CREATED, Json(RewardMapper::to_dto(reward))).into_response(),
        Err(e) => {
            error!("Failed to create reward: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_reward(
    State(state): State<AppState>,
    AuthenticatedAccount(_account): AuthenticatedAccount,
    Path(reward_id): Path<String>,
    Json(request): Json<UpdateRewardRequest>,
) -> impl IntoResponse {
    info!("PUT /api/rewards/{} - request: {:?}", reward_id, request);

    match state
        .reward_service
        .update_reward(&reward_id, RewardMapper::to_reward_update(request))
        .await
    {
        Ok(reward) => (StatusCode::OK, Json(RewardMapper::to_dto(reward))).into_response(),
        Err(e) => {
            error!("Failed to update reward {}: {}", reward_id, e);
            e.into_response()
        }
    }
}

pub async fn delete_reward(
    State(state): State<AppState>,
    AuthenticatedAccount(_account): AuthenticatedAccount,
    Path(reward_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/rewards/{}", reward_id);

    match state.reward_service.delete_reward(&reward_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete reward {}: {}", reward_id, e);
            e.into_response()
        }
    }
}

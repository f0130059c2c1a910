//! # REST API for Child Management
//!
//! Children of the signed-in account, the current-child selection and
//! growth progress.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use log::{error, info};
use shared::{ChildListResponse, ChildResponse, CreateChildRequest, UpdateChildRequest};

use crate::backend::domain::growth;
use crate::backend::domain::models::child::Child;
use crate::backend::io::rest::auth::AuthenticatedAccount;
use crate::backend::io::rest::mappers::child_mapper::ChildMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_children).post(create_child))
        .route("/:id", put(update_child).delete(delete_child))
        .route("/:id/select", post(select_child))
        .route("/:id/growth", get(get_growth))
        .route("/:id/reset-monthly", post(reset_monthly_points))
}

fn child_response(child: Child, message: &str) -> ChildResponse {
    ChildResponse {
        child: ChildMapper::to_dto(child),
        success_message: message.to_string(),
    }
}

pub async fn list_children(AuthenticatedAccount(account): AuthenticatedAccount) -> impl IntoResponse {
    info!("GET /api/children - account: {}", account.id);

    let response = ChildListResponse {
        current_child_id: account.current_child().map(|c| c.id.clone()),
        children: account.children.into_iter().map(ChildMapper::to_dto).collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn create_child(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/children - request: {:?}", request);

    match state
        .account_service
        .add_child(&account.id, ChildMapper::to_new_child(request))
        .await
    {
        Ok(child) => (
            StatusCode::CREATED,
            Json(child_response(child, "Child created successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create child: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_child(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{} - request: {:?}", child_id, request);

    match state
        .account_service
        .update_child(&account.id, &child_id, ChildMapper::to_child_update(request))
        .await
    {
        Ok(child) => (
            StatusCode::OK,
            Json(child_response(child, "Child updated successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to update child {}: {}", child_id, e);
            e.into_response()
        }
    }
}

pub async fn delete_child(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}", child_id);

    match state.account_service.delete_child(&account.id, &child_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete child {}: {}", child_id, e);
            e.into_response()
        }
    }
}

pub async fn select_child(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/children/{}/select", child_id);

    match state.account_service.set_current_child(&account.id, &child_id).await {
        Ok(child) => (
            StatusCode::OK,
            Json(child_response(child, "Current child selected")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to select child {}: {}", child_id, e);
            e.into_response()
        }
    }
}

pub async fn get_growth(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/growth", child_id);

    match state.account_service.resolve_child(&account.id, Some(&child_id)).await {
        Ok(child) => (StatusCode::OK, Json(growth::progress_for(&child))).into_response(),
        Err(e) => {
            error!("Failed to get growth of child {}: {}", child_id, e);
            e.into_response()
        }
    }
}

pub async fn reset_monthly_points(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/children/{}/reset-monthly", child_id);

    match state.account_service.reset_monthly_points(&account.id, &child_id).await {
        Ok(child) => (
            StatusCode::OK,
            Json(child_response(child, "Monthly points reset")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to reset monthly points of child {}: {}", child_id, e);
            e.into_response()
        }
    }
}

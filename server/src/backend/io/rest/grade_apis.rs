//! # REST API for Exam Grades

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use log::{error, info};
use shared::{CreateGradeRequest, GradeListRequest, GradeListResponse, GradeResponse};

use crate::backend::domain::models::grade::Grade;
use crate::backend::domain::DomainResult;
use crate::backend::io::rest::auth::AuthenticatedAccount;
use crate::backend::io::rest::mappers::grade_mapper::GradeMapper;
use crate::backend::io::rest::resolve_child;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grades).post(create_grade))
        .route("/:id", delete(delete_grade))
}

pub async fn list_grades(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(request): Query<GradeListRequest>,
) -> impl IntoResponse {
    info!("GET /api/grades - request: {:?}", request);

    let result: DomainResult<Vec<Grade>> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let filter = GradeMapper::to_filter(&request)?;
        Ok(state.grade_service.list_grades(&child.id, &filter).await)
    }
    .await;

    match result {
        Ok(grades) => {
            let response = GradeListResponse {
                grades: grades.into_iter().map(GradeMapper::to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list grades: {}", e);
            e.into_response()
        }
    }
}

pub async fn create_grade(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(request): Json<CreateGradeRequest>,
) -> impl IntoResponse {
    info!("POST /api/grades - exam: {}", request.exam_name);

    let result: DomainResult<Grade> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let command = GradeMapper::to_new_grade(&child.id, request)?;
        state.grade_service.add_grade(command).await
    }
    .await;

    match result {
        Ok(grade) => {
            let response = GradeResponse {
                grade: GradeMapper::to_dto(grade),
                success_message: "Grade recorded successfully".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to record grade: {}", e);
            e.into_response()
        }
    }
}

/// Only grades of the account's own children can be deleted
pub async fn delete_grade(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(grade_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/grades/{}", grade_id);

    let owned = state
        .grade_service
        .get_grade(&grade_id)
        .await
        .map_or(false, |grade| account.find_child(&grade.child_id).is_some());
    if !owned {
        info!("Grade {} not found for account {}, nothing to delete", grade_id, account.id);
        return StatusCode::NO_CONTENT.into_response();
    }

    match state.grade_service.delete_grade(&grade_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete grade {}: {}", grade_id, e);
            e.into_response()
        }
    }
}

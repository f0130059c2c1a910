//! # REST API for Tasks
//!
//! Daily task lists, planning, state transitions and check-in. Every
//! endpoint that names a task id first checks that the task belongs to the
//! signed-in account.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use chrono::Local;
use log::{error, info};
use shared::{
    CompleteTaskRequest, CompleteTaskResponse, CreateTaskRequest, ElapsedTimeResponse, OverdueTasksRequest,
    PlanTasksRequest, TaskCountsRequest, TaskCountsResponse, TaskListRequest, TaskListResponse, TaskResponse,
    UpdateTaskRequest,
};

use crate::backend::domain::commands::tasks::CheckInResult;
use crate::backend::domain::models::account::Account;
use crate::backend::domain::models::task::Task;
use crate::backend::domain::{DomainError, DomainResult};
use crate::backend::io::rest::auth::AuthenticatedAccount;
use crate::backend::io::rest::mappers::child_mapper::ChildMapper;
use crate::backend::io::rest::mappers::task_mapper::TaskMapper;
use crate::backend::io::rest::mappers::{format_date, parse_date};
use crate::backend::io::rest::resolve_child;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/plan", post(plan_tasks))
        .route("/overdue", get(get_overdue_tasks))
        .route("/counts", get(get_task_counts))
        .route("/:id", put(update_task).delete(delete_task))
        .route("/:id/start", post(start_task))
        .route("/:id/complete", post(complete_task))
        .route("/:id/cancel", post(cancel_task))
        .route("/:id/elapsed", get(get_elapsed_time))
}

fn task_response(task: Task, message: &str) -> TaskResponse {
    TaskResponse {
        task: TaskMapper::to_dto(task),
        success_message: message.to_string(),
    }
}

async fn ensure_owned(state: &AppState, account: &Account, task_id: &str) -> DomainResult<()> {
    match state.task_service.get_task(&account.id, task_id).await {
        Some(_) => Ok(()),
        None => Err(DomainError::not_found("Task")),
    }
}

/// Tasks of one day, optionally restricted to one status
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(request): Query<TaskListRequest>,
) -> impl IntoResponse {
    info!("GET /api/tasks - request: {:?}", request);

    let result: DomainResult<Vec<Task>> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let date = parse_date(&request.date, "date")?;
        Ok(match request.status {
            Some(status) => {
                state
                    .task_service
                    .get_tasks_by_status(&account.id, &child.id, date, status)
                    .await
            }
            None => state.task_service.get_tasks_by_date(&account.id, &child.id, date).await,
        })
    }
    .await;

    match result {
        Ok(tasks) => {
            let response = TaskListResponse {
                tasks: TaskMapper::to_dto_list(tasks),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list tasks: {}", e);
            e.into_response()
        }
    }
}

pub async fn create_task(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(request): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    info!("POST /api/tasks - request: {:?}", request);

    let result: DomainResult<Task> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let command = TaskMapper::to_new_task(&account.id, &child.id, request)?;
        state.task_service.add_task(command).await
    }
    .await;

    match result {
        Ok(task) => (
            StatusCode::CREATED,
            Json(task_response(task, "Task created successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create task: {}", e);
            e.into_response()
        }
    }
}

/// Add one task per day matched by a repeat rule
pub async fn plan_tasks(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(request): Json<PlanTasksRequest>,
) -> impl IntoResponse {
    info!("POST /api/tasks/plan - request: {:?}", request);

    let result: DomainResult<Vec<Task>> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let command = TaskMapper::to_plan_command(&account.id, &child.id, request)?;
        state.task_service.add_planned_tasks(command).await
    }
    .await;

    match result {
        Ok(tasks) => {
            let response = TaskListResponse {
                tasks: TaskMapper::to_dto_list(tasks),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to plan tasks: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_overdue_tasks(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(request): Query<OverdueTasksRequest>,
) -> impl IntoResponse {
    info!("GET /api/tasks/overdue - request: {:?}", request);

    let result: DomainResult<Vec<Task>> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let current_date = match request.current_date.as_deref() {
            Some(date) => parse_date(date, "current_date")?,
            None => Local::now().date_naive(),
        };
        Ok(state
            .task_service
            .get_overdue_tasks(&account.id, &child.id, current_date)
            .await)
    }
    .await;

    match result {
        Ok(tasks) => {
            let response = TaskListResponse {
                tasks: TaskMapper::to_dto_list(tasks),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to get overdue tasks: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_task_counts(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(request): Query<TaskCountsRequest>,
) -> impl IntoResponse {
    info!("GET /api/tasks/counts - request: {:?}", request);

    let result: DomainResult<TaskCountsResponse> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let date = parse_date(&request.date, "date")?;
        Ok(TaskCountsResponse {
            pending: state
                .task_service
                .get_pending_tasks_count(&account.id, &child.id, date)
                .await,
            completed: state
                .task_service
                .get_completed_tasks_count(&account.id, &child.id, date)
                .await,
            child_id: child.id,
            date: format_date(date),
        })
    }
    .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to count tasks: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_task(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(task_id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    info!("PUT /api/tasks/{} - request: {:?}", task_id, request);

    let result: DomainResult<Option<Task>> = async {
        ensure_owned(&state, &account, &task_id).await?;
        let update = TaskMapper::to_task_update(request)?;
        state.task_service.update_task(&task_id, update).await
    }
    .await;

    match result {
        Ok(Some(task)) => (
            StatusCode::OK,
            Json(task_response(task, "Task updated successfully")),
        )
            .into_response(),
        Ok(None) => DomainError::not_found("Task").into_response(),
        Err(e) => {
            error!("Failed to update task {}: {}", task_id, e);
            e.into_response()
        }
    }
}

/// Deleting an unknown task succeeds without effect
pub async fn delete_task(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/tasks/{}", task_id);

    if ensure_owned(&state, &account, &task_id).await.is_err() {
        info!("Task {} not found for account {}, nothing to delete", task_id, account.id);
        return StatusCode::NO_CONTENT.into_response();
    }

    match state.task_service.delete_task(&task_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete task {}: {}", task_id, e);
            e.into_response()
        }
    }
}

pub async fn start_task(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/tasks/{}/start", task_id);

    let result: DomainResult<Option<Task>> = async {
        ensure_owned(&state, &account, &task_id).await?;
        state.task_service.start_task(&task_id).await
    }
    .await;

    match result {
        Ok(Some(task)) => (StatusCode::OK, Json(task_response(task, "Task started"))).into_response(),
        Ok(None) => DomainError::not_found("Task").into_response(),
        Err(e) => {
            error!("Failed to start task {}: {}", task_id, e);
            e.into_response()
        }
    }
}

/// Record the elapsed time and pay the task's points on first completion
pub async fn complete_task(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(task_id): Path<String>,
    Json(request): Json<CompleteTaskRequest>,
) -> impl IntoResponse {
    info!("POST /api/tasks/{}/complete - request: {:?}", task_id, request);

    match state
        .check_in_service
        .complete_task(&account.id, &task_id, request.actual_seconds, request.summary)
        .await
    {
        Ok(Some(CheckInResult {
            task,
            points_awarded,
            child,
        })) => {
            let success_message = if points_awarded > 0 {
                format!("Task completed, earned {} points", points_awarded)
            } else {
                "Task completed".to_string()
            };
            let response = CompleteTaskResponse {
                task: TaskMapper::to_dto(task),
                points_awarded,
                child: child.map(ChildMapper::to_dto),
                success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => DomainError::not_found("Task").into_response(),
        Err(e) => {
            error!("Failed to complete task {}: {}", task_id, e);
            e.into_response()
        }
    }
}

pub async fn cancel_task(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/tasks/{}/cancel", task_id);

    let result: DomainResult<Option<Task>> = async {
        ensure_owned(&state, &account, &task_id).await?;
        state.task_service.cancel_task(&task_id).await
    }
    .await;

    match result {
        Ok(Some(task)) => (StatusCode::OK, Json(task_response(task, "Task cancelled"))).into_response(),
        Ok(None) => DomainError::not_found("Task").into_response(),
        Err(e) => {
            error!("Failed to cancel task {}: {}", task_id, e);
            e.into_response()
        }
    }
}

pub async fn get_elapsed_time(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/tasks/{}/elapsed", task_id);

    if let Err(e) = ensure_owned(&state, &account, &task_id).await {
        return e.into_response();
    }

    let response = ElapsedTimeResponse {
        elapsed_seconds: state.task_service.elapsed_seconds(&task_id).await,
        task_id,
    };
    (StatusCode::OK, Json(response)).into_response()
}

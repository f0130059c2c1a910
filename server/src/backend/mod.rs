//! # Backend Module
//!
//! Everything behind the HTTP surface of the study tracker.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, mappers)
//!     ↓
//! Domain Layer (services, business rules)
//!     ↓
//! Storage Layer (JSON documents)
//! ```
//!
//! `initialize_backend` wires the services over one document store and
//! `create_router` exposes them under `/api`.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::backend::config::ServerConfig;
use crate::backend::domain::{
    AccountService, CheckInService, DataTransferService, GradeService, RewardService, StatisticsService,
    TaskService,
};
use crate::backend::io::rest::{
    account_apis, auth_apis, child_apis, data_apis, grade_apis, reward_apis, statistics_apis, task_apis,
};
use crate::backend::storage::{DocumentRepository, DocumentStorage, JsonConnection};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub task_service: TaskService,
    pub check_in_service: CheckInService,
    pub statistics_service: StatisticsService,
    pub grade_service: GradeService,
    pub reward_service: RewardService,
    pub data_transfer_service: DataTransferService,
}

impl AppState {
    /// Load every store from `storage` and wire the services together
    pub async fn load(storage: Arc<dyn DocumentStorage>) -> Result<Self> {
        let account_service = AccountService::load(storage.clone()).await?;
        let task_service = TaskService::load(storage.clone()).await?;
        let grade_service = GradeService::load(storage.clone()).await?;
        let reward_service = RewardService::load(storage.clone()).await?;

        let check_in_service = CheckInService::new(task_service.clone(), account_service.clone());
        let statistics_service = StatisticsService::new(task_service.clone());
        let data_transfer_service = DataTransferService::new(
            storage,
            account_service.clone(),
            task_service.clone(),
            reward_service.clone(),
            grade_service.clone(),
        );

        Ok(Self {
            account_service,
            task_service,
            check_in_service,
            statistics_service,
            grade_service,
            reward_service,
            data_transfer_service,
        })
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    info!("Setting up document storage in {}", config.data_dir.display());
    let connection = JsonConnection::new(&config.data_dir)?;
    let storage: Arc<dyn DocumentStorage> = Arc::new(DocumentRepository::new(connection));

    info!("Setting up domain services");
    let app_state = AppState::load(storage).await?;

    match app_state.account_service.restore_session().await {
        Ok(Some(account)) => info!("Signed-in account on record: {}", account.id),
        Ok(None) => info!("No stored session"),
        Err(e) => warn!("Could not restore stored session: {}", e),
    }

    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/auth", auth_apis::router())
        .nest("/account", account_apis::router())
        .nest("/children", child_apis::router())
        .nest("/tasks", task_apis::router())
        .nest("/statistics", statistics_apis::router())
        .nest("/grades", grade_apis::router())
        .nest("/rewards", reward_apis::router())
        .nest("/data", data_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

//! # REST API for Authentication
//!
//! Registration, login and logout. Register and login are the only
//! endpoints reachable without a bearer token.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::{error, info};
use shared::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest};

use crate::backend::io::rest::auth::AuthenticatedAccount;
use crate::backend::io::rest::mappers::account_mapper::AccountMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/register - phone: {}", request.phone);

    match state
        .account_service
        .register(AccountMapper::to_register_command(request))
        .await
    {
        Ok(account) => {
            let response = AccountResponse {
                account: AccountMapper::to_dto(account),
                current_child: None,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to register account: {}", e);
            e.into_response()
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - phone: {}", request.phone);

    match state.account_service.login(&request.phone, &request.password).await {
        Ok((token, account)) => {
            let response = LoginResponse {
                token,
                account: AccountMapper::to_dto(account),
                success_message: "Logged in successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Login failed: {}", e);
            e.into_response()
        }
    }
}

pub async fn logout(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> impl IntoResponse {
    info!("POST /api/auth/logout - account: {}", account.id);

    match state.account_service.logout().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to log out: {}", e);
            e.into_response()
        }
    }
}

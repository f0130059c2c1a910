//! # REST API for the signed-in Account

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};
use shared::{AccountResponse, UpdateAccountRequest};

use crate::backend::io::rest::auth::AuthenticatedAccount;
use crate::backend::io::rest::mappers::account_mapper::AccountMapper;
use crate::backend::io::rest::mappers::child_mapper::ChildMapper;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_account).put(update_account))
}

/// The account with its current child resolved
pub async fn get_account(AuthenticatedAccount(account): AuthenticatedAccount) -> impl IntoResponse {
    info!("GET /api/account - account: {}", account.id);

    let current_child = account.current_child().cloned().map(ChildMapper::to_dto);
    let response = AccountResponse {
        account: AccountMapper::to_dto(account),
        current_child,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn update_account(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(request): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    info!("PUT /api/account - account: {}", account.id);

    match state
        .account_service
        .update_account(&account.id, AccountMapper::to_account_update(request))
        .await
    {
        Ok(updated) => {
            let current_child = updated.current_child().cloned().map(ChildMapper::to_dto);
            let response = AccountResponse {
                account: AccountMapper::to_dto(updated),
                current_child,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update account {}: {}", account.id, e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::io::rest::test_support::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_update_account_and_log_in_with_new_password() {
        let app = TestApp::new().await;
        let token = app.sign_in("13800000000").await;
        app.add_child(&token, "Xiaoming").await;

        let (status, body) = app
            .request(
                Method::PUT,
                "/api/account",
                Some(&token),
                Some(json!({"username": "Mum", "password": "changed99"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["account"]["username"], "Mum");
        assert_eq!(body["current_child"]["name"], "Xiaoming");

        let (status, _) = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"phone": "13800000000", "password": "changed99"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let app = TestApp::new().await;
        let token = app.sign_in("13800000000").await;

        let (status, _) = app
            .request(Method::PUT, "/api/account", Some(&token), Some(json!({"password": "123"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

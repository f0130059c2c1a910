//! Bearer token authentication for the REST API.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use log::warn;

use crate::backend::domain::models::account::Account;
use crate::backend::domain::DomainError;
use crate::backend::AppState;

/// The account named by the request's `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

/// Token part of a bearer authorization header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedAccount {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| {
                warn!("{} {} without a bearer token", parts.method, parts.uri.path());
                DomainError::Unauthorized("Missing bearer token".to_string()).into_response()
            })?;

        state
            .account_service
            .authenticate(token)
            .await
            .map(AuthenticatedAccount)
            .map_err(|e| {
                warn!("{} {} rejected: {}", parts.method, parts.uri.path(), e);
                e.into_response()
            })
    }
}

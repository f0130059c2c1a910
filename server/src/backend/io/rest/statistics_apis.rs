//! # REST API for Study Statistics

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};
use shared::{StatisticsRequest, StudyStats};

use crate::backend::domain::DomainResult;
use crate::backend::io::rest::auth::AuthenticatedAccount;
use crate::backend::io::rest::mappers::parse_date;
use crate::backend::io::rest::resolve_child;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_statistics))
}

/// Aggregates over the child's tasks between two inclusive dates
pub async fn get_statistics(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(request): Query<StatisticsRequest>,
) -> impl IntoResponse {
    info!("GET /api/statistics - request: {:?}", request);

    let result: DomainResult<StudyStats> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let start = parse_date(&request.start_date, "start_date")?;
        let end = parse_date(&request.end_date, "end_date")?;
        state
            .statistics_service
            .get_statistics(&account.id, &child.id, start, end)
            .await
    }
    .await;

    match result {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            error!("Failed to compute statistics: {}", e);
            e.into_response()
        }
    }
}

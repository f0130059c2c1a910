//! # REST API for Backup and Reports

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::{error, info};
use shared::{ImportDataResponse, TaskCsvRequest};

use crate::backend::domain::DomainResult;
use crate::backend::io::rest::auth::AuthenticatedAccount;
use crate::backend::io::rest::mappers::parse_date;
use crate::backend::io::rest::resolve_child;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export", get(export_data))
        .route("/import", post(import_data))
        .route("/tasks.csv", get(export_tasks_csv))
}

pub async fn export_data(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> impl IntoResponse {
    info!("GET /api/data/export - account: {}", account.id);

    match state.data_transfer_service.export_account(&account.id).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => {
            error!("Failed to export data: {}", e);
            e.into_response()
        }
    }
}

/// The body is read as text so malformed JSON is reported as a rejected
/// import rather than an extractor error
pub async fn import_data(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    body: String,
) -> impl IntoResponse {
    info!("POST /api/data/import - account: {}, {} bytes", account.id, body.len());

    match state.data_transfer_service.import(&account.id, &body).await {
        Ok(summary) => {
            let response = ImportDataResponse {
                users_imported: summary.users,
                tasks_imported: summary.tasks,
                rewards_imported: summary.rewards,
                grades_imported: summary.grades,
                success_message: "Data imported successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to import data: {}", e);
            e.into_response()
        }
    }
}

pub async fn export_tasks_csv(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(request): Query<TaskCsvRequest>,
) -> impl IntoResponse {
    info!("GET /api/data/tasks.csv - request: {:?}", request);

    let result: DomainResult<(String, String)> = async {
        let child = resolve_child(&account, request.child_id.as_deref())?;
        let start = parse_date(&request.start_date, "start_date")?;
        let end = parse_date(&request.end_date, "end_date")?;
        let csv_content = state
            .data_transfer_service
            .export_tasks_csv(&account.id, &child.id, start, end)
            .await?;
        // Header values must stay ASCII
        let stem: String = child
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let filename = format!(
            "{}_tasks_{}_{}.csv",
            stem,
            start.format("%Y%m%d"),
            end.format("%Y%m%d")
        );
        Ok((filename, csv_content))
    }
    .await;

    match result {
        Ok((filename, csv_content)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            csv_content,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to export tasks as CSV: {}", e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::io::rest::test_support::TestApp;
    use axum::http::{header, Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_export_then_import() {
        let app = TestApp::new().await;
        let token = app.sign_in("13800000000").await;
        app.add_child(&token, "Xiaoming").await;
        app.add_task(&token, "Fractions", "2026-02-10", 10).await;

        let (status, exported) = app.request(Method::GET, "/api/data/export", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exported["version"], "1.0");
        assert_eq!(exported["tasks"].as_array().unwrap().len(), 1);
        assert!(exported["exportDate"].is_string());

        app.add_task(&token, "Reading", "2026-02-10", 5).await;

        let (status, body) = app
            .request(Method::POST, "/api/data/import", Some(&token), Some(exported))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tasks_imported"], 1);

        let (_, body) = app
            .request(Method::GET, "/api/tasks?date=2026-02-10", Some(&token), None)
            .await;
        assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_export_and_import_stay_within_the_account() {
        let app = TestApp::new().await;
        let victim = app.sign_in("13900000000").await;
        app.add_child(&victim, "Xiaohong").await;
        app.add_task(&victim, "Spelling", "2026-02-10", 10).await;

        let attacker = app.sign_in("13800000000").await;
        app.add_child(&attacker, "Xiaoming").await;

        let (status, exported) = app.request(Method::GET, "/api/data/export", Some(&attacker), None).await;
        assert_eq!(status, StatusCode::OK);
        let users = exported["users"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["phone"], "13800000000");
        assert!(exported["tasks"].as_array().unwrap().is_empty());
        assert!(exported.get("token").is_none());

        let (status, body) = app
            .request(
                Method::POST,
                "/api/data/import",
                Some(&attacker),
                Some(json!({"version": "1.0", "tasks": []})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tasks_imported"], 0);

        let (_, body) = app
            .request(Method::GET, "/api/data/export", Some(&victim), None)
            .await;
        let victim_users = body["users"].clone();
        assert_eq!(body["tasks"].as_array().unwrap().len(), 1);

        let (status, _) = app
            .request(
                Method::POST,
                "/api/data/import",
                Some(&attacker),
                Some(json!({"version": "1.0", "users": victim_users})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = app
            .request(Method::GET, "/api/tasks?date=2026-02-10", Some(&victim), None)
            .await;
        assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_unversioned_or_malformed_documents() {
        let app = TestApp::new().await;
        let token = app.sign_in("13800000000").await;

        let (status, _) = app
            .request(Method::POST, "/api/data/import", Some(&token), Some(json!({"tasks": []})))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _, _) = app
            .send(Method::POST, "/api/data/import", Some(&token), Some("{not json".to_string()))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_tasks_csv_download() {
        let app = TestApp::new().await;
        let token = app.sign_in("13800000000").await;
        app.add_child(&token, "Xiaoming").await;
        app.add_task(&token, "Fractions", "2026-02-10", 10).await;

        let (status, headers, bytes) = app
            .send(
                Method::GET,
                "/api/data/tasks.csv?start_date=2026-02-01&end_date=2026-02-28",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"xiaoming_tasks_20260201_20260228.csv\""
        );

        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2026-02-10,math,Fractions,pending"));
    }
}

//! # REST API for Journal Entries

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use chrono::Local;
use shared::{JournalEntryUpdate, JournalFilter, NewJournalEntry};
use tracing::info;

use super::{respond, respond_empty};
use crate::domain::JournalService;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/journal", post(create_entry))
        .route("/journal/:entry_id", patch(update_entry).delete(delete_entry))
        .route("/users/:user_id/journal", get(list_entries))
        .route("/users/:user_id/journal/summary", get(journal_summary))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(filter): Query<JournalFilter>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/journal - filter: {:?}", user_id, filter);
    respond(
        state.journal_service.get_journal_entries(&user_id, &filter).await,
        StatusCode::OK,
    )
}

/// Summary over the entries the filter selects
pub async fn journal_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(filter): Query<JournalFilter>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/journal/summary", user_id);
    let today = Local::now().date_naive();
    let entries = state.journal_service.get_journal_entries(&user_id, &filter).await;
    respond(
        entries.map(|e| JournalService::summarize(&e, today)),
        StatusCode::OK,
    )
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<NewJournalEntry>,
) -> impl IntoResponse {
    info!("POST /api/journal - request: {:?}", request);
    respond(
        state.journal_service.create_journal_entry(&request).await,
        StatusCode::CREATED,
    )
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Json(request): Json<JournalEntryUpdate>,
) -> impl IntoResponse {
    info!("PATCH /api/journal/{} - request: {:?}", entry_id, request);
    respond(
        state.journal_service.update_journal_entry(&entry_id, &request).await,
        StatusCode::OK,
    )
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/journal/{}", entry_id);
    respond_empty(state.journal_service.delete_journal_entry(&entry_id).await)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use super::super::test_support::{app, column, send};

    fn entry(date: &str, activity: &str, hours: f64, skills: &[&str]) -> Value {
        json!({
            "user_id": "u1",
            "entry_date": date,
            "activity_type": activity,
            "description": "Chores",
            "hours_spent": hours,
            "aet_skills": skills
        })
    }

    #[tokio::test]
    async fn test_journal_filters_and_order() {
        let app = app();
        for body in [
            entry("2024-03-01", "Feeding", 1.0, &["Animal Care"]),
            entry("2024-03-10", "Grooming", 2.0, &["Animal Care", "Showmanship"]),
            entry("2024-04-02", "Feeding", 0.5, &[]),
        ] {
            let (status, _) = send(&app, Method::POST, "/api/journal", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, all) = send(&app, Method::GET, "/api/users/u1/journal", None).await;
        assert_eq!(
            column(&all, "entry_date"),
            vec!["2024-04-02", "2024-03-10", "2024-03-01"]
        );

        let (_, march) = send(
            &app,
            Method::GET,
            "/api/users/u1/journal?start_date=2024-03-01&end_date=2024-03-31&activity_type=Feeding",
            None,
        )
        .await;
        assert_eq!(column(&march, "entry_date"), vec!["2024-03-01"]);

        let (_, tagged) = send(
            &app,
            Method::GET,
            "/api/users/u1/journal?aet_skill=Showmanship",
            None,
        )
        .await;
        assert_eq!(column(&tagged, "activity_type"), vec!["Grooming"]);

        let (_, summary) = send(&app, Method::GET, "/api/users/u1/journal/summary", None).await;
        assert_eq!(summary["data"]["total_entries"], 3);
        assert_eq!(summary["data"]["total_hours"], 3.5);
        assert_eq!(summary["data"]["unique_skills"], 2);
    }

    #[tokio::test]
    async fn test_journal_update_and_delete() {
        let app = app();
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/journal",
            Some(entry("2024-03-01", "Feeding", 1.0, &[])),
        )
        .await;
        let uri = format!("/api/journal/{}", created["data"]["id"].as_str().unwrap());

        let (status, updated) = send(&app, Method::PATCH, &uri, Some(json!({"hours_spent": 1.5}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["hours_spent"], 1.5);
        assert_eq!(updated["data"]["activity_type"], "Feeding");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, listed) = send(&app, Method::GET, "/api/users/u1/journal", None).await;
        assert!(column(&listed, "id").is_empty());

        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"hours_spent": 2.0}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

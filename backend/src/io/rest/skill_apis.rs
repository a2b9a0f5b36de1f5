//! # REST API for AET Skills and Progress

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::AddSkillHoursRequest;
use tracing::info;

use super::respond;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/skills", get(list_skills))
        .route("/users/:user_id/skills", get(list_progress))
        .route("/users/:user_id/skills/:skill_id/hours", post(add_hours))
        .route("/skill-progress/:progress_id/complete", post(complete_skill))
}

pub async fn list_skills(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/skills");
    respond(state.skill_service.get_aet_skills().await, StatusCode::OK)
}

pub async fn list_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/skills", user_id);
    respond(
        state.skill_service.get_user_skill_progress(&user_id).await,
        StatusCode::OK,
    )
}

pub async fn add_hours(
    State(state): State<AppState>,
    Path((user_id, skill_id)): Path<(String, String)>,
    Json(request): Json<AddSkillHoursRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/users/{}/skills/{}/hours - request: {:?}",
        user_id, skill_id, request
    );
    respond(
        state
            .skill_service
            .update_skill_progress(&user_id, &skill_id, request.hours)
            .await,
        StatusCode::OK,
    )
}

pub async fn complete_skill(
    State(state): State<AppState>,
    Path(progress_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/skill-progress/{}/complete", progress_id);
    respond(state.skill_service.complete_skill(&progress_id).await, StatusCode::OK)
}

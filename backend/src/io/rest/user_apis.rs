//! # REST API for Users and their Dashboard

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{NewUser, UserUpdate};
use tracing::info;

use super::respond;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:user_id", get(get_user).patch(update_user))
        .route("/users/:user_id/dashboard", get(get_dashboard))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> impl IntoResponse {
    info!("POST /api/users - request: {:?}", request);
    respond(state.user_service.create_user(&request).await, StatusCode::CREATED)
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}", user_id);
    respond(state.user_service.get_user_by_id(&user_id).await, StatusCode::OK)
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UserUpdate>,
) -> impl IntoResponse {
    info!("PATCH /api/users/{} - request: {:?}", user_id, request);
    respond(state.user_service.update_user(&user_id, &request).await, StatusCode::OK)
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/dashboard", user_id);
    respond(
        state.dashboard_service.get_dashboard_stats(&user_id).await,
        StatusCode::OK,
    )
}

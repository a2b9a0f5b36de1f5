//! # REST API for Weight and Health Records

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use shared::{HealthRecordUpdate, NewHealthRecord, NewWeightRecord, WeightRecordUpdate};
use tracing::info;

use super::{respond, respond_empty};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/animals/:animal_id/weights", get(list_weights))
        .route("/animals/:animal_id/health", get(list_health))
        .route("/weights", post(add_weight))
        .route("/weights/:record_id", patch(update_weight).delete(delete_weight))
        .route("/health", post(add_health))
        .route("/health/:record_id", patch(update_health).delete(delete_health))
}

pub async fn list_weights(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/{}/weights", animal_id);
    respond(state.record_service.get_weight_records(&animal_id).await, StatusCode::OK)
}

pub async fn add_weight(
    State(state): State<AppState>,
    Json(request): Json<NewWeightRecord>,
) -> impl IntoResponse {
    info!("POST /api/weights - request: {:?}", request);
    respond(state.record_service.add_weight_record(&request).await, StatusCode::CREATED)
}

pub async fn update_weight(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(request): Json<WeightRecordUpdate>,
) -> impl IntoResponse {
    info!("PATCH /api/weights/{} - request: {:?}", record_id, request);
    respond(
        state.record_service.update_weight_record(&record_id, &request).await,
        StatusCode::OK,
    )
}

pub async fn delete_weight(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/weights/{}", record_id);
    respond_empty(state.record_service.delete_weight_record(&record_id).await)
}

pub async fn list_health(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/{}/health", animal_id);
    respond(state.record_service.get_health_records(&animal_id).await, StatusCode::OK)
}

pub async fn add_health(
    State(state): State<AppState>,
    Json(request): Json<NewHealthRecord>,
) -> impl IntoResponse {
    info!("POST /api/health - request: {:?}", request);
    respond(state.record_service.add_health_record(&request).await, StatusCode::CREATED)
}

pub async fn update_health(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(request): Json<HealthRecordUpdate>,
) -> impl IntoResponse {
    info!("PATCH /api/health/{} - request: {:?}", record_id, request);
    respond(
        state.record_service.update_health_record(&record_id, &request).await,
        StatusCode::OK,
    )
}

pub async fn delete_health(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/health/{}", record_id);
    respond_empty(state.record_service.delete_health_record(&record_id).await)
}

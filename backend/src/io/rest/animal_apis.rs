//! # REST API for Animals

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{AnimalFilter, AnimalUpdate, NewAnimal};
use tracing::info;

use super::{respond, respond_empty};
use crate::domain::AnimalService;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/animals", post(create_animal))
        .route(
            "/animals/:animal_id",
            get(get_animal).patch(update_animal).delete(delete_animal),
        )
        .route("/users/:user_id/animals", get(list_animals))
        .route("/users/:user_id/animals/summary", get(herd_summary))
}

/// List a user's animals; `species`, `status` and `search` narrow the list
pub async fn list_animals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(filter): Query<AnimalFilter>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/animals - filter: {:?}", user_id, filter);
    respond(state.animal_service.get_animals(&user_id, &filter).await, StatusCode::OK)
}

pub async fn herd_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/animals/summary", user_id);
    let animals = state
        .animal_service
        .get_animals(&user_id, &AnimalFilter::default())
        .await;
    respond(animals.map(|a| AnimalService::herd_summary(&a)), StatusCode::OK)
}

pub async fn get_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/{}", animal_id);
    respond(state.animal_service.get_animal_by_id(&animal_id).await, StatusCode::OK)
}

pub async fn create_animal(
    State(state): State<AppState>,
    Json(request): Json<NewAnimal>,
) -> impl IntoResponse {
    info!("POST /api/animals - request: {:?}", request);
    respond(state.animal_service.create_animal(&request).await, StatusCode::CREATED)
}

pub async fn update_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
    Json(request): Json<AnimalUpdate>,
) -> impl IntoResponse {
    info!("PATCH /api/animals/{} - request: {:?}", animal_id, request);
    respond(
        state.animal_service.update_animal(&animal_id, &request).await,
        StatusCode::OK,
    )
}

pub async fn delete_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/animals/{}", animal_id);
    respond_empty(state.animal_service.delete_animal(&animal_id).await)
}

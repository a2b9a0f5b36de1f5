//! # REST API for Expenses

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use chrono::Local;
use shared::{ExpenseFilter, ExpenseUpdate, NewExpense};
use tracing::info;

use super::{respond, respond_empty};
use crate::domain::ExpenseService;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route(
            "/expenses/:expense_id",
            patch(update_expense).delete(delete_expense),
        )
        .route("/users/:user_id/expenses", get(list_expenses))
        .route("/users/:user_id/expenses/summary", get(expense_summary))
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(filter): Query<ExpenseFilter>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/expenses - filter: {:?}", user_id, filter);
    respond(state.expense_service.get_expenses(&user_id, &filter).await, StatusCode::OK)
}

pub async fn expense_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/expenses/summary", user_id);
    let today = Local::now().date_naive();
    let expenses = state
        .expense_service
        .get_expenses(&user_id, &ExpenseFilter::default())
        .await;
    respond(
        expenses.map(|e| ExpenseService::summarize(&e, today)),
        StatusCode::OK,
    )
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<NewExpense>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", request);
    respond(state.expense_service.create_expense(&request).await, StatusCode::CREATED)
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
    Json(request): Json<ExpenseUpdate>,
) -> impl IntoResponse {
    info!("PATCH /api/expenses/{} - request: {:?}", expense_id, request);
    respond(
        state.expense_service.update_expense(&expense_id, &request).await,
        StatusCode::OK,
    )
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", expense_id);
    respond_empty(state.expense_service.delete_expense(&expense_id).await)
}

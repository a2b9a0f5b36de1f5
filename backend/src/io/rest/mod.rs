//! # REST API Interface Layer
//!
//! JSON endpoints over the domain services, mounted under `/api`. Every body
//! is an [`ApiResponse`] envelope; store failures become the envelope's
//! `error` with a matching HTTP status.

pub mod animal_apis;
pub mod attachment_apis;
pub mod expense_apis;
pub mod journal_apis;
pub mod record_apis;
pub mod skill_apis;
pub mod user_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use shared::ApiResponse;
use tracing::error;

use crate::storage::{QueryResult, StoreError};

pub(crate) fn status_for(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::InvalidRow(_) | StoreError::InvalidLocation(_) | StoreError::Json(_) => {
            StatusCode::BAD_REQUEST
        }
        StoreError::Server { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        StoreError::Http(_) => StatusCode::BAD_GATEWAY,
        StoreError::Sqlx(_) | StoreError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wrap a service result in the response envelope
pub(crate) fn respond<T: Serialize>(result: QueryResult<T>, success: StatusCode) -> Response {
    match result.into_result() {
        Ok(data) => (success, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => {
            error!("Request failed: {}", e);
            (status_for(&e), Json(ApiResponse::<T>::failure(e.to_string()))).into_response()
        }
    }
}

/// Empty-bodied success for deletes
pub(crate) fn respond_empty(result: QueryResult<()>) -> Response {
    match result.into_result() {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::<()>::empty())).into_response(),
        Err(e) => respond::<()>(QueryResult::err(e), StatusCode::OK),
    }
}

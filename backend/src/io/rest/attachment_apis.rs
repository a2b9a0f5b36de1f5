//! # REST API for Attachments
//!
//! Raw file bodies in and out; `PUT` answers with the stored location.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::put,
    Router,
};
use tracing::info;

use super::{respond, respond_empty};
use crate::storage::{BlobObject, QueryResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/attachments/:bucket/*path",
        put(upload).get(download).delete(remove),
    )
}

pub async fn upload(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    info!("PUT /api/attachments/{}/{}", bucket, path);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    respond(
        state
            .attachment_service
            .upload(&bucket, &path, content_type, body.to_vec())
            .await,
        StatusCode::CREATED,
    )
}

pub async fn download(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/attachments/{}/{}", bucket, path);
    let result = state.attachment_service.download(&bucket, &path).await;
    match result.into_result() {
        Ok(BlobObject {
            content_type,
            bytes,
        }) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) => respond::<()>(QueryResult::err(e), StatusCode::OK),
    }
}

pub async fn remove(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/attachments/{}/{}", bucket, path);
    respond_empty(state.attachment_service.delete(&bucket, &path).await)
}

//! Store errors and the `{data, error}` result shape returned by every
//! data-access operation.

use thiserror::Error;
use tracing::warn;

/// Failure reported by a row or blob store
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request to the remote store failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Row (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local SQLite store failed
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Remote store answered with an error status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("No row with id {id} in {collection}")]
    NotFound { collection: String, id: String },

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Bucket or object path the stores refuse to address
    #[error("Invalid object location: {0}")]
    InvalidLocation(String),

    #[error("Store configuration error: {0}")]
    Config(String),
}

/// Outcome of a data-access call: `error` is set exactly when the store
/// reported a failure, otherwise `data` holds the result.
#[derive(Debug)]
pub struct QueryResult<T> {
    pub data: Option<T>,
    pub error: Option<StoreError>,
}

impl<T> QueryResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: StoreError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Wrap a store result, logging the failure under `operation`.
    pub fn logged(operation: &str, result: Result<T, StoreError>) -> Self {
        if let Err(ref e) = result {
            warn!("{} failed: {}", operation, e);
        }
        result.into()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<T, StoreError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(StoreError::InvalidRow("result carried no data".to_string())),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryResult<U> {
        QueryResult {
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<T> From<Result<T, StoreError>> for QueryResult<T> {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(error),
        }
    }
}

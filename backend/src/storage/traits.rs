//! # Storage Traits
//!
//! The seams between the domain services and whichever store backs them.
//! Services hold `Arc<dyn RowStore>` / `Arc<dyn BlobStore>` and never know
//! whether rows live in memory, in SQLite, or behind a PostgREST endpoint.

use async_trait::async_trait;

use super::error::StoreError;
use super::query::{Query, Row};

/// Collection-oriented row storage
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Rows of `collection` matching `query`, with embeds resolved
    async fn select(&self, collection: &str, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Insert a row and return it as stored. Missing `id`, `created_at` and
    /// `updated_at` columns are filled in.
    async fn insert(&self, collection: &str, row: Row) -> Result<Row, StoreError>;

    /// Merge `patch` into the row with this id and return the result.
    /// Fails with [`StoreError::NotFound`] when no such row exists.
    async fn update(&self, collection: &str, id: &str, patch: Row) -> Result<Row, StoreError>;

    /// Remove the row with this id. Removing a missing row is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// A stored file and its media type
#[derive(Debug, Clone, PartialEq)]
pub struct BlobObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Bucketed file storage for photos and receipts
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes at `bucket/path`, returning the stored path
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;

    async fn download(&self, bucket: &str, path: &str) -> Result<BlobObject, StoreError>;

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StoreError>;

    /// URL a client can fetch the file from
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Check an object path before it is joined into a store location.
///
/// Paths are `/`-separated relative names. Empty, `.` and `..` segments, a
/// leading `/`, backslashes, and URL-significant `%`, `?` and `#` are refused
/// so that no path can address anything outside its bucket.
pub fn check_object_path(path: &str) -> Result<(), StoreError> {
    let refused = path.is_empty()
        || path
            .chars()
            .any(|c| matches!(c, '\\' | '%' | '?' | '#') || c.is_control())
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");

    if refused {
        Err(StoreError::InvalidLocation(format!("object path {:?}", path)))
    } else {
        Ok(())
    }
}

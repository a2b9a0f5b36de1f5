//! Receipt and photo files, addressed by bucket and path.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::storage::{check_object_path, BlobObject, BlobStore, QueryResult, StoreError};

pub const RECEIPTS_BUCKET: &str = "receipts";
pub const PHOTOS_BUCKET: &str = "photos";

/// Buckets the service reads and writes
pub const BUCKETS: [&str; 2] = [RECEIPTS_BUCKET, PHOTOS_BUCKET];

/// Where an uploaded file ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredAttachment {
    pub bucket: String,
    pub path: String,
    pub public_url: String,
}

/// Known bucket and a path that stays inside it
fn check_location(bucket: &str, path: &str) -> Result<(), StoreError> {
    if !BUCKETS.contains(&bucket) {
        return Err(StoreError::InvalidLocation(format!("unknown bucket {:?}", bucket)));
    }
    check_object_path(path)
}

#[derive(Clone)]
pub struct AttachmentService {
    blobs: Arc<dyn BlobStore>,
}

impl AttachmentService {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> QueryResult<StoredAttachment> {
        info!("Uploading {} bytes to {}/{}", bytes.len(), bucket, path);
        if let Err(e) = check_location(bucket, path) {
            return QueryResult::logged("upload attachment", Err(e));
        }

        let result = self
            .blobs
            .upload(bucket, path, content_type, bytes)
            .await
            .map(|stored| StoredAttachment {
                bucket: bucket.to_string(),
                public_url: self.blobs.public_url(bucket, &stored),
                path: stored,
            });
        QueryResult::logged("upload attachment", result)
    }

    pub async fn download(&self, bucket: &str, path: &str) -> QueryResult<BlobObject> {
        info!("Downloading {}/{}", bucket, path);
        if let Err(e) = check_location(bucket, path) {
            return QueryResult::logged("download attachment", Err(e));
        }
        QueryResult::logged("download attachment", self.blobs.download(bucket, path).await)
    }

    pub async fn delete(&self, bucket: &str, path: &str) -> QueryResult<()> {
        info!("Deleting {}/{}", bucket, path);
        if let Err(e) = check_location(bucket, path) {
            return QueryResult::logged("delete attachment", Err(e));
        }
        QueryResult::logged("delete attachment", self.blobs.remove(bucket, path).await)
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> Result<String, StoreError> {
        check_location(bucket, path)?;
        Ok(self.blobs.public_url(bucket, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn setup_test() -> AttachmentService {
        AttachmentService::new(Arc::new(
            MemoryStore::new().with_public_base_url("/api/attachments"),
        ))
    }

    #[tokio::test]
    async fn test_upload_download_delete() {
        let service = setup_test();
        let stored = service
            .upload(RECEIPTS_BUCKET, "u1/feed-store.png", "image/png", vec![1, 2])
            .await
            .into_result()
            .unwrap();
        assert_eq!(stored.public_url, "/api/attachments/receipts/u1/feed-store.png");

        let blob = service
            .download(RECEIPTS_BUCKET, &stored.path)
            .await
            .into_result()
            .unwrap();
        assert_eq!(blob.bytes, vec![1, 2]);

        assert!(service.delete(RECEIPTS_BUCKET, &stored.path).await.is_ok());
        assert!(service.download(RECEIPTS_BUCKET, &stored.path).await.error.is_some());
    }

    #[tokio::test]
    async fn test_rejects_traversal_paths() {
        let service = setup_test();
        let result = service.upload(PHOTOS_BUCKET, "../etc/passwd", "text/plain", vec![]).await;
        assert!(matches!(result.error, Some(StoreError::InvalidLocation(_))));
        assert!(service.upload(PHOTOS_BUCKET, "", "text/plain", vec![]).await.error.is_some());

        let escape = "../../../../rest/v1/users";
        let read = service.download(RECEIPTS_BUCKET, escape).await;
        assert!(matches!(read.error, Some(StoreError::InvalidLocation(_))));
        let removed = service.delete(RECEIPTS_BUCKET, escape).await;
        assert!(matches!(removed.error, Some(StoreError::InvalidLocation(_))));
        assert!(service.public_url(RECEIPTS_BUCKET, escape).is_err());
        assert!(service.delete(RECEIPTS_BUCKET, "/u1/hay.txt").await.error.is_some());
        assert!(service.download(RECEIPTS_BUCKET, "u1\\..\\hay.txt").await.error.is_some());
    }

    #[tokio::test]
    async fn test_only_known_buckets() {
        let service = setup_test();
        let result = service.upload("secrets", "u1/key.txt", "text/plain", vec![1]).await;
        assert!(matches!(result.error, Some(StoreError::InvalidLocation(_))));
        assert!(service.download("secrets", "u1/key.txt").await.error.is_some());
        assert!(service.delete("", "u1/key.txt").await.error.is_some());

        assert_eq!(
            service.public_url(PHOTOS_BUCKET, "u1/duke.jpg").unwrap(),
            "/api/attachments/photos/u1/duke.jpg"
        );
    }
}

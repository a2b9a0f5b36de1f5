//! In-process store used for tests, demos and the `memory` store setting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::error::StoreError;
use super::query::{fill_insert_defaults, row_id, Query, Row};
use super::traits::{BlobObject, BlobStore, RowStore};

type Collections = HashMap<String, Vec<Row>>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<Collections>>,
    blobs: Arc<Mutex<HashMap<(String, String), BlobObject>>>,
    public_base_url: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for [`BlobStore::public_url`], e.g. `/api/attachments`
    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = base.into();
        self
    }

    /// Load rows as-is, without filling defaults
    pub fn seed(&self, collection: &str, rows: impl IntoIterator<Item = Row>) {
        self.lock_rows()
            .entry(collection.to_string())
            .or_default()
            .extend(rows);
    }

    pub fn row_count(&self, collection: &str) -> usize {
        self.lock_rows().get(collection).map_or(0, Vec::len)
    }

    fn lock_rows(&self) -> MutexGuard<'_, Collections> {
        self.collections.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Attach embedded rows in place, looking each one up by foreign key.
pub(crate) fn resolve_embeds(
    rows: &mut [Row],
    query: &Query,
    lookup: impl Fn(&str, &str) -> Option<Row>,
) {
    for embed in &query.embeds {
        for row in rows.iter_mut() {
            let related = row
                .get(&embed.foreign_key)
                .and_then(Value::as_str)
                .and_then(|id| lookup(&embed.collection, id))
                .map(Value::Object)
                .unwrap_or(Value::Null);
            row.insert(embed.collection.clone(), related);
        }
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(&self, collection: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        let collections = self.lock_rows();
        let rows = collections.get(collection).cloned().unwrap_or_default();
        let mut selected = query.apply(rows);

        resolve_embeds(&mut selected, query, |related, id| {
            collections
                .get(related)?
                .iter()
                .find(|row| row_id(row) == Some(id))
                .cloned()
        });
        Ok(selected)
    }

    async fn insert(&self, collection: &str, mut row: Row) -> Result<Row, StoreError> {
        fill_insert_defaults(&mut row);

        let mut collections = self.lock_rows();
        let rows = collections.entry(collection.to_string()).or_default();
        if rows.iter().any(|existing| row_id(existing) == row_id(&row)) {
            return Err(StoreError::Server {
                status: 409,
                message: format!("duplicate id in {}", collection),
            });
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, collection: &str, id: &str, patch: Row) -> Result<Row, StoreError> {
        let mut collections = self.lock_rows();
        let existing = collections
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        for (column, value) in patch {
            if column != "id" {
                existing.insert(column, value);
            }
        }
        Ok(existing.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(rows) = self.lock_rows().get_mut(collection) {
            rows.retain(|row| row_id(row) != Some(id));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (bucket.to_string(), path.to_string());
        if blobs.contains_key(&key) {
            return Err(StoreError::Server {
                status: 409,
                message: format!("{}/{} already exists", bucket, path),
            });
        }
        blobs.insert(
            key,
            BlobObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(path.to_string())
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<BlobObject, StoreError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: bucket.to_string(),
                id: path.to_string(),
            })
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::query::to_row;
    use serde_json::json;
    use shared::SortDirection;

    fn row(value: Value) -> Row {
        to_row(&value).unwrap()
    }

    #[tokio::test]
    async fn test_insert_fills_defaults_and_selects() {
        let store = MemoryStore::new();
        let stored = store
            .insert("animals", row(json!({"name": "Bessie", "user_id": "u1"})))
            .await
            .unwrap();

        assert!(row_id(&stored).is_some());
        assert!(stored.contains_key("created_at"));

        let found = store
            .select("animals", &Query::new().eq("user_id", "u1"))
            .await
            .unwrap();
        assert_eq!(found, vec![stored]);

        let none = store
            .select("animals", &Query::new().eq("user_id", "u2"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        store.insert("users", row(json!({"id": "u1"}))).await.unwrap();
        let err = store.insert("users", row(json!({"id": "u1"}))).await.unwrap_err();
        assert!(matches!(err, StoreError::Server { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_update_merges_and_reports_missing() {
        let store = MemoryStore::new();
        store
            .insert("animals", row(json!({"id": "a1", "name": "Bessie", "breed": "Angus"})))
            .await
            .unwrap();

        let updated = store
            .update("animals", "a1", row(json!({"name": "Bess", "id": "other"})))
            .await
            .unwrap();
        assert_eq!(updated["name"], "Bess");
        assert_eq!(updated["breed"], "Angus");
        assert_eq!(updated["id"], "a1");

        let err = store
            .update("animals", "missing", row(json!({"name": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_ok() {
        let store = MemoryStore::new();
        store.insert("expenses", row(json!({"id": "e1"}))).await.unwrap();

        store.delete("expenses", "nope").await.unwrap();
        store.delete("ghosts", "nope").await.unwrap();
        assert_eq!(store.row_count("expenses"), 1);

        store.delete("expenses", "e1").await.unwrap();
        assert_eq!(store.row_count("expenses"), 0);
    }

    #[tokio::test]
    async fn test_select_resolves_embeds() {
        let store = MemoryStore::new();
        store.seed(
            "aet_skills",
            vec![row(json!({"id": "s1", "title": "Feeding"}))],
        );
        store.seed(
            "user_skill_progress",
            vec![
                row(json!({"id": "p1", "skill_id": "s1", "hours": 2})),
                row(json!({"id": "p2", "skill_id": "gone", "hours": 1})),
            ],
        );

        let rows = store
            .select(
                "user_skill_progress",
                &Query::new()
                    .embed("aet_skills", "skill_id")
                    .order("hours", SortDirection::Desc),
            )
            .await
            .unwrap();

        assert_eq!(rows[0]["aet_skills"]["title"], "Feeding");
        assert_eq!(rows[1]["aet_skills"], Value::Null);
    }

    #[tokio::test]
    async fn test_blob_round_trip() {
        let store = MemoryStore::new().with_public_base_url("/files");
        let path = store
            .upload("receipts", "u1/feed.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(path, "u1/feed.jpg");
        assert_eq!(store.public_url("receipts", &path), "/files/receipts/u1/feed.jpg");

        let blob = store.download("receipts", &path).await.unwrap();
        assert_eq!(blob.content_type, "image/jpeg");
        assert_eq!(blob.bytes, vec![1, 2, 3]);

        store.remove("receipts", &path).await.unwrap();
        assert!(matches!(
            store.download("receipts", &path).await,
            Err(StoreError::NotFound { .. })
        ));
    }
}

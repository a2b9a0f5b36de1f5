//! # SQLite Store
//!
//! Local persistence for offline use. Rows are kept as JSON documents keyed by
//! `(collection, id)` and queried with the same in-process evaluation as the
//! memory store, so all three stores agree on filter semantics. Files go to a
//! separate `blobs` table.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{migrate::MigrateDatabase, Row as _, Sqlite, SqlitePool};
use tracing::info;

use super::error::StoreError;
use super::memory::resolve_embeds;
use super::query::{fill_insert_defaults, row_id, Query, Row};
use super::traits::{BlobObject, BlobStore, RowStore};

#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<SqlitePool>,
    public_base_url: String,
}

impl SqliteStore {
    /// Connect to `url`, creating the database and schema when missing
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
            public_base_url: String::new(),
        })
    }

    /// Open the database file at `path`, creating parent directories
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Config(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        info!("Opening SQLite store at {}", path.display());
        Self::new(&format!("sqlite:{}", path.display())).await
    }

    #[cfg(test)]
    pub async fn init_test() -> Result<Self, StoreError> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);
        Self::new(&db_url).await
    }

    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = base.into();
        self
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blobs (
                bucket TEXT NOT NULL,
                path TEXT NOT NULL,
                content_type TEXT NOT NULL,
                bytes BLOB NOT NULL,
                PRIMARY KEY (bucket, path)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// All rows of a collection in insertion order
    async fn load_collection(&self, collection: &str) -> Result<Vec<Row>, StoreError> {
        let rows = sqlx::query("SELECT body FROM records WHERE collection = ? ORDER BY rowid")
            .bind(collection)
            .fetch_all(&*self.pool)
            .await?;

        rows.iter()
            .map(|r| parse_body(&r.get::<String, _>("body")))
            .collect()
    }

    async fn load_row(&self, collection: &str, id: &str) -> Result<Option<Row>, StoreError> {
        let row = sqlx::query("SELECT body FROM records WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        row.map(|r| parse_body(&r.get::<String, _>("body")))
            .transpose()
    }
}

fn parse_body(body: &str) -> Result<Row, StoreError> {
    match serde_json::from_str(body)? {
        Value::Object(row) => Ok(row),
        _ => Err(StoreError::InvalidRow("stored body is not an object".to_string())),
    }
}

#[async_trait]
impl RowStore for SqliteStore {
    async fn select(&self, collection: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        let mut selected = query.apply(self.load_collection(collection).await?);

        let mut related: HashMap<String, Vec<Row>> = HashMap::new();
        for embed in &query.embeds {
            if !related.contains_key(&embed.collection) {
                let rows = self.load_collection(&embed.collection).await?;
                related.insert(embed.collection.clone(), rows);
            }
        }

        resolve_embeds(&mut selected, query, |collection, id| {
            related
                .get(collection)?
                .iter()
                .find(|row| row_id(row) == Some(id))
                .cloned()
        });
        Ok(selected)
    }

    async fn insert(&self, collection: &str, mut row: Row) -> Result<Row, StoreError> {
        fill_insert_defaults(&mut row);
        let id = row_id(&row)
            .ok_or_else(|| StoreError::InvalidRow("id must be a string".to_string()))?
            .to_string();

        sqlx::query("INSERT INTO records (collection, id, body) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(&id)
            .bind(serde_json::to_string(&row)?)
            .execute(&*self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, collection: &str, id: &str, patch: Row) -> Result<Row, StoreError> {
        let mut existing = self
            .load_row(collection, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        for (column, value) in patch {
            if column != "id" {
                existing.insert(column, value);
            }
        }

        sqlx::query("UPDATE records SET body = ? WHERE collection = ? AND id = ?")
            .bind(serde_json::to_string(&existing)?)
            .bind(collection)
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(existing)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM records WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for SqliteStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        sqlx::query("INSERT INTO blobs (bucket, path, content_type, bytes) VALUES (?, ?, ?, ?)")
            .bind(bucket)
            .bind(path)
            .bind(content_type)
            .bind(bytes)
            .execute(&*self.pool)
            .await?;
        Ok(path.to_string())
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<BlobObject, StoreError> {
        let row = sqlx::query("SELECT content_type, bytes FROM blobs WHERE bucket = ? AND path = ?")
            .bind(bucket)
            .bind(path)
            .fetch_optional(&*self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: bucket.to_string(),
                id: path.to_string(),
            })?;

        Ok(BlobObject {
            content_type: row.get("content_type"),
            bytes: row.get("bytes"),
        })
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM blobs WHERE bucket = ? AND path = ?")
            .bind(bucket)
            .bind(path)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, bucket, path)
    }
}

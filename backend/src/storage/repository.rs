//! Typed access to one collection of a [`RowStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreError;
use super::query::{from_row, from_rows, to_row, Query};
use super::traits::RowStore;

pub struct Repository<T> {
    store: Arc<dyn RowStore>,
    collection: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection,
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Repository<T> {
    pub fn new(store: Arc<dyn RowStore>, collection: &'static str) -> Self {
        Self {
            store,
            collection,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub async fn list(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        let rows = self.store.select(self.collection, query).await?;
        from_rows(rows)
    }

    /// First row matching the query, if any
    pub async fn find(&self, query: &Query) -> Result<Option<T>, StoreError> {
        let query = query.clone().limit(1);
        let mut rows = self.store.select(self.collection, &query).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        from_row(rows.swap_remove(0)).map(Some)
    }

    pub async fn get(&self, id: &str) -> Result<T, StoreError> {
        self.find(&Query::new().eq("id", id))
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: self.collection.to_string(),
                id: id.to_string(),
            })
    }

    pub async fn create<P>(&self, payload: &P) -> Result<T, StoreError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let row = to_row(payload)?;
        let stored = self.store.insert(self.collection, row).await?;
        from_row(stored)
    }

    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<T, StoreError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let patch = to_row(patch)?;
        let stored = self.store.update(self.collection, id, patch).await?;
        from_row(stored)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(self.collection, id).await
    }
}

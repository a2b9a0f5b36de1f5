//! # Remote Store
//!
//! Talks to a hosted PostgREST database (`/rest/v1`) and its object storage
//! (`/storage/v1`). Queries are translated into PostgREST filter parameters:
//!
//! | query               | parameter                 |
//! |---------------------|---------------------------|
//! | `eq(col, v)`        | `col=eq.v`                |
//! | `gte` / `lte`       | `col=gte.v` / `col=lte.v` |
//! | `ilike(col, p)`     | `col=ilike.p`             |
//! | `contains(col, v)`  | `col=cs.{"v"}`            |
//! | `order(col, dir)`   | `order=col.asc,...`       |
//! | `embed(table, fk)`  | `select=*,table(*)`       |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::SortDirection;
use tracing::debug;

use super::error::StoreError;
use super::query::{FilterOp, Query, Row};
use super::traits::{check_object_path, BlobObject, BlobStore, RowStore};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

pub struct RestStore {
    base_url: String,
    client: Client,
}

impl RestStore {
    /// Build a client that sends `api_key` both as `apikey` and as a bearer token
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let key = header::HeaderValue::from_str(api_key)
            .map_err(|_| StoreError::Config("API key is not a valid header value".to_string()))?;
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| StoreError::Config("API key is not a valid header value".to_string()))?;

        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(header::AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn table_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    /// Object location under `bucket`; refuses paths that would resolve
    /// outside the bucket once the URL is parsed
    fn object_url(&self, bucket: &str, path: &str) -> Result<String, StoreError> {
        check_bucket(bucket)?;
        check_object_path(path)?;
        Ok(format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path))
    }

    /// Error statuses become [`StoreError::Server`]; `not_found` maps a 404
    /// or an empty single-object read to [`StoreError::NotFound`].
    async fn check(
        response: Response,
        not_found: impl FnOnce() -> StoreError,
    ) -> Result<Response, StoreError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::NOT_ACCEPTABLE {
            return Err(not_found());
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        not_found: impl FnOnce() -> StoreError,
    ) -> Result<T, StoreError> {
        let response = Self::check(response, not_found).await?;
        Ok(response.json().await?)
    }
}

fn check_bucket(bucket: &str) -> Result<(), StoreError> {
    check_object_path(bucket)?;
    if bucket.contains('/') {
        return Err(StoreError::InvalidLocation(format!("bucket {:?}", bucket)));
    }
    Ok(())
}

fn not_found(collection: &str, id: &str) -> impl FnOnce() -> StoreError {
    let (collection, id) = (collection.to_string(), id.to_string());
    move || StoreError::NotFound { collection, id }
}

/// Render a JSON value the way PostgREST expects it in a filter
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `{"a","b"}` array literal for `cs.` filters
fn array_literal(value: &Value) -> String {
    let quote = |v: &Value| match v {
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        other => other.to_string(),
    };
    let items: Vec<String> = match value {
        Value::Array(items) => items.iter().map(quote).collect(),
        single => vec![quote(single)],
    };
    format!("{{{}}}", items.join(","))
}

/// Translate a query into PostgREST URL parameters
pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut select = String::from("*");
    for embed in &query.embeds {
        select.push_str(&format!(",{}(*)", embed.collection));
    }
    let mut params = vec![("select".to_string(), select)];

    for filter in &query.filters {
        let value = match &filter.op {
            FilterOp::Eq(v) => format!("eq.{}", literal(v)),
            FilterOp::Gte(v) => format!("gte.{}", literal(v)),
            FilterOp::Lte(v) => format!("lte.{}", literal(v)),
            FilterOp::ILike(pattern) => format!("ilike.{}", pattern),
            FilterOp::Contains(v) => format!("cs.{}", array_literal(v)),
        };
        params.push((filter.column.clone(), value));
    }

    if !query.order.is_empty() {
        let order: Vec<String> = query
            .order
            .iter()
            .map(|o| {
                let direction = match o.direction {
                    SortDirection::Asc => "asc",
                    SortDirection::Desc => "desc",
                };
                format!("{}.{}", o.column, direction)
            })
            .collect();
        params.push(("order".to_string(), order.join(",")));
    }

    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

#[async_trait]
impl RowStore for RestStore {
    async fn select(&self, collection: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        let params = query_params(query);
        debug!("GET {} {:?}", collection, params);

        let response = self
            .client
            .get(self.table_url(collection))
            .query(&params)
            .send()
            .await?;
        Self::handle_response(response, not_found(collection, "*")).await
    }

    async fn insert(&self, collection: &str, row: Row) -> Result<Row, StoreError> {
        let response = self
            .client
            .post(self.table_url(collection))
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(&row)
            .send()
            .await?;
        Self::handle_response(response, not_found(collection, "*")).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Row) -> Result<Row, StoreError> {
        let response = self
            .client
            .patch(self.table_url(collection))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(&patch)
            .send()
            .await?;
        Self::handle_response(response, not_found(collection, id)).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.table_url(collection))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        // PostgREST answers 204 whether or not a row matched
        Self::check(response, || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
        .await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for RestStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let response = self
            .client
            .post(self.object_url(bucket, path)?)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        Self::check(response, not_found(bucket, path)).await?;
        Ok(path.to_string())
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<BlobObject, StoreError> {
        let response = self.client.get(self.object_url(bucket, path)?).send().await?;
        let response = Self::check(response, not_found(bucket, path)).await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(BlobObject {
            content_type,
            bytes,
        })
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StoreError> {
        check_bucket(bucket)?;
        check_object_path(path)?;
        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{}", self.base_url, bucket))
            .json(&serde_json::json!({ "prefixes": [path] }))
            .send()
            .await?;
        Self::check(response, not_found(bucket, path)).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, path)
    }
}

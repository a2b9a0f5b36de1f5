//! # Row Queries
//!
//! A small query model shared by every store: equality, range, pattern and
//! array-containment filters, ordering, a row limit, and embedded lookups of
//! a related collection by foreign key.
//!
//! Local stores evaluate queries in process with [`Query::apply`]; the remote
//! store translates the same model into PostgREST parameters.

use std::cmp::Ordering;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::SortDirection;

use super::error::StoreError;

/// A stored row: a JSON object keyed by column name
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq(Value),
    Gte(Value),
    Lte(Value),
    /// Case-insensitive SQL `LIKE`: `%` matches any run, `_` one character
    ILike(String),
    /// Array column holds the value (or every element of an array value)
    Contains(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// Attach the row of `collection` whose id equals this row's `foreign_key`,
/// under a key named after the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub collection: String,
    pub foreign_key: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
    pub limit: Option<usize>,
    pub embeds: Vec<Embed>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    fn filter(mut self, column: &str, op: FilterOp) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
        });
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Eq(value.into()))
    }

    pub fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Gte(value.into()))
    }

    pub fn lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Lte(value.into()))
    }

    pub fn ilike(self, column: &str, pattern: impl Into<String>) -> Self {
        self.filter(column, FilterOp::ILike(pattern.into()))
    }

    pub fn contains(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Contains(value.into()))
    }

    pub fn order(mut self, column: &str, direction: SortDirection) -> Self {
        self.order.push(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn embed(mut self, collection: &str, foreign_key: &str) -> Self {
        self.embeds.push(Embed {
            collection: collection.to_string(),
            foreign_key: foreign_key.to_string(),
        });
        self
    }

    /// True when every filter accepts the row
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|filter| filter.matches(row))
    }

    /// Filter, order and limit rows in memory. Embeds are left to the store.
    pub fn apply(&self, rows: impl IntoIterator<Item = Row>) -> Vec<Row> {
        let mut selected: Vec<Row> = rows.into_iter().filter(|row| self.matches(row)).collect();

        if !self.order.is_empty() {
            selected.sort_by(|a, b| {
                self.order
                    .iter()
                    .map(|order| order_rows(a, b, order))
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

impl Filter {
    /// Missing and null columns never match
    pub fn matches(&self, row: &Row) -> bool {
        let Some(value) = row.get(&self.column).filter(|v| !v.is_null()) else {
            return false;
        };

        match &self.op {
            FilterOp::Eq(expected) => values_equal(value, expected),
            FilterOp::Gte(bound) => matches!(
                compare_values(value, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lte(bound) => matches!(
                compare_values(value, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOp::ILike(pattern) => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => return false,
                };
                like_match(&text.to_lowercase(), &pattern.to_lowercase())
            }
            FilterOp::Contains(needle) => {
                let Value::Array(items) = value else {
                    return false;
                };
                let contains = |wanted: &Value| items.iter().any(|item| values_equal(item, wanted));
                match needle {
                    Value::Array(wanted) => wanted.iter().all(contains),
                    single => contains(single),
                }
            }
        }
    }
}

/// Numbers compare by value so `5` equals `5.0`
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

// Nulls sort last ascending and first descending, as Postgres does.
fn order_rows(a: &Row, b: &Row, order: &OrderBy) -> Ordering {
    let left = a.get(&order.column).filter(|v| !v.is_null());
    let right = b.get(&order.column).filter(|v| !v.is_null());

    let ordering = match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
    };

    match order.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

/// Serialize a payload into a row. Only JSON objects are rows.
pub fn to_row<T: Serialize + ?Sized>(value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(row) => Ok(row),
        other => Err(StoreError::InvalidRow(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(from_row).collect()
}

/// Fill the columns a database would default on insert: a v4 `id`, and
/// `created_at`/`updated_at` timestamps. Columns already present are kept.
pub fn fill_insert_defaults(row: &mut Row) {
    let now = Value::String(Utc::now().to_rfc3339());
    row.entry("id")
        .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
    row.entry("created_at").or_insert_with(|| now.clone());
    row.entry("updated_at").or_insert(now);
}

pub fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

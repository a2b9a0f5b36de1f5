//! # Storage Module
//!
//! Row and blob persistence behind the [`RowStore`] / [`BlobStore`] traits.
//!
//! - [`MemoryStore`]: process-local, for tests and demos
//! - [`SqliteStore`]: a local SQLite file via sqlx
//! - [`RestStore`]: a hosted PostgREST database with object storage

pub mod error;
pub mod memory;
pub mod query;
pub mod repository;
pub mod rest;
pub mod sqlite;
pub mod traits;

pub use error::{QueryResult, StoreError};
pub use memory::MemoryStore;
pub use query::{from_row, from_rows, to_row, Filter, FilterOp, Query, Row};
pub use repository::Repository;
pub use rest::RestStore;
pub use sqlite::SqliteStore;
pub use traits::{check_object_path, BlobObject, BlobStore, RowStore};

/// Collection names shared by every store
pub mod collections {
    pub const USERS: &str = "users";
    pub const ANIMALS: &str = "animals";
    pub const WEIGHT_RECORDS: &str = "weight_records";
    pub const HEALTH_RECORDS: &str = "health_records";
    pub const JOURNAL_ENTRIES: &str = "journal_entries";
    pub const EXPENSES: &str = "expenses";
    pub const AET_SKILLS: &str = "aet_skills";
    pub const USER_SKILL_PROGRESS: &str = "user_skill_progress";
}

//! # Domain Module
//!
//! Per-entity data-access services. Each service owns typed repositories over
//! the injected store and returns every outcome as a [`QueryResult`] rather
//! than an error.
//!
//! [`QueryResult`]: crate::storage::QueryResult

pub mod animal_service;
pub mod attachment_service;
pub mod dashboard_service;
pub mod debounce;
pub mod expense_service;
pub mod journal_service;
pub mod record_service;
pub mod skill_service;
pub mod user_service;

pub use animal_service::AnimalService;
pub use attachment_service::{AttachmentService, StoredAttachment, PHOTOS_BUCKET, RECEIPTS_BUCKET};
pub use dashboard_service::DashboardService;
pub use debounce::{debounce, Debouncer};
pub use expense_service::ExpenseService;
pub use journal_service::JournalService;
pub use record_service::RecordService;
pub use skill_service::SkillService;
pub use user_service::UserService;

//! # ShowTrack Backend
//!
//! Record keeping for livestock projects: animals and their weight and health
//! records, activity journals, expenses, and AET skill hours.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API under /api)
//!     ↓
//! Domain Layer (per-entity data-access services)
//!     ↓
//! Storage Layer (memory, SQLite, or remote PostgREST store)
//! ```
//!
//! One store is opened at start-up from [`BackendConfig`] and injected into
//! every service.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{http::Method, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::{BackendConfig, ConfigError, StoreSettings};
use domain::{
    AnimalService, AttachmentService, DashboardService, ExpenseService, JournalService,
    RecordService, SkillService, UserService,
};
use io::rest;
use storage::{BlobStore, MemoryStore, RestStore, RowStore, SqliteStore};

/// Prefix local stores use for attachment URLs; served by the attachment API
pub const LOCAL_ATTACHMENT_BASE: &str = "/api/attachments";

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub animal_service: AnimalService,
    pub record_service: RecordService,
    pub journal_service: JournalService,
    pub expense_service: ExpenseService,
    pub skill_service: SkillService,
    pub dashboard_service: DashboardService,
    pub attachment_service: AttachmentService,
}

impl AppState {
    /// Wire every service to the given stores
    pub fn new(rows: Arc<dyn RowStore>, blobs: Arc<dyn BlobStore>) -> Self {
        let animal_service = AnimalService::new(Arc::clone(&rows));
        let expense_service = ExpenseService::new(Arc::clone(&rows));
        let journal_service = JournalService::new(Arc::clone(&rows));
        let skill_service = SkillService::new(Arc::clone(&rows));
        let dashboard_service = DashboardService::new(
            animal_service.clone(),
            expense_service.clone(),
            journal_service.clone(),
            skill_service.clone(),
        );

        Self {
            user_service: UserService::new(Arc::clone(&rows)),
            record_service: RecordService::new(rows),
            animal_service,
            journal_service,
            expense_service,
            skill_service,
            dashboard_service,
            attachment_service: AttachmentService::new(blobs),
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory() -> Self {
        let (rows, blobs) = both(MemoryStore::new().with_public_base_url(LOCAL_ATTACHMENT_BASE));
        Self::new(rows, blobs)
    }
}

/// Row and blob storage handed to the services
pub type Stores = (Arc<dyn RowStore>, Arc<dyn BlobStore>);

fn both<S: RowStore + BlobStore + 'static>(store: S) -> Stores {
    let store = Arc::new(store);
    (store.clone(), store)
}

/// Open the configured store as both row and blob storage
pub async fn open_store(settings: &StoreSettings) -> Result<Stores> {
    info!("Setting up {} store", settings.kind());
    let stores = match settings {
        StoreSettings::Memory => {
            both(MemoryStore::new().with_public_base_url(LOCAL_ATTACHMENT_BASE))
        }
        StoreSettings::Sqlite { path } => both(
            SqliteStore::open(path)
                .await?
                .with_public_base_url(LOCAL_ATTACHMENT_BASE),
        ),
        StoreSettings::Remote {
            url,
            api_key,
            timeout_secs,
        } => both(RestStore::new(
            url,
            api_key,
            Duration::from_secs(*timeout_secs),
        )?),
    };
    Ok(stores)
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &BackendConfig) -> Result<AppState> {
    let (rows, blobs) = open_store(&config.store).await?;

    info!("Setting up application state");
    Ok(AppState::new(rows, blobs))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(rest::user_apis::router())
        .merge(rest::animal_apis::router())
        .merge(rest::record_apis::router())
        .merge(rest::journal_apis::router())
        .merge(rest::expense_apis::router())
        .merge(rest::skill_apis::router())
        .merge(rest::attachment_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

//! Data storage layer
//!
//! Provides database services for the application:
//! - `sqlite` - Transactional database for persistent deployments
//! - `memory` - In-memory backend for tests and ephemeral runs
//! - `types` - Shared row types across all backends
//! - `traits` - Repository trait for multi-backend support
//! - `error` - Unified error type for all backends

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export backend-specific services
pub use memory::MemoryService;
pub use sqlite::SqliteService;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::TransactionalBackend;
use error::DataError;
use traits::TransactionalRepository;

/// Transactional database service with pluggable backends
pub enum TransactionalService {
    Sqlite(Arc<SqliteService>),
    Memory(Arc<MemoryService>),
}

impl TransactionalService {
    /// Initialize the configured backend
    pub async fn init(backend: TransactionalBackend, db_path: &Path) -> Result<Self, DataError> {
        match backend {
            TransactionalBackend::Sqlite => {
                let service = SqliteService::init(db_path).await?;
                Ok(Self::Sqlite(Arc::new(service)))
            }
            TransactionalBackend::Memory => {
                tracing::warn!("Using in-memory database backend; data will not persist");
                Ok(Self::Memory(Arc::new(MemoryService::new())))
            }
        }
    }

    /// Get the repository interface for this backend
    pub fn repository(&self) -> Box<dyn TransactionalRepository + Send + Sync> {
        match self {
            Self::Sqlite(service) => Box::new(Arc::clone(service)),
            Self::Memory(service) => Box::new(Arc::clone(service)),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Memory(_) => "memory",
        }
    }

    pub async fn checkpoint(&self) -> Result<(), DataError> {
        match self {
            Self::Sqlite(service) => service.checkpoint().await.map_err(Into::into),
            Self::Memory(_) => Ok(()),
        }
    }

    pub async fn close(&self) {
        if let Self::Sqlite(service) = self {
            service.close().await;
        }
    }

    /// Start the periodic WAL checkpoint task (SQLite only)
    pub fn start_checkpoint_task(
        &self,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        match self {
            Self::Sqlite(service) => Some(service.start_checkpoint_task(shutdown_rx)),
            Self::Memory(_) => None,
        }
    }
}

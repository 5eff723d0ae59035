//! Spaces: saved content blobs that can be marked as shared.
//!
//! Sharing only records who a space was shared with; no access checks are
//! applied on read.

mod postgres_store;
mod store;
mod types;

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::postgres::PostgresPool;

pub use postgres_store::PostgresSpaceStore;
pub use store::{MemorySpaceStore, SpaceStore};
pub use types::{
    SaveSpaceRequest, ShareSpaceRequest, Space, SpaceError, SpaceListResponse, SpaceResult,
};

/// Create a space store based on configuration
pub fn create_space_store(
    settings: &StorageConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Arc<dyn SpaceStore> {
    match (settings.backend.as_str(), postgres_pool) {
        ("postgres", Some(pool)) => {
            tracing::info!(backend = "postgres", "Creating PostgreSQL space store");
            Arc::new(PostgresSpaceStore::new(pool.pool().clone()))
        }
        ("postgres", None) => {
            tracing::warn!(
                "PostgreSQL backend requested but no pool provided, falling back to memory"
            );
            Arc::new(MemorySpaceStore::new())
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory space store");
            Arc::new(MemorySpaceStore::new())
        }
    }
}

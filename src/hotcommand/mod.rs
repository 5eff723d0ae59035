//! Hot commands: saved, parameterized query templates.
//!
//! This module provides:
//! - Hot command records with `{{parameter}}` placeholders in their query text
//! - Storage backends (in-memory and PostgreSQL) behind `HotCommandStore`
//! - The parameter substitution engine used to render a command
//!
//! # Example
//!
//! ```ignore
//! let store = create_hot_command_store(&settings.storage, None);
//!
//! let command = store.create(request).await?;
//!
//! let mut values = ValueMap::new();
//! values.insert("region".into(), json!("EMEA"));
//!
//! let rendered = command.render(&values)?;
//! ```

mod postgres_store;
mod store;
mod substitution;
mod types;

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::postgres::PostgresPool;

pub use postgres_store::PostgresHotCommandStore;
pub use store::{HotCommandStore, MemoryHotCommandStore};
pub use substitution::{substitute_parameters, MISSING_VALUE_MARKER};
pub use types::{
    validate_command_name, validate_parameters, CreateHotCommandRequest, HotCommand,
    HotCommandError, HotCommandFilter, HotCommandListResponse, HotCommandResult,
    ParameterDeclaration, QueryType, RenderRequest, RenderedCommand, SubstitutionError,
    UpdateHotCommandRequest, ValueMap,
};

/// Create a hot command store based on configuration.
///
/// `"postgres"` needs a pool; without one this falls back to memory.
pub fn create_hot_command_store(
    settings: &StorageConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Arc<dyn HotCommandStore> {
    match (settings.backend.as_str(), postgres_pool) {
        ("postgres", Some(pool)) => {
            tracing::info!(backend = "postgres", "Creating PostgreSQL hot command store");
            Arc::new(PostgresHotCommandStore::new(pool.pool().clone()))
        }
        ("postgres", None) => {
            tracing::warn!(
                "PostgreSQL backend requested but no pool provided, falling back to memory"
            );
            Arc::new(MemoryHotCommandStore::new())
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory hot command store");
            Arc::new(MemoryHotCommandStore::new())
        }
    }
}

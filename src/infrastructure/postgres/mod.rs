//! PostgreSQL persistence module.
//!
//! Provides connection pooling and embedded migrations for the PostgreSQL
//! storage backend.

pub mod pool;

pub use pool::{mask_database_url, PostgresPool, PostgresPoolError};

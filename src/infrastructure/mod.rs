//! Infrastructure layer modules
//!
//! This module contains shared infrastructure components:
//! - `postgres`: PostgreSQL connection pool and schema migrations

pub mod postgres;

//! Space types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Space-specific error type
#[derive(Debug, Error)]
pub enum SpaceError {
    #[error("Space not found: {user_id}/{space_name}")]
    NotFound { user_id: String, space_name: String },

    #[error("Invalid space: {0}")]
    InvalidSpace(String),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
}

impl SpaceError {
    pub fn not_found(user_id: &str, space_name: &str) -> Self {
        SpaceError::NotFound {
            user_id: user_id.to_string(),
            space_name: space_name.to_string(),
        }
    }
}

/// Result type for space operations
pub type SpaceResult<T> = Result<T, SpaceError>;

/// A saved content blob owned by one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Space {
    pub id: i64,
    pub user_id: String,
    pub space_name: String,
    pub content: String,

    /// Free-form MIME-like tag supplied by the client
    pub content_type: String,

    pub is_shared: bool,

    /// Free-form recipient description; not interpreted
    pub shared_with: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to save (create or overwrite) a space
#[derive(Debug, Clone, Deserialize)]
pub struct SaveSpaceRequest {
    pub user_id: String,
    pub space_name: String,
    pub content: String,
    pub content_type: String,
}

impl SaveSpaceRequest {
    pub fn validate(&self) -> SpaceResult<()> {
        if self.user_id.is_empty() {
            return Err(SpaceError::InvalidSpace(
                "user_id must not be empty".to_string(),
            ));
        }
        if self.space_name.is_empty() || self.space_name.len() > 256 {
            return Err(SpaceError::InvalidSpace(
                "space_name must be 1-256 characters".to_string(),
            ));
        }
        if self.content_type.is_empty() {
            return Err(SpaceError::InvalidSpace(
                "content_type must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request to mark a space as shared
#[derive(Debug, Clone, Deserialize)]
pub struct ShareSpaceRequest {
    pub user_id: String,
    pub space_name: String,
    pub shared_with: String,
}

/// Response for listing spaces
#[derive(Debug, Serialize)]
pub struct SpaceListResponse {
    pub spaces: Vec<Space>,
    pub total: usize,
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::hotcommand::{HotCommandError, SubstitutionError};
use crate::space::SpaceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    MissingParameter(#[from] SubstitutionError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<HotCommandError> for AppError {
    fn from(err: HotCommandError) -> Self {
        match err {
            HotCommandError::NotFound(_) => AppError::NotFound(err.to_string()),
            HotCommandError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            HotCommandError::InvalidCommandName(_)
            | HotCommandError::InvalidCommand(_)
            | HotCommandError::Inactive(_) => AppError::Validation(err.to_string()),
            HotCommandError::Substitution(e) => AppError::MissingParameter(e),
            HotCommandError::Postgres(e) => AppError::Database(e.to_string()),
            HotCommandError::Serialization(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<SpaceError> for AppError {
    fn from(err: SpaceError) -> Self {
        match err {
            SpaceError::NotFound { .. } => AppError::NotFound(err.to_string()),
            SpaceError::InvalidSpace(_) => AppError::Validation(err.to_string()),
            SpaceError::Postgres(e) => AppError::Database(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl AppError {
    /// HTTP status and stable error code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::MissingParameter(_) => (StatusCode::BAD_REQUEST, "MISSING_PARAMETER"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Database(_) => (StatusCode::SERVICE_UNAVAILABLE, "DATABASE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let log_message = self.to_string();

        // Server-side details are hidden from clients in production
        let client_message = match &self {
            AppError::Database(_) if is_production() => {
                "Service temporarily unavailable".to_string()
            }
            AppError::Internal(_) if is_production() => "Internal server error".to_string(),
            _ => log_message.clone(),
        };

        if status.is_server_error() {
            tracing::error!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API error"
            );
        } else {
            tracing::warn!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

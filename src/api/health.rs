use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: StorageHealth,
}

#[derive(Debug, Serialize)]
pub struct StorageHealth {
    pub backend: String,
    pub reachable: bool,
}

/// GET /health - Liveness plus storage reachability
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = match &state.postgres {
        Some(pool) => match pool.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "PostgreSQL health check failed");
                false
            }
        },
        None => true,
    };

    let (status_code, status) = if reachable {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: StorageHealth {
                backend: state.hot_commands.backend_type().to_string(),
                reachable,
            },
        }),
    )
}

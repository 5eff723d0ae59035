//! Space endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::hotcommand::PingResponse;
use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::space::{SaveSpaceRequest, ShareSpaceRequest, Space, SpaceListResponse};

#[derive(Debug, Deserialize)]
pub struct SpaceListQuery {
    pub user_id: Option<String>,
}

/// GET /api/spaces/ping
pub async fn spaces_ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "Spaces router connected!".to_string(),
    })
}

/// POST /api/spaces - Save a space
#[tracing::instrument(
    name = "http.save_space",
    skip(state, request),
    fields(user_id = %request.user_id, space_name = %request.space_name)
)]
pub async fn save_space(
    State(state): State<AppState>,
    Json(request): Json<SaveSpaceRequest>,
) -> Result<Json<Space>> {
    Ok(Json(state.spaces.save(request).await?))
}

/// GET /api/spaces?user_id= - List a user's spaces
#[tracing::instrument(name = "http.list_spaces", skip(state))]
pub async fn list_spaces(
    State(state): State<AppState>,
    Query(query): Query<SpaceListQuery>,
) -> Result<Json<SpaceListResponse>> {
    let user_id = query
        .user_id
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("user_id query parameter is required".to_string()))?;

    let spaces = state.spaces.list(&user_id).await?;
    let total = spaces.len();

    Ok(Json(SpaceListResponse { spaces, total }))
}

/// GET /api/spaces/{user_id}/{space_name}
#[tracing::instrument(name = "http.get_space", skip(state))]
pub async fn get_space(
    State(state): State<AppState>,
    Path((user_id, space_name)): Path<(String, String)>,
) -> Result<Json<Space>> {
    Ok(Json(state.spaces.get(&user_id, &space_name).await?))
}

/// DELETE /api/spaces/{user_id}/{space_name}
#[tracing::instrument(name = "http.delete_space", skip(state))]
pub async fn delete_space(
    State(state): State<AppState>,
    Path((user_id, space_name)): Path<(String, String)>,
) -> Result<StatusCode> {
    state.spaces.delete(&user_id, &space_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/spaces/share - Mark a space as shared
#[tracing::instrument(
    name = "http.share_space",
    skip(state, request),
    fields(user_id = %request.user_id, space_name = %request.space_name)
)]
pub async fn share_space(
    State(state): State<AppState>,
    Json(request): Json<ShareSpaceRequest>,
) -> Result<Json<Space>> {
    Ok(Json(state.spaces.share(request).await?))
}

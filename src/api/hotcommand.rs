//! Hot command endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::hotcommand::{
    CreateHotCommandRequest, HotCommand, HotCommandError, HotCommandFilter,
    HotCommandListResponse, RenderRequest, RenderedCommand, UpdateHotCommandRequest,
};
use crate::metrics::RenderMetrics;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: String,
}

/// GET /api/hotcommands/ping
pub async fn hotcommands_ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "Hot Commands router connected!".to_string(),
    })
}

/// POST /api/hotcommands - Create a new hot command
#[tracing::instrument(
    name = "http.create_hot_command",
    skip(state, request),
    fields(user_id = %request.user_id, command_name = %request.command_name)
)]
pub async fn create_hot_command(
    State(state): State<AppState>,
    Json(request): Json<CreateHotCommandRequest>,
) -> Result<(StatusCode, Json<HotCommand>)> {
    let created = state.hot_commands.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/hotcommands - List hot commands
#[tracing::instrument(name = "http.list_hot_commands", skip(state))]
pub async fn list_hot_commands(
    State(state): State<AppState>,
    Query(filter): Query<HotCommandFilter>,
) -> Result<Json<HotCommandListResponse>> {
    let commands = state.hot_commands.list(&filter).await?;
    let total = commands.len();

    Ok(Json(HotCommandListResponse { commands, total }))
}

/// GET /api/hotcommands/{id}
#[tracing::instrument(name = "http.get_hot_command", skip(state))]
pub async fn get_hot_command(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<HotCommand>> {
    Ok(Json(state.hot_commands.get(id).await?))
}

/// PUT /api/hotcommands/{id}
#[tracing::instrument(name = "http.update_hot_command", skip(state, request))]
pub async fn update_hot_command(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateHotCommandRequest>,
) -> Result<Json<HotCommand>> {
    Ok(Json(state.hot_commands.update(id, request).await?))
}

/// DELETE /api/hotcommands/{id} - Deactivate (soft delete)
#[tracing::instrument(name = "http.deactivate_hot_command", skip(state))]
pub async fn deactivate_hot_command(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.hot_commands.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/hotcommands/{id}/render - Substitute parameter values
#[tracing::instrument(name = "http.render_hot_command", skip(state, request))]
pub async fn render_hot_command(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderedCommand>> {
    let command = state.hot_commands.get(id).await?;

    match command.render(&request.values) {
        Ok(rendered) => {
            RenderMetrics::record_success(rendered.query_type.as_str(), rendered.query.len());
            Ok(Json(rendered))
        }
        Err(e) => {
            match &e {
                HotCommandError::Substitution(_) => RenderMetrics::record_missing_parameter(),
                HotCommandError::Inactive(_) => RenderMetrics::record_inactive(),
                _ => {}
            }
            Err(e.into())
        }
    }
}

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::health;
use super::hotcommand::{
    create_hot_command, deactivate_hot_command, get_hot_command, hotcommands_ping,
    list_hot_commands, render_hot_command, update_hot_command,
};
use super::metrics::prometheus_metrics;
use super::space::{delete_space, get_space, list_spaces, save_space, share_space, spaces_ping};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api",
            Router::new()
                // Hot commands
                .route("/hotcommands/ping", get(hotcommands_ping))
                .route(
                    "/hotcommands",
                    post(create_hot_command).get(list_hot_commands),
                )
                .route(
                    "/hotcommands/{id}",
                    get(get_hot_command)
                        .put(update_hot_command)
                        .delete(deactivate_hot_command),
                )
                .route("/hotcommands/{id}/render", post(render_hot_command))
                // Spaces
                .route("/spaces/ping", get(spaces_ping))
                .route("/spaces", post(save_space).get(list_spaces))
                .route("/spaces/share", post(share_space))
                .route(
                    "/spaces/{user_id}/{space_name}",
                    get(get_space).delete(delete_space),
                ),
        )
}

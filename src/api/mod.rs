//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod hotcommand;
mod metrics;
mod routes;
mod space;

pub use health::health;
pub use hotcommand::{
    create_hot_command, deactivate_hot_command, get_hot_command, hotcommands_ping,
    list_hot_commands, render_hot_command, update_hot_command, PingResponse,
};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use space::{delete_space, get_space, list_spaces, save_space, share_space, spaces_ping};

// Infrastructure layer (shared components)
pub mod infrastructure;

pub use infrastructure::postgres;

// Supporting modules
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain layer (business logic)
pub mod hotcommand;
pub mod space;

// Application layer
pub mod api;
pub mod server;

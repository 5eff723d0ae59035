mod settings;

pub use settings::{
    DatabaseConfig, LoggingConfig, OtelConfig, ServerConfig, Settings, StorageConfig,
};

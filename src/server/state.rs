use std::sync::Arc;

use crate::config::Settings;
use crate::hotcommand::{create_hot_command_store, HotCommandStore};
use crate::metrics::STORAGE_BACKEND;
use crate::postgres::PostgresPool;
use crate::space::{create_space_store, SpaceStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub hot_commands: Arc<dyn HotCommandStore>,
    pub spaces: Arc<dyn SpaceStore>,
    pub postgres: Option<Arc<PostgresPool>>,
}

impl AppState {
    pub fn new(settings: Settings, postgres: Option<Arc<PostgresPool>>) -> Self {
        let hot_commands = create_hot_command_store(&settings.storage, postgres.clone());
        let spaces = create_space_store(&settings.storage, postgres.clone());

        STORAGE_BACKEND
            .with_label_values(&[hot_commands.backend_type()])
            .set(1);

        Self {
            settings: Arc::new(settings),
            hot_commands,
            spaces,
            postgres,
        }
    }

    /// State backed by in-memory stores, independent of configured backend
    pub fn in_memory(settings: Settings) -> Self {
        Self::new(settings, None)
    }
}

//! Hot command storage trait and in-memory backend

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::metrics::COMMANDS_CREATED_TOTAL;

use super::types::{
    CreateHotCommandRequest, HotCommand, HotCommandError, HotCommandFilter, HotCommandResult,
    UpdateHotCommandRequest,
};

/// Storage abstraction for hot commands.
///
/// Implementations must reject a second active command with the same
/// `(user_id, command_name)` pair.
#[async_trait]
pub trait HotCommandStore: Send + Sync {
    /// Backend type identifier
    fn backend_type(&self) -> &'static str;

    /// Validate and store a new command
    async fn create(&self, request: CreateHotCommandRequest) -> HotCommandResult<HotCommand>;

    /// Get a command by ID (active or not)
    async fn get(&self, id: i64) -> HotCommandResult<HotCommand>;

    /// List commands matching `filter`, ordered by ID
    async fn list(&self, filter: &HotCommandFilter) -> HotCommandResult<Vec<HotCommand>>;

    /// Apply a partial update
    async fn update(&self, id: i64, updates: UpdateHotCommandRequest)
        -> HotCommandResult<HotCommand>;

    /// Soft-delete a command
    async fn deactivate(&self, id: i64) -> HotCommandResult<()>;
}

/// In-memory hot command storage
pub struct MemoryHotCommandStore {
    commands: DashMap<i64, HotCommand>,
    /// (user_id, command_name) -> id, active commands only
    active_names: DashMap<(String, String), i64>,
    next_id: AtomicI64,
}

impl Default for MemoryHotCommandStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHotCommandStore {
    pub fn new() -> Self {
        Self {
            commands: DashMap::new(),
            active_names: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl HotCommandStore for MemoryHotCommandStore {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, request: CreateHotCommandRequest) -> HotCommandResult<HotCommand> {
        request.validate()?;

        let key = (request.user_id.clone(), request.command_name.clone());
        let slot = match self.active_names.entry(key) {
            Entry::Occupied(_) => {
                return Err(HotCommandError::AlreadyExists(request.command_name));
            }
            Entry::Vacant(slot) => slot,
        };

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let command = request.into_command(id);
        // Record the command before releasing the name slot so the two maps agree
        self.commands.insert(id, command.clone());
        slot.insert(id);
        COMMANDS_CREATED_TOTAL.inc();

        tracing::debug!(
            id = id,
            user_id = %command.user_id,
            command_name = %command.command_name,
            "Hot command created"
        );

        Ok(command)
    }

    async fn get(&self, id: i64) -> HotCommandResult<HotCommand> {
        self.commands
            .get(&id)
            .map(|c| c.clone())
            .ok_or(HotCommandError::NotFound(id))
    }

    async fn list(&self, filter: &HotCommandFilter) -> HotCommandResult<Vec<HotCommand>> {
        let mut commands: Vec<HotCommand> = self
            .commands
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        commands.sort_by_key(|c| c.id);
        Ok(commands)
    }

    async fn update(
        &self,
        id: i64,
        updates: UpdateHotCommandRequest,
    ) -> HotCommandResult<HotCommand> {
        let mut entry = self
            .commands
            .get_mut(&id)
            .ok_or(HotCommandError::NotFound(id))?;

        let mut command = entry.clone();
        updates.apply_to(&mut command)?;
        *entry = command.clone();

        Ok(command)
    }

    async fn deactivate(&self, id: i64) -> HotCommandResult<()> {
        // The `commands` guard must be dropped before touching `active_names`;
        // `create` takes the two maps in the opposite order.
        let freed_name = {
            let mut entry = self
                .commands
                .get_mut(&id)
                .ok_or(HotCommandError::NotFound(id))?;

            if !entry.is_active {
                return Ok(());
            }
            entry.is_active = false;
            entry.updated_at = chrono::Utc::now();
            (entry.user_id.clone(), entry.command_name.clone())
        };

        self.active_names.remove_if(&freed_name, |_, active_id| *active_id == id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotcommand::QueryType;
    use serde_json::json;

    fn request(user_id: &str, command_name: &str) -> CreateHotCommandRequest {
        serde_json::from_value(json!({
            "user_id": user_id,
            "command_name": command_name,
            "query_text": "SELECT * FROM t WHERE region = '{{region}}'",
            "query_type": "direct_sql",
            "domain": "sales",
            "parameters": [{"name": "region", "type": "string", "required": true}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_store_create_and_get() {
        let store = MemoryHotCommandStore::new();

        let created = store.create(request("alice", "by_region")).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(created.is_active);

        let retrieved = store.get(created.id).await.unwrap();
        assert_eq!(retrieved.command_name, "by_region");
        assert_eq!(retrieved.parameters.len(), 1);
    }

    #[tokio::test]
    async fn test_store_create_duplicate() {
        let store = MemoryHotCommandStore::new();

        store.create(request("alice", "by_region")).await.unwrap();
        assert!(matches!(
            store.create(request("alice", "by_region")).await,
            Err(HotCommandError::AlreadyExists(_))
        ));

        // Same name for a different user is fine
        assert!(store.create(request("bob", "by_region")).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_rejects_invalid_name() {
        let store = MemoryHotCommandStore::new();
        assert!(matches!(
            store.create(request("alice", "9lives")).await,
            Err(HotCommandError::InvalidCommandName(_))
        ));
    }

    #[tokio::test]
    async fn test_store_update() {
        let store = MemoryHotCommandStore::new();
        let created = store.create(request("alice", "by_region")).await.unwrap();

        let updates = UpdateHotCommandRequest {
            query_type: Some(QueryType::Nl2sql),
            query_text: Some("regional sales for {{region}}".to_string()),
            ..Default::default()
        };

        let updated = store.update(created.id, updates).await.unwrap();
        assert_eq!(updated.query_type, QueryType::Nl2sql);
        assert_eq!(store.get(created.id).await.unwrap().query_text, updated.query_text);

        assert!(matches!(
            store.update(99, UpdateHotCommandRequest::default()).await,
            Err(HotCommandError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_store_deactivate_frees_name() {
        let store = MemoryHotCommandStore::new();
        let created = store.create(request("alice", "by_region")).await.unwrap();

        store.deactivate(created.id).await.unwrap();
        assert!(!store.get(created.id).await.unwrap().is_active);
        assert!(store.list(&HotCommandFilter::default()).await.unwrap().is_empty());

        let recreated = store.create(request("alice", "by_region")).await.unwrap();
        assert_eq!(recreated.id, 2);
    }

    #[test]
    fn test_store_list_filtered() {
        let store = MemoryHotCommandStore::new();

        tokio_test::block_on(async {
            for name in ["a_cmd", "b_cmd", "c_cmd"] {
                store.create(request("alice", name)).await.unwrap();
            }
            store.create(request("bob", "d_cmd")).await.unwrap();

            let filter = HotCommandFilter {
                user_id: Some("alice".to_string()),
                ..Default::default()
            };
            let list = store.list(&filter).await.unwrap();
            assert_eq!(list.len(), 3);
            assert!(list.windows(2).all(|w| w[0].id < w[1].id));

            let all = store.list(&HotCommandFilter::default()).await.unwrap();
            assert_eq!(all.len(), 4);
        });
    }

    #[test]
    fn test_concurrent_create_and_deactivate() {
        let store = std::sync::Arc::new(MemoryHotCommandStore::new());

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                std::thread::spawn(move || {
                    tokio_test::block_on(async {
                        for i in 0..500 {
                            let name = format!("cmd_{}", i % 4);
                            let user = format!("user{}", worker % 2);
                            if let Ok(created) = store.create(request(&user, &name)).await {
                                store.deactivate(created.id).await.unwrap();
                            }
                        }
                    })
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        // Every command was deactivated, so every name is free again
        assert!(store.active_names.is_empty());
        assert!(tokio_test::block_on(store.list(&HotCommandFilter::default()))
            .unwrap()
            .is_empty());
    }
}

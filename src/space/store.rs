//! Space storage trait and in-memory backend

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::metrics::{SPACES_SAVED_TOTAL, SPACES_SHARED_TOTAL};

use super::types::{SaveSpaceRequest, ShareSpaceRequest, Space, SpaceError, SpaceResult};

/// Storage abstraction for spaces, keyed by `(user_id, space_name)`
#[async_trait]
pub trait SpaceStore: Send + Sync {
    /// Backend type identifier
    fn backend_type(&self) -> &'static str;

    /// Create a space, or overwrite content of an existing one.
    ///
    /// Overwriting keeps the ID, sharing state and `created_at`.
    async fn save(&self, request: SaveSpaceRequest) -> SpaceResult<Space>;

    async fn get(&self, user_id: &str, space_name: &str) -> SpaceResult<Space>;

    /// List a user's spaces ordered by ID
    async fn list(&self, user_id: &str) -> SpaceResult<Vec<Space>>;

    /// Mark a space as shared
    async fn share(&self, request: ShareSpaceRequest) -> SpaceResult<Space>;

    async fn delete(&self, user_id: &str, space_name: &str) -> SpaceResult<()>;
}

/// In-memory space storage
pub struct MemorySpaceStore {
    spaces: DashMap<(String, String), Space>,
    next_id: AtomicI64,
}

impl Default for MemorySpaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySpaceStore {
    pub fn new() -> Self {
        Self {
            spaces: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn key(user_id: &str, space_name: &str) -> (String, String) {
        (user_id.to_string(), space_name.to_string())
    }
}

#[async_trait]
impl SpaceStore for MemorySpaceStore {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn save(&self, request: SaveSpaceRequest) -> SpaceResult<Space> {
        request.validate()?;

        let now = Utc::now();
        let key = Self::key(&request.user_id, &request.space_name);

        let space = match self.spaces.entry(key) {
            Entry::Occupied(mut entry) => {
                let space = entry.get_mut();
                space.content = request.content;
                space.content_type = request.content_type;
                space.updated_at = now;
                space.clone()
            }
            Entry::Vacant(entry) => {
                let space = Space {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    user_id: request.user_id,
                    space_name: request.space_name,
                    content: request.content,
                    content_type: request.content_type,
                    is_shared: false,
                    shared_with: None,
                    created_at: now,
                    updated_at: now,
                };
                entry.insert(space.clone());
                space
            }
        };

        SPACES_SAVED_TOTAL.inc();
        tracing::debug!(
            id = space.id,
            user_id = %space.user_id,
            space_name = %space.space_name,
            "Space saved"
        );

        Ok(space)
    }

    async fn get(&self, user_id: &str, space_name: &str) -> SpaceResult<Space> {
        self.spaces
            .get(&Self::key(user_id, space_name))
            .map(|s| s.clone())
            .ok_or_else(|| SpaceError::not_found(user_id, space_name))
    }

    async fn list(&self, user_id: &str) -> SpaceResult<Vec<Space>> {
        let mut spaces: Vec<Space> = self
            .spaces
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        spaces.sort_by_key(|s| s.id);
        Ok(spaces)
    }

    async fn share(&self, request: ShareSpaceRequest) -> SpaceResult<Space> {
        let mut space = self
            .spaces
            .get_mut(&Self::key(&request.user_id, &request.space_name))
            .ok_or_else(|| SpaceError::not_found(&request.user_id, &request.space_name))?;

        space.is_shared = true;
        space.shared_with = Some(request.shared_with);
        space.updated_at = Utc::now();

        SPACES_SHARED_TOTAL.inc();
        Ok(space.clone())
    }

    async fn delete(&self, user_id: &str, space_name: &str) -> SpaceResult<()> {
        self.spaces
            .remove(&Self::key(user_id, space_name))
            .map(|_| ())
            .ok_or_else(|| SpaceError::not_found(user_id, space_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_request(user_id: &str, space_name: &str, content: &str) -> SaveSpaceRequest {
        SaveSpaceRequest {
            user_id: user_id.to_string(),
            space_name: space_name.to_string(),
            content: content.to_string(),
            content_type: "text/plain".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = MemorySpaceStore::new();

        let saved = store.save(save_request("alice", "notes", "v1")).await.unwrap();
        assert!(!saved.is_shared);
        assert!(saved.shared_with.is_none());

        let fetched = store.get("alice", "notes").await.unwrap();
        assert_eq!(fetched.content, "v1");
        assert!(matches!(
            store.get("bob", "notes").await,
            Err(SpaceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_overwrites_and_keeps_sharing() {
        let store = MemorySpaceStore::new();
        let first = store.save(save_request("alice", "notes", "v1")).await.unwrap();

        store
            .share(ShareSpaceRequest {
                user_id: "alice".to_string(),
                space_name: "notes".to_string(),
                shared_with: "bob,carol".to_string(),
            })
            .await
            .unwrap();

        let second = store.save(save_request("alice", "notes", "v2")).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.content, "v2");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.is_shared);
        assert_eq!(second.shared_with.as_deref(), Some("bob,carol"));
    }

    #[tokio::test]
    async fn test_share_missing_space() {
        let store = MemorySpaceStore::new();
        let result = store
            .share(ShareSpaceRequest {
                user_id: "alice".to_string(),
                space_name: "ghost".to_string(),
                shared_with: "bob".to_string(),
            })
            .await;
        assert!(matches!(result, Err(SpaceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = MemorySpaceStore::new();
        store.save(save_request("alice", "a", "1")).await.unwrap();
        store.save(save_request("alice", "b", "2")).await.unwrap();
        store.save(save_request("bob", "c", "3")).await.unwrap();

        let alice = store.list("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].space_name, "a");

        store.delete("alice", "a").await.unwrap();
        assert_eq!(store.list("alice").await.unwrap().len(), 1);
        assert!(store.delete("alice", "a").await.is_err());
    }
}

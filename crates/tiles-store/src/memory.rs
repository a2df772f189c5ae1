//! In-process result store backed by `DashMap`.
//!
//! Entries expire passively: an expired entry is dropped when it is next
//! read and otherwise stays until overwritten. There is no sweeper task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::store::{CachedResults, ResultStore, StoreError};

struct Entry {
    value: CachedResults,
    expires_at: DateTime<Utc>,
}

/// Shared in-memory store.
///
/// Cheaply cloneable via `Arc`; all clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CachedResults>, StoreError> {
        let now = Utc::now();
        self.entries.remove_if(key, |_, entry| entry.expires_at < now);
        Ok(self.entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &str, entry: CachedResults, ttl: Duration) -> Result<(), StoreError> {
        // A TTL past the representable range never expires.
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| entry.stored_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: entry,
                expires_at,
            },
        );
        Ok(())
    }
}

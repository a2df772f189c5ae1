//! # Result Store Contract
//!
//! Abstract key-value service holding the last successful expansion of each
//! meta-tile invocation. Implementations may be local (see
//! [`crate::MemoryStore`]) or remote; they must tolerate concurrent access to
//! distinct keys without caller-side locking, and a `put` must replace the
//! whole value atomically.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiles_core::TileResult;

/// Errors raised by a result store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing service cannot be reached.
    #[error("result store unavailable: {reason}")]
    Unavailable {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// A stored value could not be encoded or decoded.
    #[error("result store codec error: {0}")]
    Codec(String),
}

/// A cached expansion and the moment it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResults {
    pub results: Vec<TileResult>,
    pub stored_at: DateTime<Utc>,
}

impl CachedResults {
    /// Stamp `results` with the current time.
    pub fn now(results: Vec<TileResult>) -> Self {
        Self {
            results,
            stored_at: Utc::now(),
        }
    }

    /// Age of the entry at `now`. Entries stamped in the future have age zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.stored_at).to_std().unwrap_or_default()
    }

    /// Whether the entry is no older than `window` at `now`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age_at(now) <= window
    }
}

/// Key-value store for cached expansions.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Read the entry stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<CachedResults>, StoreError>;

    /// Store `entry` under `key`, replacing any previous value. `ttl` is a
    /// retention hint; freshness is still checked by the reader.
    async fn put(&self, key: &str, entry: CachedResults, ttl: Duration) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshness_window_is_inclusive() {
        let entry = CachedResults::now(Vec::new());
        let at_edge = entry.stored_at + chrono::Duration::milliseconds(100);
        assert!(entry.is_fresh_at(at_edge, Duration::from_millis(100)));
        let past_edge = entry.stored_at + chrono::Duration::milliseconds(101);
        assert!(!entry.is_fresh_at(past_edge, Duration::from_millis(100)));
    }

    #[test]
    fn future_entries_have_zero_age() {
        let entry = CachedResults::now(Vec::new());
        let before = entry.stored_at - chrono::Duration::seconds(5);
        assert_eq!(entry.age_at(before), Duration::ZERO);
    }
}

//! # Cache-Backed Resolver
//!
//! Runs one meta-tile build under a deadline and, when it fails, falls back to
//! the last cached expansion for the same fingerprint.
//!
//! The two halves are public on their own: [`CacheBackedResolver::fresh`]
//! builds and writes through, [`CacheBackedResolver::fallback`] reads a
//! still-fresh entry. [`CacheBackedResolver::get_or_build`] is the
//! combination of the two and is what request handlers call.
//!
//! ## Concurrency
//!
//! The resolver holds no lock. Builds for distinct fingerprints run fully in
//! parallel; two builds racing on the same fingerprint both write, and the
//! store keeps whichever `put` landed last.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tiles_core::{Fingerprint, TileResult};
use tiles_registry::BuilderError;

use crate::settings::ResolverSettings;
use crate::store::{CachedResults, ResultStore};

/// Why a fresh build produced no results.
#[derive(Error, Debug)]
pub enum BuildFailure {
    /// The builder did not answer within the deadline and was cancelled.
    #[error("builder timed out after {}ms", .deadline.as_millis())]
    Timeout {
        /// Deadline that elapsed.
        deadline: Duration,
    },

    /// The builder reported an error.
    #[error("builder failed: {0}")]
    Builder(#[from] BuilderError),
}

/// Where resolved results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    /// Produced by the builder during this call.
    Fresh,
    /// Served from the store after the builder failed.
    Cached {
        /// When the cached expansion was produced.
        stored_at: DateTime<Utc>,
    },
}

/// Results of a meta-tile resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub results: Vec<TileResult>,
    pub source: ResultSource,
}

impl Resolution {
    pub fn is_stale(&self) -> bool {
        matches!(self.source, ResultSource::Cached { .. })
    }
}

/// Deadline-bounded builder invocation with stale-on-failure fallback.
#[derive(Clone)]
pub struct CacheBackedResolver {
    store: Arc<dyn ResultStore>,
    settings: ResolverSettings,
}

impl CacheBackedResolver {
    pub fn new(store: Arc<dyn ResultStore>, settings: ResolverSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Build fresh results, or serve the cached ones if the build fails.
    ///
    /// # Errors
    ///
    /// Returns the build failure when no fresh-enough cached entry exists,
    /// including when the store itself cannot be read.
    pub async fn get_or_build<F, Fut>(
        &self,
        fingerprint: &Fingerprint,
        build: F,
    ) -> Result<Resolution, BuildFailure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<TileResult>, BuilderError>>,
    {
        let failure = match self.fresh(fingerprint, build).await {
            Ok(results) => {
                return Ok(Resolution {
                    results,
                    source: ResultSource::Fresh,
                })
            }
            Err(failure) => failure,
        };

        match self.fallback(fingerprint).await {
            Some(cached) => {
                tracing::warn!(
                    %fingerprint,
                    stored_at = %cached.stored_at,
                    error = %failure,
                    "meta-tile build failed, serving cached results"
                );
                Ok(Resolution {
                    results: cached.results,
                    source: ResultSource::Cached {
                        stored_at: cached.stored_at,
                    },
                })
            }
            None => Err(failure),
        }
    }

    /// Run the builder under the deadline and write successful results
    /// through to the store.
    ///
    /// Dropping the build future on timeout cancels the in-flight downstream
    /// call. A failed write is logged and does not affect the returned
    /// results.
    pub async fn fresh<F, Fut>(
        &self,
        fingerprint: &Fingerprint,
        build: F,
    ) -> Result<Vec<TileResult>, BuildFailure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<TileResult>, BuilderError>>,
    {
        let deadline = self.settings.build_deadline();
        let results = match tokio::time::timeout(deadline, build()).await {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => return Err(BuildFailure::Builder(e)),
            Err(_) => {
                tracing::warn!(%fingerprint, ?deadline, "meta-tile build timed out");
                return Err(BuildFailure::Timeout { deadline });
            }
        };

        tracing::debug!(%fingerprint, count = results.len(), "meta-tile built");
        let entry = CachedResults::now(results.clone());
        if let Err(e) = self
            .store
            .put(&fingerprint.store_key(), entry, self.settings.store_expiration)
            .await
        {
            tracing::warn!(%fingerprint, error = %e, "failed to store meta-tile results");
        }
        Ok(results)
    }

    /// The cached expansion for `fingerprint`, if one exists and is no older
    /// than the store expiration.
    ///
    /// An unreachable store counts as "no entry".
    pub async fn fallback(&self, fingerprint: &Fingerprint) -> Option<CachedResults> {
        let entry = match self.store.get(&fingerprint.store_key()).await {
            Ok(entry) => entry?,
            Err(e) => {
                tracing::warn!(%fingerprint, error = %e, "result store unavailable, no fallback");
                return None;
            }
        };
        if entry.is_fresh_at(Utc::now(), self.settings.store_expiration) {
            Some(entry)
        } else {
            tracing::debug!(%fingerprint, stored_at = %entry.stored_at, "cached meta-tile results expired");
            None
        }
    }
}

impl std::fmt::Debug for CacheBackedResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheBackedResolver")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

//! # Resolver Settings
//!
//! Environment-driven knobs for meta-tile resolution.
//!
//! | Variable                               | Default      |
//! |----------------------------------------|--------------|
//! | `TILES_DOWNSTREAM_STORE_EXPIRATION_MS` | `86400000`   |
//! | `TILES_BUILDER_TIMEOUT_MS`             | `5000`       |

use std::time::Duration;

/// Default freshness window of cached expansions (24 hours).
pub const DEFAULT_STORE_EXPIRATION_MS: u64 = 86_400_000;

/// Default upper bound on a single builder call.
pub const DEFAULT_BUILDER_TIMEOUT_MS: u64 = 5_000;

/// Expiration and deadline budget shared by every meta-tile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Maximum age of a cached expansion that may still be served.
    pub store_expiration: Duration,
    /// Maximum time granted to a builder call.
    pub builder_timeout: Duration,
}

impl ResolverSettings {
    /// Settings with the given freshness window and the default builder
    /// timeout.
    pub fn new(store_expiration: Duration) -> Self {
        Self {
            store_expiration,
            builder_timeout: Duration::from_millis(DEFAULT_BUILDER_TIMEOUT_MS),
        }
    }

    pub fn with_builder_timeout(mut self, builder_timeout: Duration) -> Self {
        self.builder_timeout = builder_timeout;
        self
    }

    /// Deadline applied to each builder call: the builder timeout, capped by
    /// the store expiration so a build never outlives the window its result
    /// would be cached for.
    pub fn build_deadline(&self) -> Duration {
        self.builder_timeout.min(self.store_expiration)
    }

    /// Read settings from the environment, falling back to defaults for
    /// absent or unparseable values.
    pub fn from_env() -> Self {
        Self {
            store_expiration: Duration::from_millis(env_millis(
                "TILES_DOWNSTREAM_STORE_EXPIRATION_MS",
                DEFAULT_STORE_EXPIRATION_MS,
            )),
            builder_timeout: Duration::from_millis(env_millis(
                "TILES_BUILDER_TIMEOUT_MS",
                DEFAULT_BUILDER_TIMEOUT_MS,
            )),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_STORE_EXPIRATION_MS))
    }
}

fn env_millis(var: &str, default: u64) -> u64 {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var, value = %raw, default, "ignoring unparseable duration");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_is_capped_by_expiration() {
        let settings = ResolverSettings::new(Duration::from_millis(100));
        assert_eq!(settings.build_deadline(), Duration::from_millis(100));

        let settings = ResolverSettings::new(Duration::from_secs(60))
            .with_builder_timeout(Duration::from_secs(2));
        assert_eq!(settings.build_deadline(), Duration::from_secs(2));
    }

    #[test]
    fn defaults() {
        let settings = ResolverSettings::default();
        assert_eq!(settings.store_expiration, Duration::from_secs(86_400));
        assert_eq!(settings.builder_timeout, Duration::from_secs(5));
    }

    #[test]
    fn from_env_reads_and_falls_back() {
        std::env::set_var("TILES_DOWNSTREAM_STORE_EXPIRATION_MS", "1500");
        std::env::set_var("TILES_BUILDER_TIMEOUT_MS", "not-a-number");
        let settings = ResolverSettings::from_env();
        std::env::remove_var("TILES_DOWNSTREAM_STORE_EXPIRATION_MS");
        std::env::remove_var("TILES_BUILDER_TIMEOUT_MS");

        assert_eq!(settings.store_expiration, Duration::from_millis(1500));
        assert_eq!(settings.builder_timeout, Duration::from_millis(DEFAULT_BUILDER_TIMEOUT_MS));
    }
}

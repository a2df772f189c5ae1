//! Usecase settings read from the environment.

use std::time::Duration;

use tiles_store::ResolverSettings;

/// Default timeout of a remote config fetch.
pub const DEFAULT_CONFIG_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsecaseSettings {
    pub resolver: ResolverSettings,
    /// Timeout of a remote config fetch.
    pub fetch_timeout: Duration,
}

impl UsecaseSettings {
    /// Read settings from the environment, falling back to defaults for
    /// absent or unparseable values.
    pub fn from_env() -> Self {
        let fetch_timeout_secs = match std::env::var("TILES_CONFIG_FETCH_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    var = "TILES_CONFIG_FETCH_TIMEOUT_SECS",
                    value = %raw,
                    default = DEFAULT_CONFIG_FETCH_TIMEOUT_SECS,
                    "ignoring unparseable duration"
                );
                DEFAULT_CONFIG_FETCH_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_CONFIG_FETCH_TIMEOUT_SECS,
        };
        Self {
            resolver: ResolverSettings::from_env(),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        }
    }
}

impl Default for UsecaseSettings {
    fn default() -> Self {
        Self {
            resolver: ResolverSettings::default(),
            fetch_timeout: Duration::from_secs(DEFAULT_CONFIG_FETCH_TIMEOUT_SECS),
        }
    }
}

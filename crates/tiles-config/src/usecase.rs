//! # Config Usecase
//!
//! Entry point used by the transport layer. It owns the shared registry,
//! the meta-tile resolver and the config repository, and runs a config
//! through load → verify → hydrate.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tiles_core::{Fingerprint, TileType, Variant};
use tiles_registry::{Lookup, Registry, RegistryDescription};
use tiles_store::{CacheBackedResolver, Resolution, ResultStore};

use crate::bag::{ConfigBag, ConfigError, ConfigErrorId};
use crate::error::{RepositoryError, ResolveError};
use crate::repository::{ConfigLoader, ConfigRepository};
use crate::settings::UsecaseSettings;

/// Where to load a config from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Path(PathBuf),
    Url(String),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Clone)]
pub struct ConfigUsecase {
    registry: Arc<Registry>,
    resolver: CacheBackedResolver,
    repository: Arc<dyn ConfigRepository>,
}

impl ConfigUsecase {
    pub fn new(
        registry: Arc<Registry>,
        resolver: CacheBackedResolver,
        repository: Arc<dyn ConfigRepository>,
    ) -> Self {
        Self {
            registry,
            resolver,
            repository,
        }
    }

    /// Wire a usecase with the filesystem/HTTP loader.
    pub fn from_settings(
        registry: Arc<Registry>,
        store: Arc<dyn ResultStore>,
        settings: UsecaseSettings,
    ) -> Result<Self, RepositoryError> {
        let repository = ConfigLoader::new(settings.fetch_timeout)?;
        Ok(Self::new(
            registry,
            CacheBackedResolver::new(store, settings.resolver),
            Arc::new(repository),
        ))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Load a config. Loading failures are reported inside the bag.
    pub async fn get_config(&self, source: &ConfigSource) -> ConfigBag {
        let loaded = match source {
            ConfigSource::Path(path) => self.repository.get_config_from_path(path).await,
            ConfigSource::Url(url) => self.repository.get_config_from_url(url).await,
        };
        match loaded {
            Ok(config) => ConfigBag::with_config(config),
            Err(e) => {
                tracing::warn!(%source, error = %e, "unable to load config");
                let id = match &e {
                    RepositoryError::Parse { .. } => ConfigErrorId::UnableToParseConfig,
                    _ => ConfigErrorId::ConfigNotFound,
                };
                ConfigBag::with_error(ConfigError::new(id, e.to_string()).value(source.to_string()))
            }
        }
    }

    /// Verify the bag's config against the registry.
    pub fn verify(&self, bag: &mut ConfigBag) {
        crate::verify::verify(&self.registry, bag);
    }

    /// Fill poll URLs and expand meta-tiles. Skipped when the bag already
    /// carries errors.
    pub async fn hydrate(&self, bag: &mut ConfigBag) {
        crate::hydrate::hydrate(self, bag).await;
    }

    /// Load, verify and hydrate in one call.
    pub async fn load(&self, source: &ConfigSource) -> ConfigBag {
        let mut bag = self.get_config(source).await;
        self.verify(&mut bag);
        self.hydrate(&mut bag).await;
        bag
    }

    /// Resolve a meta-tile into concrete tiles.
    ///
    /// The params are validated, and the normalized payload is both
    /// fingerprinted and handed to the builder. When the builder fails or
    /// times out, a cached expansion younger than the store expiration is
    /// returned instead and flagged stale.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UnknownTile`] when the pair is not a registered
    /// meta-tile, [`ResolveError::ValidationFailed`] when the params are
    /// rejected, [`ResolveError::BuilderFailed`] when no results can be
    /// served.
    pub async fn expand_meta_tile(
        &self,
        tile_type: &TileType,
        variant: &Variant,
        params: &Value,
    ) -> Result<Resolution, ResolveError> {
        let cfg = match self.registry.lookup(tile_type, variant) {
            Lookup::MetaTile(cfg) => cfg,
            _ => {
                return Err(ResolveError::UnknownTile {
                    tile_type: tile_type.clone(),
                    variant: variant.clone(),
                })
            }
        };

        let normalized = cfg
            .validator
            .validate(params)
            .map_err(|source| ResolveError::ValidationFailed {
                tile_type: tile_type.clone(),
                variant: variant.clone(),
                source,
            })?;
        let fingerprint = Fingerprint::of(tile_type, variant, &normalized)?;

        let builder = cfg.builder.clone();
        let resolution = self
            .resolver
            .get_or_build(&fingerprint, || async move { builder.build(&normalized).await })
            .await
            .map_err(|source| ResolveError::BuilderFailed {
                tile_type: tile_type.clone(),
                variant: variant.clone(),
                source,
            })?;

        tracing::debug!(
            %tile_type,
            %variant,
            %fingerprint,
            count = resolution.results.len(),
            stale = resolution.is_stale(),
            "meta-tile expanded"
        );
        Ok(resolution)
    }

    /// Client-facing description of the registry.
    pub fn describe(&self) -> RegistryDescription {
        self.registry.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;
    use tiles_core::TileResult;
    use tiles_registry::{AcceptObject, BuilderError, FnBuilder};
    use tiles_store::{MemoryStore, ResolverSettings};

    use crate::model::Config;

    struct StaticRepository(Result<Config, fn() -> RepositoryError>);

    #[async_trait]
    impl ConfigRepository for StaticRepository {
        async fn get_config_from_path(&self, _path: &Path) -> Result<Config, RepositoryError> {
            self.0.clone().map_err(|make| make())
        }

        async fn get_config_from_url(&self, _url: &str) -> Result<Config, RepositoryError> {
            self.0.clone().map_err(|make| make())
        }
    }

    fn usecase(repository: StaticRepository) -> ConfigUsecase {
        let mut registry = Registry::new();
        registry.register_meta_tile(
            TileType::new("GROUP_GEN"),
            Variant::default(),
            Arc::new(AcceptObject),
            Arc::new(FnBuilder::new(|params: &Value| {
                let count = params.get("count").and_then(Value::as_u64).unwrap_or(0);
                Ok::<_, BuilderError>(
                    (0..count)
                        .map(|i| TileResult::new(TileType::new("PING"), format!("ping {i}"), Default::default()))
                        .collect(),
                )
            })),
        );
        ConfigUsecase::new(
            Arc::new(registry),
            CacheBackedResolver::new(Arc::new(MemoryStore::new()), ResolverSettings::default()),
            Arc::new(repository),
        )
    }

    #[tokio::test]
    async fn not_found_is_reported_in_the_bag() {
        let usecase = usecase(StaticRepository(Err(|| RepositoryError::NotFound {
            location: "config.json".into(),
        })));
        let bag = usecase.get_config(&ConfigSource::Path("config.json".into())).await;
        assert!(bag.config.is_none());
        assert_eq!(bag.error_ids(), vec![ConfigErrorId::ConfigNotFound]);
        assert_eq!(bag.errors[0].data.value.as_deref(), Some("config.json"));
    }

    #[tokio::test]
    async fn parse_failure_is_reported_in_the_bag() {
        let usecase = usecase(StaticRepository(Err(|| RepositoryError::Parse {
            location: "http://configs/a.json".into(),
            source: serde_json::from_str::<Value>("{").unwrap_err(),
        })));
        let bag = usecase
            .get_config(&ConfigSource::Url("http://configs/a.json".into()))
            .await;
        assert_eq!(bag.error_ids(), vec![ConfigErrorId::UnableToParseConfig]);
    }

    #[tokio::test]
    async fn expands_registered_meta_tile() {
        let usecase = usecase(StaticRepository(Ok(Config::default())));
        let resolution = usecase
            .expand_meta_tile(&TileType::new("GROUP_GEN"), &Variant::default(), &json!({"count": 2}))
            .await
            .unwrap();
        assert_eq!(resolution.results.len(), 2);
        assert_eq!(resolution.results[1].label, "ping 1");
        assert!(!resolution.is_stale());
    }

    #[tokio::test]
    async fn unknown_meta_tile_is_rejected() {
        let usecase = usecase(StaticRepository(Ok(Config::default())));
        let err = usecase
            .expand_meta_tile(&TileType::new("PING"), &Variant::default(), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownTile { .. }));
    }

    #[tokio::test]
    async fn invalid_meta_tile_params_are_rejected() {
        let usecase = usecase(StaticRepository(Ok(Config::default())));
        let err = usecase
            .expand_meta_tile(&TileType::new("GROUP_GEN"), &Variant::default(), &json!([1]))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::ValidationFailed { .. }));
    }
}

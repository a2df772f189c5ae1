//! # Registry
//!
//! The two registration tables and the tagged lookup over them.
//!
//! ## Invariants
//!
//! - A tile type is present in at most one table. Registering a meta-tile
//!   for a type drops that type's direct-tile table ("the type is dynamic");
//!   registering a direct tile for a dynamic type drops its meta-tile table.
//! - Variants are unique per tile type per table. Re-registering a
//!   `(type, variant)` pair silently replaces the previous entry.
//! - `EMPTY` and `GROUP` are authorized from construction and never carry
//!   variants.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tiles_core::{TileType, Variant};

use crate::builder::MetaTileBuilder;
use crate::describe::{RegistryDescription, VariantDescription};
use crate::error::RegistryError;
use crate::validator::Validator;

/// Registration of a direct (pollable) tile variant.
#[derive(Clone)]
pub struct TileConfig {
    /// Checks and normalizes client params.
    pub validator: Arc<dyn Validator>,
    /// Endpoint the client polls for this tile's live data.
    pub path: String,
    /// Upper bound, in milliseconds, of the client's initial polling stagger.
    pub initial_max_delay: u64,
}

impl fmt::Debug for TileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileConfig")
            .field("path", &self.path)
            .field("initial_max_delay", &self.initial_max_delay)
            .finish_non_exhaustive()
    }
}

/// Registration of a meta-tile variant.
#[derive(Clone)]
pub struct MetaTileConfig {
    /// Checks and normalizes client params before they reach the builder.
    pub validator: Arc<dyn Validator>,
    /// Expands the meta-tile into concrete tiles.
    pub builder: Arc<dyn MetaTileBuilder>,
}

impl fmt::Debug for MetaTileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaTileConfig").finish_non_exhaustive()
    }
}

/// Outcome of [`Registry::lookup`].
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Tile(&'a TileConfig),
    MetaTile(&'a MetaTileConfig),
    NotFound,
}

impl Lookup<'_> {
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Direct-tile and meta-tile registration tables.
///
/// Built mutably during startup, then shared read-only (typically as
/// `Arc<Registry>`).
#[derive(Debug, Clone)]
pub struct Registry {
    tiles: BTreeMap<TileType, BTreeMap<Variant, TileConfig>>,
    meta_tiles: BTreeMap<TileType, BTreeMap<Variant, MetaTileConfig>>,
}

impl Registry {
    /// Create a registry with only the structural types authorized.
    pub fn new() -> Self {
        let mut tiles = BTreeMap::new();
        tiles.insert(TileType::empty(), BTreeMap::new());
        tiles.insert(TileType::group(), BTreeMap::new());
        Self {
            tiles,
            meta_tiles: BTreeMap::new(),
        }
    }

    /// Register (or replace) a direct tile variant.
    pub fn register_tile(
        &mut self,
        tile_type: TileType,
        variant: Variant,
        validator: Arc<dyn Validator>,
        path: impl Into<String>,
        initial_max_delay: u64,
    ) {
        if tile_type.is_structural() {
            tracing::warn!(%tile_type, %variant, "structural tile types take no configuration, registration ignored");
            return;
        }
        if self.meta_tiles.remove(&tile_type).is_some() {
            tracing::warn!(%tile_type, "tile type was dynamic, dropping its meta-tile variants");
        }
        let path = path.into();
        tracing::debug!(%tile_type, %variant, %path, initial_max_delay, "registering tile");
        self.tiles.entry(tile_type).or_default().insert(
            variant,
            TileConfig {
                validator,
                path,
                initial_max_delay,
            },
        );
    }

    /// Register (or replace) a meta-tile variant, marking the type dynamic.
    pub fn register_meta_tile(
        &mut self,
        tile_type: TileType,
        variant: Variant,
        validator: Arc<dyn Validator>,
        builder: Arc<dyn MetaTileBuilder>,
    ) {
        if tile_type.is_structural() {
            tracing::warn!(%tile_type, %variant, "structural tile types cannot be dynamic, registration ignored");
            return;
        }
        if self.tiles.remove(&tile_type).is_some() {
            tracing::debug!(%tile_type, "tile type becomes dynamic, dropping its direct variants");
        }
        tracing::debug!(%tile_type, %variant, "registering meta-tile");
        self.meta_tiles
            .entry(tile_type)
            .or_default()
            .insert(variant, MetaTileConfig { validator, builder });
    }

    /// Disable a registered tile variant.
    ///
    /// Whether disabling should remove the entry or keep it as inactive is
    /// not decided yet, so this always fails and leaves the registry as is.
    pub fn disable(&mut self, tile_type: &TileType, variant: &Variant) -> Result<(), RegistryError> {
        Err(RegistryError::NotImplemented {
            operation: "disable",
            tile_type: tile_type.clone(),
            variant: variant.clone(),
        })
    }

    pub fn lookup(&self, tile_type: &TileType, variant: &Variant) -> Lookup<'_> {
        if let Some(config) = self.tiles.get(tile_type).and_then(|v| v.get(variant)) {
            return Lookup::Tile(config);
        }
        if let Some(config) = self.meta_tiles.get(tile_type).and_then(|v| v.get(variant)) {
            return Lookup::MetaTile(config);
        }
        Lookup::NotFound
    }

    /// Whether clients may use this tile type at all.
    pub fn is_authorized(&self, tile_type: &TileType) -> bool {
        self.tiles.contains_key(tile_type) || self.meta_tiles.contains_key(tile_type)
    }

    /// Whether the tile type is registered as a meta-tile.
    pub fn is_dynamic(&self, tile_type: &TileType) -> bool {
        self.meta_tiles.contains_key(tile_type)
    }

    /// All authorized tile types, sorted.
    pub fn tile_types(&self) -> Vec<&TileType> {
        let mut types: Vec<_> = self.tiles.keys().chain(self.meta_tiles.keys()).collect();
        types.sort();
        types
    }

    /// Registered variants of a tile type, sorted. Empty for unknown types.
    pub fn variants(&self, tile_type: &TileType) -> Vec<&Variant> {
        if let Some(variants) = self.tiles.get(tile_type) {
            return variants.keys().collect();
        }
        self.meta_tiles
            .get(tile_type)
            .map(|variants| variants.keys().collect())
            .unwrap_or_default()
    }

    /// Client-facing description of every registered variant.
    pub fn describe(&self) -> RegistryDescription {
        let mut tiles: BTreeMap<TileType, BTreeMap<Variant, VariantDescription>> = BTreeMap::new();
        for (tile_type, variants) in &self.tiles {
            let described = variants
                .iter()
                .map(|(variant, config)| (variant.clone(), VariantDescription::from(config)))
                .collect();
            tiles.insert(tile_type.clone(), described);
        }
        for (tile_type, variants) in &self.meta_tiles {
            let described = variants
                .iter()
                .map(|(variant, config)| (variant.clone(), VariantDescription::from(config)))
                .collect();
            tiles.insert(tile_type.clone(), described);
        }
        RegistryDescription {
            tile_types: self.tile_types().into_iter().cloned().collect(),
            tiles,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FnBuilder;
    use crate::validator::AcceptObject;
    use serde_json::{Map, Value};
    use tiles_core::TileResult;

    fn accept() -> Arc<dyn Validator> {
        Arc::new(AcceptObject)
    }

    fn group_builder(count: usize) -> Arc<dyn MetaTileBuilder> {
        Arc::new(FnBuilder::new(move |_: &Value| {
            Ok((0..count)
                .map(|i| TileResult::new(TileType::group(), format!("{i}"), Map::new()))
                .collect())
        }))
    }

    #[test]
    fn structural_types_are_preauthorized() {
        let registry = Registry::new();
        assert!(registry.is_authorized(&TileType::empty()));
        assert!(registry.is_authorized(&TileType::group()));
        assert!(!registry.is_authorized(&TileType::new("PING")));
        assert!(matches!(
            registry.lookup(&TileType::group(), &Variant::default()),
            Lookup::NotFound
        ));
    }

    #[test]
    fn jenkins_direct_tile_lookup() {
        let mut registry = Registry::new();
        registry.register_tile(
            TileType::new("JENKINS"),
            Variant::default(),
            accept(),
            "/api/v1/jenkins/build",
            5000,
        );
        match registry.lookup(&TileType::new("JENKINS"), &Variant::new("default")) {
            Lookup::Tile(config) => {
                assert_eq!(config.path, "/api/v1/jenkins/build");
                assert_eq!(config.initial_max_delay, 5000);
            }
            other => panic!("expected direct tile, got {other:?}"),
        }
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = Registry::new();
        let jenkins = TileType::new("JENKINS");
        registry.register_tile(jenkins.clone(), Variant::default(), accept(), "/first", 1000);
        registry.register_tile(jenkins.clone(), Variant::default(), accept(), "/second", 2000);
        match registry.lookup(&jenkins, &Variant::default()) {
            Lookup::Tile(config) => {
                assert_eq!(config.path, "/second");
                assert_eq!(config.initial_max_delay, 2000);
            }
            other => panic!("expected direct tile, got {other:?}"),
        }
        assert_eq!(registry.variants(&jenkins).len(), 1);
    }

    #[test]
    fn variants_are_independent() {
        let mut registry = Registry::new();
        let ping = TileType::new("PING");
        registry.register_tile(ping.clone(), Variant::default(), accept(), "/ping/default", 1000);
        registry.register_tile(ping.clone(), Variant::new("lan"), accept(), "/ping/lan", 1000);
        assert_eq!(
            registry.variants(&ping),
            vec![&Variant::new("default"), &Variant::new("lan")]
        );
        assert!(matches!(
            registry.lookup(&ping, &Variant::new("wan")),
            Lookup::NotFound
        ));
    }

    #[test]
    fn meta_tile_registration_makes_type_dynamic() {
        let mut registry = Registry::new();
        let github = TileType::new("GITHUB-PULLREQUESTS");
        registry.register_tile(github.clone(), Variant::default(), accept(), "/github", 1000);
        registry.register_meta_tile(github.clone(), Variant::new("v1"), accept(), group_builder(1));

        assert!(registry.is_dynamic(&github));
        assert!(matches!(
            registry.lookup(&github, &Variant::default()),
            Lookup::NotFound
        ));
        assert!(matches!(
            registry.lookup(&github, &Variant::new("v1")),
            Lookup::MetaTile(_)
        ));
    }

    #[test]
    fn direct_registration_clears_dynamic_type() {
        let mut registry = Registry::new();
        let kind = TileType::new("GROUP_GEN");
        registry.register_meta_tile(kind.clone(), Variant::new("v1"), accept(), group_builder(1));
        registry.register_tile(kind.clone(), Variant::default(), accept(), "/gen", 1000);

        assert!(!registry.is_dynamic(&kind));
        assert!(matches!(registry.lookup(&kind, &Variant::new("v1")), Lookup::NotFound));
        assert!(matches!(registry.lookup(&kind, &Variant::default()), Lookup::Tile(_)));
    }

    #[test]
    fn structural_types_reject_registration() {
        let mut registry = Registry::new();
        registry.register_tile(TileType::group(), Variant::default(), accept(), "/group", 0);
        registry.register_meta_tile(TileType::empty(), Variant::default(), accept(), group_builder(1));
        assert!(registry.variants(&TileType::group()).is_empty());
        assert!(!registry.is_dynamic(&TileType::empty()));
    }

    #[test]
    fn disable_is_not_implemented() {
        let mut registry = Registry::new();
        let ping = TileType::new("PING");
        registry.register_tile(ping.clone(), Variant::default(), accept(), "/ping", 1000);

        let err = registry.disable(&ping, &Variant::default()).unwrap_err();
        assert!(matches!(err, RegistryError::NotImplemented { operation: "disable", .. }));
        assert!(registry.lookup(&ping, &Variant::default()).is_found());
    }

    #[test]
    fn tile_types_are_sorted_union() {
        let mut registry = Registry::new();
        registry.register_tile(TileType::new("PING"), Variant::default(), accept(), "/ping", 1000);
        registry.register_meta_tile(
            TileType::new("AZURE-RELEASES"),
            Variant::default(),
            accept(),
            group_builder(0),
        );
        let names: Vec<_> = registry.tile_types().iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["AZURE-RELEASES", "EMPTY", "GROUP", "PING"]);
    }

    #[tokio::test]
    async fn last_meta_tile_registration_wins() {
        let mut registry = Registry::new();
        let kind = TileType::new("GROUP_GEN");
        registry.register_meta_tile(kind.clone(), Variant::new("v1"), accept(), group_builder(1));
        registry.register_meta_tile(kind.clone(), Variant::new("v1"), accept(), group_builder(4));

        let Lookup::MetaTile(config) = registry.lookup(&kind, &Variant::new("v1")) else {
            panic!("expected meta-tile");
        };
        let results = config.builder.build(&serde_json::json!({})).await.unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(registry.variants(&kind).len(), 1);
    }

    #[tokio::test]
    async fn registered_builder_is_callable() {
        let mut registry = Registry::new();
        let kind = TileType::new("GROUP_GEN");
        registry.register_meta_tile(kind.clone(), Variant::new("v1"), accept(), group_builder(3));
        let Lookup::MetaTile(config) = registry.lookup(&kind, &Variant::new("v1")) else {
            panic!("expected meta-tile");
        };
        let results = config.builder.build(&serde_json::json!({})).await.unwrap();
        assert_eq!(results.len(), 3);
    }
}

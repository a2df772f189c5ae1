//! # Registry Description
//!
//! Serializable view of the registry handed to the transport layer, which
//! serves it to dashboard clients. Validators and builders are not exposed;
//! only what a client needs to render and poll a tile.

use std::collections::BTreeMap;

use serde::Serialize;
use tiles_core::{TileType, Variant};

use crate::registry::{MetaTileConfig, TileConfig};

/// Description of a single registered variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariantDescription {
    #[serde(rename_all = "camelCase")]
    Tile {
        is_configured: bool,
        initial_max_delay: u64,
        poll_path: String,
    },
    #[serde(rename_all = "camelCase")]
    MetaTile { is_configured: bool },
}

impl From<&TileConfig> for VariantDescription {
    fn from(config: &TileConfig) -> Self {
        Self::Tile {
            is_configured: true,
            initial_max_delay: config.initial_max_delay,
            poll_path: config.path.clone(),
        }
    }
}

impl From<&MetaTileConfig> for VariantDescription {
    fn from(_: &MetaTileConfig) -> Self {
        Self::MetaTile {
            is_configured: true,
        }
    }
}

/// Every authorized tile type and the variants registered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDescription {
    /// Sorted authorized tile types, structural types included.
    pub tile_types: Vec<TileType>,
    /// Variants per tile type. Structural types map to no variants.
    pub tiles: BTreeMap<TileType, BTreeMap<Variant, VariantDescription>>,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::builder::FnBuilder;
    use crate::registry::Registry;
    use crate::validator::AcceptObject;

    use super::*;

    #[test]
    fn description_shape() {
        let mut registry = Registry::new();
        registry.register_tile(
            TileType::new("PING"),
            Variant::default(),
            Arc::new(AcceptObject),
            "/api/v1/ping",
            1000,
        );
        registry.register_meta_tile(
            TileType::new("GROUP_GEN"),
            Variant::new("v1"),
            Arc::new(AcceptObject),
            Arc::new(FnBuilder::new(|_: &Value| Ok(Vec::new()))),
        );

        let description = serde_json::to_value(registry.describe()).unwrap();
        assert_eq!(
            description,
            json!({
                "tileTypes": ["EMPTY", "GROUP", "GROUP_GEN", "PING"],
                "tiles": {
                    "EMPTY": {},
                    "GROUP": {},
                    "GROUP_GEN": {"v1": {"isConfigured": true}},
                    "PING": {"default": {
                        "isConfigured": true,
                        "initialMaxDelay": 1000,
                        "pollPath": "/api/v1/ping"
                    }}
                }
            })
        );
    }
}

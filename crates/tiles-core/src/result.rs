//! # Builder Results
//!
//! A `TileResult` is one concrete, renderable tile produced by expanding a
//! meta-tile. Results are opaque to the core: they are stored and returned
//! exactly as the builder produced them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tile::TileType;

/// A concrete tile instance produced by a meta-tile builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileResult {
    /// Type of the generated tile.
    pub tile_type: TileType,
    /// Human-facing name shown on the tile.
    pub label: String,
    /// Parameters passed to the direct-tile polling path.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl TileResult {
    pub fn new(tile_type: TileType, label: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            tile_type,
            label: label.into(),
            params,
        }
    }
}

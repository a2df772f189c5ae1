//! # Client Config Model
//!
//! The dashboard config as written by users and, after hydration, as served
//! back to the dashboard. Every optional field is omitted from the JSON when
//! unset so hydrated configs stay compact.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "columns": 4,
//!   "tiles": [
//!     { "type": "PING", "params": { "hostname": "example.com" } },
//!     { "type": "GROUP", "label": "CI", "tiles": [
//!       { "type": "JENKINS", "configVariant": "internal", "params": { "job": "api" } }
//!     ]}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tiles_core::{TileType, Variant};

/// A complete dashboard config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Config format version, `MAJOR.MINOR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Number of grid columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<i64>,
    /// Dashboard zoom factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    /// Top-level tiles, in display order.
    #[serde(default)]
    pub tiles: Vec<Tile>,
}

/// One entry of a dashboard config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Registered variant to use; `"default"` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_variant: Option<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_span: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<i64>,
    /// Sub-tiles of a `GROUP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<Tile>>,
    /// Poll URL, filled in by hydration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Initial polling stagger bound in milliseconds, filled in by hydration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_max_delay: Option<u64>,
}

impl Tile {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            label: None,
            config_variant: None,
            params: None,
            column_span: None,
            row_span: None,
            tiles: None,
            url: None,
            initial_max_delay: None,
        }
    }

    /// The variant this tile refers to, defaulting to `"default"`.
    pub fn variant(&self) -> Variant {
        self.config_variant.clone().unwrap_or_default()
    }

    /// Compact JSON rendering used as the extract in config errors.
    pub fn extract(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"type\":\"{}\"}}", self.tile_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_client_config() {
        let config: Config = serde_json::from_value(json!({
            "version": "1.0",
            "columns": 4,
            "tiles": [
                {"type": "PING", "params": {"hostname": "example.com"}},
                {"type": "GROUP", "label": "CI", "tiles": [
                    {"type": "JENKINS", "configVariant": "internal", "columnSpan": 2}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(config.version.as_deref(), Some("1.0"));
        assert_eq!(config.tiles.len(), 2);
        let group = &config.tiles[1];
        assert!(group.tile_type.is_group());
        let jenkins = &group.tiles.as_ref().unwrap()[0];
        assert_eq!(jenkins.variant(), Variant::new("internal"));
        assert_eq!(jenkins.column_span, Some(2));
    }

    #[test]
    fn unset_fields_are_omitted() {
        let tile = Tile::new(TileType::empty());
        assert_eq!(serde_json::to_value(&tile).unwrap(), json!({"type": "EMPTY"}));
        assert_eq!(tile.extract(), r#"{"type":"EMPTY"}"#);
    }

    #[test]
    fn missing_variant_is_default() {
        assert!(Tile::new(TileType::new("PING")).variant().is_default());
    }
}

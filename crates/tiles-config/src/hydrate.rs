//! # Config Hydration
//!
//! Turns a verified config into the one served to the dashboard:
//!
//! ```text
//! direct tile   ──► url = path?<params>, initialMaxDelay
//! meta-tile     ──► expand ──► generated tiles, hydrated as direct tiles
//!                   top level: wrapped in a GROUP (label and spans kept)
//!                   in a GROUP: spliced in place
//! ```
//!
//! Params and `configVariant` are consumed by hydration and do not appear in
//! the output. Generated `EMPTY` and `GROUP` results pass through as bare
//! structural tiles carrying their label. A tile that cannot be hydrated is left as it was and reported
//! as `ERROR_UNABLE_TO_HYDRATE`.

use serde_json::{Map, Value};
use tiles_core::{TileResult, TileType, Variant};
use tiles_registry::{Lookup, TileConfig};
use url::form_urlencoded;

use crate::bag::{ConfigBag, ConfigError, ConfigErrorId};
use crate::model::Tile;
use crate::usecase::ConfigUsecase;

pub(crate) async fn hydrate(usecase: &ConfigUsecase, bag: &mut ConfigBag) {
    if bag.has_errors() {
        return;
    }
    let Some(config) = bag.config.as_mut() else {
        return;
    };
    let mut errors = Vec::new();

    let tiles = std::mem::take(&mut config.tiles);
    let mut hydrated = Vec::with_capacity(tiles.len());
    for tile in tiles {
        hydrated.push(hydrate_top_level(usecase, tile, &mut errors).await);
    }
    config.tiles = hydrated;

    if !errors.is_empty() {
        tracing::warn!(count = errors.len(), "config hydration failed");
    }
    bag.errors.extend(errors);
}

async fn hydrate_top_level(usecase: &ConfigUsecase, mut tile: Tile, errors: &mut Vec<ConfigError>) -> Tile {
    if tile.tile_type.is_empty_placeholder() {
        return tile;
    }

    if tile.tile_type.is_group() {
        let children = tile.tiles.take().unwrap_or_default();
        let mut hydrated = Vec::with_capacity(children.len());
        for child in children {
            if usecase.registry().is_dynamic(&child.tile_type) {
                match expand(usecase, &child).await {
                    Ok(generated) => hydrated.extend(generated),
                    Err(e) => {
                        errors.push(e);
                        hydrated.push(child);
                    }
                }
            } else {
                hydrated.push(hydrate_direct(usecase, child, errors));
            }
        }
        tile.tiles = Some(hydrated);
        return tile;
    }

    if usecase.registry().is_dynamic(&tile.tile_type) {
        return match expand(usecase, &tile).await {
            Ok(generated) => Tile {
                label: tile.label,
                column_span: tile.column_span,
                row_span: tile.row_span,
                tiles: Some(generated),
                ..Tile::new(TileType::group())
            },
            Err(e) => {
                errors.push(e);
                tile
            }
        };
    }

    hydrate_direct(usecase, tile, errors)
}

fn hydrate_direct(usecase: &ConfigUsecase, mut tile: Tile, errors: &mut Vec<ConfigError>) -> Tile {
    match usecase.registry().lookup(&tile.tile_type, &tile.variant()) {
        Lookup::Tile(cfg) => {
            fill_poll_fields(&mut tile, cfg);
        }
        _ => errors.push(
            ConfigError::new(
                ConfigErrorId::UnableToHydrate,
                format!("no tile registered for {} (variant {})", tile.tile_type, tile.variant()),
            )
            .extract(tile.extract()),
        ),
    }
    tile
}

/// Expand a meta-tile into hydrated direct tiles.
async fn expand(usecase: &ConfigUsecase, tile: &Tile) -> Result<Vec<Tile>, ConfigError> {
    let variant = tile.variant();
    let params = tile
        .params
        .clone()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let resolution = usecase
        .expand_meta_tile(&tile.tile_type, &variant, &params)
        .await
        .map_err(|e| ConfigError::new(ConfigErrorId::UnableToHydrate, e.to_string()).extract(tile.extract()))?;

    resolution
        .results
        .into_iter()
        .map(|result| generated_tile(usecase, result, &variant, tile))
        .collect()
}

fn generated_tile(
    usecase: &ConfigUsecase,
    result: TileResult,
    variant: &Variant,
    meta_tile: &Tile,
) -> Result<Tile, ConfigError> {
    let unable = |message: String| {
        ConfigError::new(ConfigErrorId::UnableToHydrate, message).extract(meta_tile.extract())
    };

    if result.tile_type.is_structural() {
        return Ok(Tile {
            label: Some(result.label),
            ..Tile::new(result.tile_type)
        });
    }

    let cfg = match usecase.registry().lookup(&result.tile_type, variant) {
        Lookup::Tile(cfg) => cfg,
        _ => {
            return Err(unable(format!(
                "{} generated tile type {} which is not registered as a tile for variant {variant}",
                meta_tile.tile_type, result.tile_type
            )))
        }
    };

    let normalized = cfg
        .validator
        .validate(&Value::Object(result.params))
        .map_err(|e| unable(format!("{} generated invalid params: {e}", meta_tile.tile_type)))?;

    let mut tile = Tile {
        label: Some(result.label),
        params: Some(normalized),
        ..Tile::new(result.tile_type)
    };
    fill_poll_fields(&mut tile, cfg);
    Ok(tile)
}

fn fill_poll_fields(tile: &mut Tile, cfg: &TileConfig) {
    let params = tile.params.take();
    tile.url = Some(poll_url(&cfg.path, params.as_ref()));
    tile.initial_max_delay = Some(cfg.initial_max_delay);
    tile.config_variant = None;
}

/// `path` followed by the form-encoded params, if any.
///
/// Strings are written as-is, arrays as repeated keys, `null` is skipped and
/// anything else uses its JSON rendering.
pub fn poll_url(path: &str, params: Option<&Value>) -> String {
    let Some(Value::Object(params)) = params else {
        return path.to_string();
    };

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    append(&mut query, key, item);
                }
            }
            other => append(&mut query, key, other),
        }
    }
    let query = query.finish();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn append(query: &mut form_urlencoded::Serializer<'_, String>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            query.append_pair(key, s);
        }
        other => {
            query.append_pair(key, &other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn poll_url_without_params_is_the_path() {
        assert_eq!(poll_url("/ping", None), "/ping");
        assert_eq!(poll_url("/ping", Some(&json!({}))), "/ping");
    }

    #[test]
    fn poll_url_encodes_params() {
        let params = json!({
            "branch": "feature/a b",
            "hostname": "example.com",
            "ids": [1, 2],
            "skip": null,
            "verbose": true
        });
        assert_eq!(
            poll_url("/jenkins/build", Some(&params)),
            "/jenkins/build?branch=feature%2Fa+b&hostname=example.com&ids=1&ids=2&verbose=true"
        );
    }
}

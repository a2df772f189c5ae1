//! # Config Verification
//!
//! Checks a loaded config against the structural rules of the dashboard and
//! the tile registry. Every problem is recorded in the bag; verification
//! only stops early when the version is unusable, since nothing else about
//! the document can be trusted then.
//!
//! Validators run here, and their normalized params replace the client's in
//! the config, so hydration and fingerprinting see canonical input.

use serde_json::{Map, Value};
use tiles_core::{ConfigVersion, CURRENT_VERSION, MINIMAL_VERSION};
use tiles_registry::{Lookup, Registry};

use crate::bag::{ConfigBag, ConfigError, ConfigErrorId};
use crate::model::{Config, Tile};

/// Maximum accepted zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Verify the config held by `bag`, appending every error found.
///
/// Does nothing when the bag carries no config.
pub fn verify(registry: &Registry, bag: &mut ConfigBag) {
    let Some(config) = bag.config.as_mut() else {
        return;
    };
    let mut errors = Vec::new();

    if verify_version(config, &mut errors) {
        verify_layout(config, &mut errors);
        for tile in &mut config.tiles {
            verify_tile(registry, tile, false, &mut errors);
        }
    }

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "config verification failed");
    }
    bag.errors.extend(errors);
}

/// Returns false when the rest of the document must not be inspected.
fn verify_version(config: &Config, errors: &mut Vec<ConfigError>) -> bool {
    let Some(raw) = config.version.as_deref() else {
        errors.push(
            ConfigError::new(ConfigErrorId::MissingRequiredField, "version is required")
                .field("version"),
        );
        return false;
    };
    match ConfigVersion::parse_supported(raw) {
        Ok(_) => true,
        Err(e) => {
            errors.push(
                ConfigError::new(ConfigErrorId::UnsupportedVersion, e.to_string())
                    .field("version")
                    .value(raw)
                    .expected(format!("{MINIMAL_VERSION} to {CURRENT_VERSION}")),
            );
            false
        }
    }
}

fn verify_layout(config: &Config, errors: &mut Vec<ConfigError>) {
    match config.columns {
        None => errors.push(
            ConfigError::new(ConfigErrorId::MissingRequiredField, "columns is required")
                .field("columns"),
        ),
        Some(columns) if columns <= 0 => errors.push(
            ConfigError::new(ConfigErrorId::InvalidFieldValue, "columns must be positive")
                .field("columns")
                .value(columns.to_string())
                .expected("> 0"),
        ),
        Some(_) => {}
    }

    if let Some(zoom) = config.zoom {
        if !(zoom > 0.0 && zoom <= MAX_ZOOM) {
            errors.push(
                ConfigError::new(ConfigErrorId::InvalidFieldValue, "zoom is out of range")
                    .field("zoom")
                    .value(zoom.to_string())
                    .expected(format!("> 0 and <= {MAX_ZOOM}")),
            );
        }
    }

    if config.tiles.is_empty() {
        errors.push(
            ConfigError::new(ConfigErrorId::MissingRequiredField, "tiles must not be empty")
                .field("tiles"),
        );
    }
}

fn verify_tile(registry: &Registry, tile: &mut Tile, in_group: bool, errors: &mut Vec<ConfigError>) {
    verify_spans(tile, errors);

    if tile.url.is_some() {
        errors.push(unauthorized_field(tile, "url"));
    }
    if tile.initial_max_delay.is_some() {
        errors.push(unauthorized_field(tile, "initialMaxDelay"));
    }

    if tile.tile_type.is_empty_placeholder() {
        if in_group {
            errors.push(unauthorized_subtile(tile));
        }
        if tile.params.is_some() {
            errors.push(unauthorized_field(tile, "params"));
        }
        if tile.tiles.is_some() {
            errors.push(unauthorized_field(tile, "tiles"));
        }
    } else if tile.tile_type.is_group() {
        if in_group {
            errors.push(unauthorized_subtile(tile));
        }
        if tile.params.is_some() {
            errors.push(unauthorized_field(tile, "params"));
        }
        if tile.tiles.as_ref().is_some_and(|children| !children.is_empty()) {
            for child in tile.tiles.iter_mut().flatten() {
                verify_tile(registry, child, true, errors);
            }
        } else {
            errors.push(
                ConfigError::new(
                    ConfigErrorId::MissingRequiredField,
                    "a GROUP tile needs at least one sub-tile",
                )
                .field("tiles")
                .extract(tile.extract()),
            );
        }
    } else {
        if tile.tiles.is_some() {
            errors.push(unauthorized_field(tile, "tiles"));
        }
        verify_registered(registry, tile, errors);
    }
}

fn verify_spans(tile: &Tile, errors: &mut Vec<ConfigError>) {
    for (name, span) in [("columnSpan", tile.column_span), ("rowSpan", tile.row_span)] {
        if let Some(span) = span {
            if span <= 0 {
                errors.push(
                    ConfigError::new(ConfigErrorId::InvalidFieldValue, format!("{name} must be positive"))
                        .field(name)
                        .value(span.to_string())
                        .expected("> 0")
                        .extract(tile.extract()),
                );
            }
        }
    }
}

fn verify_registered(registry: &Registry, tile: &mut Tile, errors: &mut Vec<ConfigError>) {
    if !registry.is_authorized(&tile.tile_type) {
        errors.push(
            ConfigError::new(
                ConfigErrorId::UnknownTileType,
                format!("unknown tile type {}", tile.tile_type),
            )
            .field("type")
            .value(tile.tile_type.as_str())
            .expected(join(registry.tile_types()))
            .extract(tile.extract()),
        );
        return;
    }

    let variant = tile.variant();
    let validator = match registry.lookup(&tile.tile_type, &variant) {
        Lookup::Tile(cfg) => cfg.validator.clone(),
        Lookup::MetaTile(cfg) => cfg.validator.clone(),
        Lookup::NotFound => {
            errors.push(
                ConfigError::new(
                    ConfigErrorId::UnknownVariant,
                    format!("unknown variant {variant} for tile type {}", tile.tile_type),
                )
                .field("configVariant")
                .value(variant.as_str())
                .expected(join(registry.variants(&tile.tile_type)))
                .extract(tile.extract()),
            );
            return;
        }
    };

    let params = tile
        .params
        .clone()
        .unwrap_or_else(|| Value::Object(Map::new()));
    match validator.validate(&params) {
        Ok(normalized) => tile.params = Some(normalized),
        Err(rejection) => {
            let extract = tile.extract();
            errors.extend(rejection.reasons.into_iter().map(|reason| {
                ConfigError::new(ConfigErrorId::InvalidParams, reason)
                    .field("params")
                    .extract(extract.clone())
            }));
        }
    }
}

fn unauthorized_field(tile: &Tile, field: &str) -> ConfigError {
    ConfigError::new(
        ConfigErrorId::UnauthorizedField,
        format!("field {field} is not allowed on a {} tile", tile.tile_type),
    )
    .field(field)
    .extract(tile.extract())
}

fn unauthorized_subtile(tile: &Tile) -> ConfigError {
    ConfigError::new(
        ConfigErrorId::UnauthorizedSubtileType,
        format!("a {} tile cannot be placed inside a GROUP", tile.tile_type),
    )
    .field("type")
    .value(tile.tile_type.as_str())
    .extract(tile.extract())
}

fn join<T: std::fmt::Display>(items: Vec<T>) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Usecase error types.

use thiserror::Error;
use tiles_core::{CanonicalizationError, TileType, Variant};
use tiles_registry::ValidationError;
use tiles_store::BuildFailure;

/// Errors from meta-tile expansion.
///
/// None of these are retried inside the core.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No meta-tile is registered for the pair.
    #[error("unknown meta-tile {tile_type} (variant {variant})")]
    UnknownTile { tile_type: TileType, variant: Variant },

    /// The registered validator rejected the params.
    #[error("params of {tile_type} (variant {variant}) rejected: {source}")]
    ValidationFailed {
        tile_type: TileType,
        variant: Variant,
        source: ValidationError,
    },

    /// The builder failed or timed out and no fresh cached expansion exists.
    #[error("unable to expand {tile_type} (variant {variant}): {source}")]
    BuilderFailed {
        tile_type: TileType,
        variant: Variant,
        source: BuildFailure,
    },

    /// The normalized params could not be fingerprinted.
    #[error("unable to fingerprint meta-tile params: {0}")]
    Fingerprint(#[from] CanonicalizationError),
}

/// Errors from loading a config.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Nothing exists at the location.
    #[error("config not found at {location}")]
    NotFound { location: String },

    /// The file exists but could not be read.
    #[error("unable to read config {location}: {source}")]
    Read {
        location: String,
        source: std::io::Error,
    },

    /// The HTTP request failed at the transport level.
    #[error("unable to fetch config {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    /// The server answered with a non-success status.
    #[error("config server {url} returned {status}")]
    Status { url: String, status: u16 },

    /// The content is not a valid config document.
    #[error("unable to parse config {location}: {source}")]
    Parse {
        location: String,
        source: serde_json::Error,
    },

    /// The HTTP client could not be built.
    #[error("config loader misconfigured: {0}")]
    Client(reqwest::Error),
}

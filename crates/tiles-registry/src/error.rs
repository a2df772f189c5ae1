//! Registry error types.

use thiserror::Error;
use tiles_core::{TileType, Variant};

/// Errors from registry maintenance operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The operation has no defined behavior yet.
    #[error("{operation} is not implemented (tile {tile_type}, variant {variant})")]
    NotImplemented {
        /// Name of the unimplemented operation.
        operation: &'static str,
        /// Tile type the caller targeted.
        tile_type: TileType,
        /// Variant the caller targeted.
        variant: Variant,
    },
}

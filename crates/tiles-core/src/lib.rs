//! # tiles-core — Foundational Types for the Tile Core
//!
//! Defines the vocabulary shared by every other crate in the workspace: what a
//! tile type is, how variants are named, what a meta-tile builder produces,
//! which config versions are accepted, and how a meta-tile invocation is
//! turned into a stable cache key.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identifiers.** `TileType` and `Variant` are distinct
//!    types; a variant cannot be passed where a tile type is expected.
//!
//! 2. **`CanonicalBytes` for every fingerprint.** Invocation fingerprints are
//!    only computed over RFC 8785 canonical JSON, so two semantically equal
//!    parameter payloads always map to the same cache entry regardless of key
//!    order.
//!
//! 3. **Structural tile types are constants.** `EMPTY` and `GROUP` are
//!    reserved and carry no configuration.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tiles-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod fingerprint;
pub mod result;
pub mod tile;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, VersionError};
pub use fingerprint::{Fingerprint, META_TILE_STORE_KEY_PREFIX};
pub use result::TileResult;
pub use tile::{TileType, Variant, DEFAULT_VARIANT};
pub use version::{ConfigVersion, CURRENT_VERSION, MINIMAL_VERSION};

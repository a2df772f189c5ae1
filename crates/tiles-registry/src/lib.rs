//! # tiles-registry — Provider Registration Tables
//!
//! Tile providers describe themselves to the core exactly once, at process
//! start, by calling [`Registry::register_tile`] or
//! [`Registry::register_meta_tile`]. After startup the registry is wrapped in
//! an `Arc` and only read.
//!
//! ## Two Tables
//!
//! | Table       | Key                  | Value                           |
//! |-------------|----------------------|---------------------------------|
//! | direct      | `TileType × Variant` | [`TileConfig`] (validator, poll path, initial max delay) |
//! | meta-tiles  | `TileType × Variant` | [`MetaTileConfig`] (validator, builder) |
//!
//! A tile type lives in at most one of the two tables. [`Registry::lookup`]
//! returns the tagged [`Lookup`] so callers match exhaustively on the kind of
//! tile they got.
//!
//! ## Crate Policy
//!
//! - Validators and builders are trait objects supplied by providers; this
//!   crate never depends on provider types.
//! - Lookup misses are values (`Lookup::NotFound`), never panics.

pub mod builder;
pub mod describe;
pub mod error;
pub mod registry;
pub mod validator;

pub use builder::{BuilderError, FnBuilder, MetaTileBuilder};
pub use describe::{RegistryDescription, VariantDescription};
pub use error::RegistryError;
pub use registry::{Lookup, MetaTileConfig, Registry, TileConfig};
pub use validator::{AcceptObject, TileParams, TypedValidator, ValidationError, Validator};

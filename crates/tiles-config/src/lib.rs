//! # tiles-config — Dashboard Config Usecase
//!
//! Loads client dashboard configs, verifies them against the tile registry
//! and hydrates them into what the dashboard polls.
//!
//! ```text
//! ConfigSource ─► get_config ─► ConfigBag ─► verify ─► hydrate ─► ConfigBag
//!                                                         │
//!                                              expand_meta_tile
//!                                                         │
//!                                              CacheBackedResolver
//! ```
//!
//! Problems are accumulated in the [`ConfigBag`] rather than returned as
//! errors, so a single response tells the user everything wrong with their
//! config. Only [`ConfigUsecase::expand_meta_tile`], which request handlers
//! also call directly, returns a typed error.
//!
//! ## Crate Policy
//!
//! - Verification never touches the resolver; builds only happen during
//!   hydration or a direct `expand_meta_tile` call.
//! - No binary and no transport: the HTTP surface lives elsewhere.

pub mod bag;
pub mod error;
pub mod hydrate;
pub mod model;
pub mod repository;
pub mod settings;
pub mod usecase;
pub mod verify;

pub use bag::{ConfigBag, ConfigError, ConfigErrorData, ConfigErrorId};
pub use error::{RepositoryError, ResolveError};
pub use hydrate::poll_url;
pub use model::{Config, Tile};
pub use repository::{ConfigLoader, ConfigRepository};
pub use settings::UsecaseSettings;
pub use usecase::{ConfigSource, ConfigUsecase};

//! # tiles-store — Cache-Backed Meta-Tile Resolution
//!
//! Meta-tile builders call downstream services that may be slow or down. This
//! crate keeps the dashboard usable anyway: every successful expansion is
//! written to a [`ResultStore`], and when a later build fails or misses its
//! deadline the [`CacheBackedResolver`] serves the last expansion that is
//! still inside the freshness window.
//!
//! ## Paths
//!
//! ```text
//! get_or_build ─┬─ fresh:    build under deadline ─▶ write-through ─▶ Fresh
//!               └─ fallback: store.get(key) ─▶ age ≤ window ─▶ Cached
//!                                           └─ otherwise ─▶ BuildFailure
//! ```
//!
//! ## Crate Policy
//!
//! - The resolver owns the expiration policy; stores only hold bytes and a
//!   best-effort TTL.
//! - A store that cannot be reached never fails a request on its own; it
//!   only removes the fallback.

pub mod memory;
pub mod resolver;
pub mod settings;
pub mod store;

pub use memory::MemoryStore;
pub use resolver::{BuildFailure, CacheBackedResolver, Resolution, ResultSource};
pub use settings::ResolverSettings;
pub use store::{CachedResults, ResultStore, StoreError};

//! # Meta-Tile Builders
//!
//! A builder turns the normalized parameters of a meta-tile into the concrete
//! tiles it currently stands for, usually by calling a downstream service
//! (list the open pull requests, list the jobs of a CI folder, ...).
//!
//! Builders are async so the resolver can bound them with a deadline and drop
//! the in-flight call when the deadline passes.

use std::error::Error as StdError;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tiles_core::TileResult;

/// Failure reported by a builder.
#[derive(Error, Debug)]
pub enum BuilderError {
    /// The downstream service could not be reached or answered with an error.
    #[error("downstream unavailable: {reason}")]
    Unavailable {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// The builder could not interpret its parameters.
    #[error("builder rejected params: {reason}")]
    InvalidParams {
        /// Why the params were rejected.
        reason: String,
    },

    /// Any other error raised by provider code.
    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl BuilderError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Expands a meta-tile into concrete tiles.
///
/// The returned order is preserved all the way to the client; the core never
/// sorts, deduplicates or merges results.
#[async_trait]
pub trait MetaTileBuilder: Send + Sync {
    async fn build(&self, params: &Value) -> Result<Vec<TileResult>, BuilderError>;
}

/// Adapter turning a synchronous closure into a [`MetaTileBuilder`].
pub struct FnBuilder<F> {
    f: F,
}

impl<F> FnBuilder<F>
where
    F: Fn(&Value) -> Result<Vec<TileResult>, BuilderError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> MetaTileBuilder for FnBuilder<F>
where
    F: Fn(&Value) -> Result<Vec<TileResult>, BuilderError> + Send + Sync,
{
    async fn build(&self, params: &Value) -> Result<Vec<TileResult>, BuilderError> {
        (self.f)(params)
    }
}

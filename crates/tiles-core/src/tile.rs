//! # Tile Identity Newtypes
//!
//! `TileType` names a kind of tile (a CI status, an uptime check, a grouping
//! container). `Variant` distinguishes independently configured instances of
//! the same tile type. Both serialize as bare strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Variant used when a client config does not name one.
pub const DEFAULT_VARIANT: &str = "default";

/// Identifier of a kind of tile.
///
/// Two values are reserved: [`TileType::EMPTY`] (a blank placeholder cell)
/// and [`TileType::GROUP`] (a container of other tiles). They are structural,
/// never polled, and carry no configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileType(String);

impl TileType {
    /// Name of the reserved placeholder tile type.
    pub const EMPTY: &'static str = "EMPTY";
    /// Name of the reserved container tile type.
    pub const GROUP: &'static str = "GROUP";

    /// Create a tile type from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The reserved placeholder tile type.
    pub fn empty() -> Self {
        Self::new(Self::EMPTY)
    }

    /// The reserved container tile type.
    pub fn group() -> Self {
        Self::new(Self::GROUP)
    }

    /// Access the tile type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty_placeholder(&self) -> bool {
        self.0 == Self::EMPTY
    }

    pub fn is_group(&self) -> bool {
        self.0 == Self::GROUP
    }

    /// Whether this is one of the reserved, configuration-free tile types.
    pub fn is_structural(&self) -> bool {
        self.is_empty_placeholder() || self.is_group()
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Named configuration of a tile type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(String);

impl Variant {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Access the variant name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_VARIANT
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::new(DEFAULT_VARIANT)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Variant {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

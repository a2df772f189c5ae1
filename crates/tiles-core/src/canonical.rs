//! # Canonical Serialization — JCS Byte Production
//!
//! Defines `CanonicalBytes`, the only input accepted by fingerprint
//! computation.
//!
//! ## Invariant
//!
//! The inner buffer is private and produced exclusively by serializing through
//! `serde_json::Value` and then `serde_jcs` (RFC 8785): object keys sorted,
//! compact separators, deterministic number formatting. Two parameter payloads
//! that differ only in key order therefore yield identical bytes, which is what
//! makes a meta-tile invocation's cache key stable across clients.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (for example a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

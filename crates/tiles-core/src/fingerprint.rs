//! # Invocation Fingerprints
//!
//! A `Fingerprint` identifies one meta-tile invocation: the tile type, the
//! variant and the normalized parameters handed to the builder. It is the key
//! under which the last successful expansion is cached.
//!
//! The digest is SHA-256 over the canonical JSON of
//! `{"params": ..., "tileType": ..., "variant": ...}`, so parameter key order
//! never produces a different cache entry.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CanonicalizationError;
use crate::tile::{TileType, Variant};

/// Namespace prepended to every fingerprint when used as a store key.
pub const META_TILE_STORE_KEY_PREFIX: &str = "tiles.config.meta-tile";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Invocation<'a> {
    tile_type: &'a TileType,
    variant: &'a Variant,
    params: &'a Value,
}

/// Deterministic cache key of a meta-tile invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// The raw 32-byte SHA-256 digest.
    pub bytes: [u8; 32],
}

impl Fingerprint {
    /// Compute the fingerprint of `(tile_type, variant, params)`.
    ///
    /// `params` must be the validator-normalized payload, not the raw client
    /// input, so that equivalent client spellings share a cache entry.
    pub fn of(
        tile_type: &TileType,
        variant: &Variant,
        params: &Value,
    ) -> Result<Self, CanonicalizationError> {
        let canonical = CanonicalBytes::new(&Invocation {
            tile_type,
            variant,
            params,
        })?;
        Ok(Self::from_canonical(&canonical))
    }

    /// Digest already-canonicalized bytes.
    pub fn from_canonical(data: &CanonicalBytes) -> Self {
        let hash = Sha256::digest(data.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self { bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The key used in the downstream result store.
    pub fn store_key(&self) -> String {
        format!("{META_TILE_STORE_KEY_PREFIX}:{}", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Fingerprints are independent of the insertion order of params.
        #[test]
        fn fingerprint_ignores_insertion_order(
            entries in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8)
        ) {
            let forward: serde_json::Map<String, Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::json!(v)))
                .collect();
            let backward: serde_json::Map<String, Value> = entries
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), serde_json::json!(v)))
                .collect();
            let tile_type = TileType::new("META");
            let variant = Variant::default();
            let a = Fingerprint::of(&tile_type, &variant, &Value::Object(forward)).unwrap();
            let b = Fingerprint::of(&tile_type, &variant, &Value::Object(backward)).unwrap();
            prop_assert_eq!(a, b);
        }

        /// The hex rendering is always 64 lowercase hex characters.
        #[test]
        fn fingerprint_hex_shape(s in "[a-zA-Z0-9 ]{0,40}") {
            let f = Fingerprint::of(&TileType::new("META"), &Variant::new(s.clone()), &Value::String(s)).unwrap();
            let hex = f.to_hex();
            prop_assert_eq!(hex.len(), 64);
            prop_assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}

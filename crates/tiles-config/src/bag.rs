//! # Config Bag and Error Catalogue
//!
//! A `ConfigBag` travels through load → verify → hydrate and collects every
//! problem found on the way instead of stopping at the first one, so users
//! can fix their whole config in one pass. The transport layer serializes
//! the bag as-is.

use serde::Serialize;

use crate::model::Config;

/// Stable identifiers of config errors, as seen by dashboard clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConfigErrorId {
    #[serde(rename = "ERROR_CONFIG_NOT_FOUND")]
    ConfigNotFound,
    #[serde(rename = "ERROR_UNABLE_TO_PARSE_CONFIG")]
    UnableToParseConfig,
    #[serde(rename = "ERROR_UNSUPPORTED_VERSION")]
    UnsupportedVersion,
    #[serde(rename = "ERROR_MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    #[serde(rename = "ERROR_INVALID_FIELD_VALUE")]
    InvalidFieldValue,
    #[serde(rename = "ERROR_UNAUTHORIZED_FIELD")]
    UnauthorizedField,
    #[serde(rename = "ERROR_UNKNOWN_TILE_TYPE")]
    UnknownTileType,
    #[serde(rename = "ERROR_UNKNOWN_VARIANT")]
    UnknownVariant,
    #[serde(rename = "ERROR_UNAUTHORIZED_SUBTILE_TYPE")]
    UnauthorizedSubtileType,
    #[serde(rename = "ERROR_INVALID_PARAMS")]
    InvalidParams,
    #[serde(rename = "ERROR_UNABLE_TO_HYDRATE")]
    UnableToHydrate,
}

/// Context attached to a config error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// JSON of the offending tile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_extract: Option<String>,
}

/// One problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigError {
    pub id: ConfigErrorId,
    pub message: String,
    pub data: ConfigErrorData,
}

impl ConfigError {
    pub fn new(id: ConfigErrorId, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
            data: ConfigErrorData::default(),
        }
    }

    pub fn field(mut self, field_name: impl Into<String>) -> Self {
        self.data.field_name = Some(field_name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.data.value = Some(value.into());
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.data.expected = Some(expected.into());
        self
    }

    pub fn extract(mut self, config_extract: impl Into<String>) -> Self {
        self.data.config_extract = Some(config_extract.into());
        self
    }
}

/// A config together with the errors found so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigBag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ConfigError>,
}

impl ConfigBag {
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Some(config),
            errors: Vec::new(),
        }
    }

    pub fn with_error(error: ConfigError) -> Self {
        Self {
            config: None,
            errors: vec![error],
        }
    }

    pub fn add_error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Ids of the collected errors, in discovery order.
    pub fn error_ids(&self) -> Vec<ConfigErrorId> {
        self.errors.iter().map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_serializes_with_stable_id() {
        let error = ConfigError::new(ConfigErrorId::UnknownTileType, "unknown type")
            .field("type")
            .value("FOO")
            .expected("EMPTY, GROUP")
            .extract(r#"{"type":"FOO"}"#);
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({
                "id": "ERROR_UNKNOWN_TILE_TYPE",
                "message": "unknown type",
                "data": {
                    "fieldName": "type",
                    "value": "FOO",
                    "expected": "EMPTY, GROUP",
                    "configExtract": "{\"type\":\"FOO\"}"
                }
            })
        );
    }

    #[test]
    fn empty_bag_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(ConfigBag::default()).unwrap(), json!({}));
    }
}

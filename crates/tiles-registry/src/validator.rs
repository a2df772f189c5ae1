//! # Validator — Provider Parameter Checks
//!
//! Each registered tile variant carries a validator. The core calls it on the
//! raw `params` object a client declared and forwards its verdict verbatim:
//! on acceptance the returned normalized payload replaces the raw one, on
//! rejection the validator's messages become config errors.
//!
//! Providers usually describe their parameters as a serde struct and wrap it
//! in [`TypedValidator`], which deserializes, runs [`TileParams::errors`] and
//! serializes the struct back as the normalized payload. Defaults are filled
//! in and unknown fields are dropped, or rejected when the struct uses
//! `#[serde(deny_unknown_fields)]`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Rejection returned by a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid params: {}", .reasons.join("; "))]
pub struct ValidationError {
    /// Human-readable reasons, one per violated constraint.
    pub reasons: Vec<String>,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reasons: vec![reason.into()],
        }
    }

    pub fn many(reasons: Vec<String>) -> Self {
        Self { reasons }
    }
}

/// Validates and normalizes the parameters of one tile variant.
///
/// Implementations must be `Send + Sync`; the registry is shared across
/// request handlers behind an `Arc`.
pub trait Validator: Send + Sync {
    /// Check `params` and return the normalized payload.
    fn validate(&self, params: &Value) -> Result<Value, ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<Value, ValidationError> + Send + Sync,
{
    fn validate(&self, params: &Value) -> Result<Value, ValidationError> {
        self(params)
    }
}

/// Accepts any JSON object unchanged and rejects every other JSON value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptObject;

impl Validator for AcceptObject {
    fn validate(&self, params: &Value) -> Result<Value, ValidationError> {
        match params {
            Value::Object(_) => Ok(params.clone()),
            other => Err(ValidationError::new(format!(
                "params must be an object, got {}",
                json_kind(other)
            ))),
        }
    }
}

/// Parameter struct of a tile provider.
pub trait TileParams: DeserializeOwned + Serialize {
    /// Semantic checks that serde cannot express. Empty means valid.
    fn errors(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Validator backed by a [`TileParams`] struct.
pub struct TypedValidator<P> {
    _params: PhantomData<fn() -> P>,
}

impl<P> TypedValidator<P> {
    pub fn new() -> Self {
        Self {
            _params: PhantomData,
        }
    }
}

impl<P> Default for TypedValidator<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for TypedValidator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedValidator")
            .field("params", &std::any::type_name::<P>())
            .finish()
    }
}

impl<P: TileParams> Validator for TypedValidator<P> {
    fn validate(&self, params: &Value) -> Result<Value, ValidationError> {
        let parsed: P = serde_json::from_value(params.clone())
            .map_err(|e| ValidationError::new(e.to_string()))?;
        let errors = parsed.errors();
        if !errors.is_empty() {
            return Err(ValidationError::many(errors));
        }
        serde_json::to_value(&parsed).map_err(|e| ValidationError::new(e.to_string()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

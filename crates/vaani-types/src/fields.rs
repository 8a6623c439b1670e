//! Field extraction for loosely-typed JSON request bodies.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::MAX_TEXT_BYTES;

/// A request body failed validation. Maps to `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("`{0}` is required and must be a string")]
    MissingField(&'static str),

    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("`{field}` must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("`{field}` exceeds maximum size: {len} bytes (limit: {limit} bytes)")]
    TooLarge {
        field: &'static str,
        len: usize,
        limit: usize,
    },
}

pub(crate) fn required_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, RequestError> {
    match object.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        _ => Err(RequestError::MissingField(field)),
    }
}

pub(crate) fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, RequestError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(RequestError::WrongType {
            field,
            expected: "string",
        }),
    }
}

pub(crate) fn optional_number(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<f64>, RequestError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or(RequestError::WrongType {
            field,
            expected: "number",
        }),
    }
}

pub(crate) fn check_text(field: &'static str, value: &str) -> Result<(), RequestError> {
    if value.is_empty() {
        return Err(RequestError::EmptyField(field));
    }
    if value.len() > MAX_TEXT_BYTES {
        return Err(RequestError::TooLarge {
            field,
            len: value.len(),
            limit: MAX_TEXT_BYTES,
        });
    }
    Ok(())
}

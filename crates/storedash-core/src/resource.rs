//! The seam between entity types and the generic synchronizer.
//!
//! Every entity mirrored from the admin API implements [`Resource`]; the ones
//! with an active/inactive switch also implement [`Toggleable`]. Response
//! bodies are decoded through [`decode_collection`] and [`decode_record`],
//! which accept either a bare payload or one wrapped in an envelope object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::status::ActiveStatus;

/// An entity mirrored from one REST collection, keyed by its server id.
pub trait Resource: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Singular display name used in notices, e.g. `"Category"`.
    const LABEL: &'static str;

    /// Server-assigned identifier.
    fn id(&self) -> &str;
}

/// An entity whose status flips between active and inactive.
pub trait Toggleable: Resource {
    /// Current status, or `None` when the entity is in a terminal state that
    /// cannot be toggled.
    fn active_status(&self) -> Option<ActiveStatus>;

    fn set_active_status(&mut self, status: ActiveStatus);

    /// Notice shown when a toggle is refused because `active_status` is `None`.
    fn frozen_message(&self) -> String {
        format!("{} status can no longer be changed", Self::LABEL)
    }
}

/// Response body did not have the shape the client expects.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("expected an array, got {found}")]
    NotACollection { found: &'static str },

    #[error("expected an object, got {found}")]
    NotARecord { found: &'static str },

    #[error("element {index} is malformed: {source}")]
    BadElement {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record is malformed: {0}")]
    BadRecord(#[source] serde_json::Error),
}

/// Short JSON type name for error messages.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes a list response.
///
/// Accepts a bare array, or an object holding the array under the first of
/// `envelope_keys` that is present. Every element must decode as `T`; a single
/// bad element rejects the whole collection so the caller never applies a
/// partial list.
///
/// # Errors
///
/// Returns [`ShapeError::NotACollection`] when no array is found and
/// [`ShapeError::BadElement`] for the first element that fails to decode.
pub fn decode_collection<T: DeserializeOwned>(
    body: Value,
    envelope_keys: &[&str],
) -> Result<Vec<T>, ShapeError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let found = envelope_keys
                .iter()
                .find_map(|key| map.remove(*key))
                .ok_or(ShapeError::NotACollection {
                    found: "an object",
                })?;
            match found {
                Value::Array(items) => items,
                other => {
                    return Err(ShapeError::NotACollection {
                        found: json_kind(&other),
                    })
                }
            }
        }
        other => {
            return Err(ShapeError::NotACollection {
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| ShapeError::BadElement { index, source })
        })
        .collect()
}

/// Decodes a single-record response, unwrapping `{ "<key>": { ... } }`
/// envelopes when one of `envelope_keys` holds an object.
///
/// # Errors
///
/// Returns [`ShapeError::NotARecord`] for non-object bodies and
/// [`ShapeError::BadRecord`] when the object does not decode as `T`.
pub fn decode_record<T: DeserializeOwned>(
    body: Value,
    envelope_keys: &[&str],
) -> Result<T, ShapeError> {
    let mut map = match body {
        Value::Object(map) => map,
        other => {
            return Err(ShapeError::NotARecord {
                found: json_kind(&other),
            })
        }
    };

    let inner = envelope_keys
        .iter()
        .find(|key| map.get(**key).is_some_and(Value::is_object))
        .and_then(|key| map.remove(*key));

    let record = inner.unwrap_or(Value::Object(map));
    serde_json::from_value(record).map_err(ShapeError::BadRecord)
}

/// Overlays the fields present in an update response onto `current`.
///
/// Update endpoints sometimes answer with a partial record (say, only `_id`
/// and `name`). Fields the server sent win; fields it omitted keep their
/// confirmed values. Envelopes are unwrapped as in [`decode_record`].
///
/// # Errors
///
/// Returns [`ShapeError::NotARecord`] for non-object bodies and
/// [`ShapeError::BadRecord`] when the merged object does not decode as `T`.
pub fn merge_record<T>(current: &T, body: Value, envelope_keys: &[&str]) -> Result<T, ShapeError>
where
    T: Serialize + DeserializeOwned,
{
    let patch: Map<String, Value> = decode_record(body, envelope_keys)?;
    let mut merged = match serde_json::to_value(current).map_err(ShapeError::BadRecord)? {
        Value::Object(map) => map,
        other => {
            return Err(ShapeError::NotARecord {
                found: json_kind(&other),
            })
        }
    };
    merged.extend(patch);
    serde_json::from_value(Value::Object(merged)).map_err(ShapeError::BadRecord)
}

/// Accepts ids sent either as strings or as bare numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

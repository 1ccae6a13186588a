//! JSON codec for JSON Patch operations.
//!
//! Converts operations to and from `serde_json::Value` in RFC 6902 format and
//! wires [`PatchDocument`] and [`Op`] into serde through the same functions.

use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::json_patch::types::{JsonPointer, Op, OperationKind, PatchDocument, PatchError};
use crate::json_patch::validate::{
    validate_operation, ValidationError, OP_FROM_INVALID, OP_INVALID, OP_PATH_INVALID,
    OP_VALUE_MISSING,
};
use crate::json_patch::value::PatchValue;

// ── Helpers ───────────────────────────────────────────────────────────────

fn encode_path(path: &JsonPointer) -> Value {
    Value::String(path.to_string())
}

fn decode_pointer(
    map: &Map<String, Value>,
    key: &str,
    reason: &'static str,
) -> Result<JsonPointer, ValidationError> {
    map.get(key)
        .and_then(Value::as_str)
        .and_then(|s| JsonPointer::parse(s).ok())
        .ok_or(ValidationError::Invalid(reason))
}

fn decode_value(map: &Map<String, Value>) -> Result<PatchValue, ValidationError> {
    map.get("value")
        .cloned()
        .map(PatchValue::new)
        .ok_or(ValidationError::Invalid(OP_VALUE_MISSING))
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an `Op` to a `serde_json::Value` in the JSON Patch format.
pub fn to_json(op: &Op) -> Value {
    match op {
        Op::Add { path, value } => json!({
            "op": "add",
            "path": encode_path(path),
            "value": value.as_value()
        }),
        Op::Copy { from, path } => json!({
            "op": "copy",
            "from": encode_path(from),
            "path": encode_path(path)
        }),
        Op::Move { from, path } => json!({
            "op": "move",
            "from": encode_path(from),
            "path": encode_path(path)
        }),
        Op::Remove { path } => json!({
            "op": "remove",
            "path": encode_path(path)
        }),
        Op::Replace { path, value } => json!({
            "op": "replace",
            "path": encode_path(path),
            "value": value.as_value()
        }),
        Op::Test { path, value } => json!({
            "op": "test",
            "path": encode_path(path),
            "value": value.as_value()
        }),
    }
}

/// Serialize a whole patch document to a JSON array.
pub fn to_json_patch(patch: &PatchDocument) -> Value {
    Value::Array(patch.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

fn decode(v: &Value) -> Result<Op, ValidationError> {
    let kind = validate_operation(v)?;
    let map = v.as_object().ok_or(ValidationError::Invalid(OP_INVALID))?;
    let path = decode_pointer(map, "path", OP_PATH_INVALID)?;

    let op = match kind {
        OperationKind::Add => Op::Add {
            path,
            value: decode_value(map)?,
        },
        OperationKind::Copy => Op::Copy {
            from: decode_pointer(map, "from", OP_FROM_INVALID)?,
            path,
        },
        OperationKind::Move => Op::Move {
            from: decode_pointer(map, "from", OP_FROM_INVALID)?,
            path,
        },
        OperationKind::Remove => Op::Remove { path },
        OperationKind::Replace => Op::Replace {
            path,
            value: decode_value(map)?,
        },
        OperationKind::Test => Op::Test {
            path,
            value: decode_value(map)?,
        },
    };
    Ok(op)
}

/// Deserialize a single operation.
pub fn from_json(v: &Value) -> Result<Op, PatchError> {
    Ok(decode(v)?)
}

/// Deserialize a patch document.
///
/// Either every operation decodes or the whole document is rejected with the
/// index of the first malformed operation; no partial document is returned.
///
/// # Example
///
/// ```
/// use patchkit::json_patch::{from_json_patch, OperationKind, PatchError};
/// use serde_json::json;
///
/// let patch = from_json_patch(&json!([
///     {"op": "add", "path": "/a", "value": 1},
///     {"op": "move", "from": "/a", "path": "/b"}
/// ]))
/// .unwrap();
/// assert_eq!(patch.ops()[1].kind(), OperationKind::Move);
///
/// let err = from_json_patch(&json!([{"op": "add", "path": "/a"}])).unwrap_err();
/// assert!(matches!(err, PatchError::Validation(_)));
/// ```
pub fn from_json_patch(v: &Value) -> Result<PatchDocument, PatchError> {
    let arr = v.as_array().ok_or(ValidationError::NotAnArray)?;
    let ops = arr
        .iter()
        .enumerate()
        .map(|(index, op)| decode(op).map_err(|e| e.at(index)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PatchDocument::new(ops))
}

impl PatchDocument {
    /// Parse a patch document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PatchError> {
        let value: Value = serde_json::from_slice(bytes)?;
        from_json_patch(&value)
    }

    pub fn to_json(&self) -> Value {
        to_json_patch(self)
    }
}

impl FromStr for PatchDocument {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)?;
        from_json_patch(&value)
    }
}

impl Serialize for Op {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode(&value).map_err(D::Error::custom)
    }
}

impl Serialize for PatchDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json_patch(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PatchDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        from_json_patch(&value).map_err(D::Error::custom)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

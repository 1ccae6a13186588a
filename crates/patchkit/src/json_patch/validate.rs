//! JSON Patch operation validator.
//!
//! Validates raw operations (as `serde_json::Value`) against the field table
//! of their kind before anything is decoded, so untrusted input can be
//! checked up front:
//!
//! | kind    | path | from | value |
//! |---------|------|------|-------|
//! | add     | yes  |      | yes   |
//! | copy    | yes  | yes  |       |
//! | move    | yes  | yes  |       |
//! | remove  | yes  |      |       |
//! | replace | yes  |      | yes   |
//! | test    | yes  |      | yes   |
//!
//! Members not listed for a kind are ignored.

use patchkit_json_pointer::validate_json_pointer;
use serde_json::{Map, Value};
use thiserror::Error;

use super::types::OperationKind;

pub const OP_INVALID: &str = "OP_INVALID";
pub const OP_UNKNOWN: &str = "OP_UNKNOWN";
pub const OP_PATH_INVALID: &str = "OP_PATH_INVALID";
pub const OP_FROM_INVALID: &str = "OP_FROM_INVALID";
pub const OP_VALUE_MISSING: &str = "OP_VALUE_MISSING";

/// Error returned by validation functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Not an array.")]
    NotAnArray,
    #[error("{0}")]
    Invalid(&'static str),
    #[error("Error in operation [index = {index}] ({reason}).")]
    Operation { index: usize, reason: &'static str },
}

impl ValidationError {
    /// Attach the index of the failing operation.
    pub fn at(self, index: usize) -> Self {
        match self {
            ValidationError::Invalid(reason) => ValidationError::Operation { index, reason },
            other => other,
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            ValidationError::NotAnArray => None,
            ValidationError::Invalid(reason) | ValidationError::Operation { reason, .. } => {
                Some(reason)
            }
        }
    }
}

/// Validate a list of operations.
///
/// Errors carry the index of the first failing operation:
/// `"Error in operation [index = N] (REASON)."`. An empty list is valid.
///
/// # Example
///
/// ```
/// use patchkit::json_patch::validate::validate_operations;
/// use serde_json::json;
///
/// validate_operations(&json!([{"op": "remove", "path": "/a"}])).unwrap();
///
/// let err = validate_operations(&json!([
///     {"op": "remove", "path": "/a"},
///     {"op": "add", "path": "/b"}
/// ]))
/// .unwrap_err();
/// assert_eq!(err.to_string(), "Error in operation [index = 1] (OP_VALUE_MISSING).");
/// ```
pub fn validate_operations(ops: &Value) -> Result<(), ValidationError> {
    let arr = ops.as_array().ok_or(ValidationError::NotAnArray)?;
    for (index, op) in arr.iter().enumerate() {
        validate_operation(op).map_err(|e| e.at(index))?;
    }
    Ok(())
}

/// Validate a single operation object and return its kind.
pub fn validate_operation(op: &Value) -> Result<OperationKind, ValidationError> {
    let map = op.as_object().ok_or(ValidationError::Invalid(OP_INVALID))?;

    let kind = map
        .get("op")
        .and_then(Value::as_str)
        .and_then(OperationKind::from_name)
        .ok_or(ValidationError::Invalid(OP_UNKNOWN))?;

    validate_pointer_member(map, "path", OP_PATH_INVALID)?;
    if kind.requires_from() {
        validate_pointer_member(map, "from", OP_FROM_INVALID)?;
    }
    // JSON `null` is a legitimate value; only absence is an error
    if kind.requires_value() && !map.contains_key("value") {
        return Err(ValidationError::Invalid(OP_VALUE_MISSING));
    }
    Ok(kind)
}

fn validate_pointer_member(
    map: &Map<String, Value>,
    key: &str,
    reason: &'static str,
) -> Result<(), ValidationError> {
    let pointer = map
        .get(key)
        .and_then(Value::as_str)
        .ok_or(ValidationError::Invalid(reason))?;
    validate_json_pointer(pointer).map_err(|_| ValidationError::Invalid(reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reason_of(op: Value) -> Option<&'static str> {
        validate_operation(&op).err().and_then(|e| e.reason())
    }

    #[test]
    fn accepts_every_kind_with_its_fields() {
        let ops = json!([
            {"op": "add", "path": "/a", "value": 1},
            {"op": "copy", "from": "/a", "path": "/b"},
            {"op": "move", "from": "/b", "path": "/c"},
            {"op": "remove", "path": "/c"},
            {"op": "replace", "path": "/a", "value": null},
            {"op": "test", "path": "/a", "value": null}
        ]);
        validate_operations(&ops).unwrap();
    }

    #[test]
    fn empty_patch_is_valid() {
        validate_operations(&json!([])).unwrap();
    }

    #[test]
    fn rejects_non_array() {
        assert_eq!(
            validate_operations(&json!({"op": "add"})),
            Err(ValidationError::NotAnArray)
        );
    }

    #[test]
    fn rejects_non_object_operation() {
        assert_eq!(reason_of(json!("add")), Some(OP_INVALID));
        assert_eq!(reason_of(json!(null)), Some(OP_INVALID));
    }

    #[test]
    fn rejects_unknown_or_missing_op() {
        assert_eq!(reason_of(json!({"path": "/a"})), Some(OP_UNKNOWN));
        assert_eq!(reason_of(json!({"op": "ADD", "path": "/a", "value": 1})), Some(OP_UNKNOWN));
        assert_eq!(reason_of(json!({"op": "flip", "path": "/a"})), Some(OP_UNKNOWN));
        assert_eq!(reason_of(json!({"op": 1, "path": "/a"})), Some(OP_UNKNOWN));
    }

    #[test]
    fn rejects_bad_path() {
        assert_eq!(reason_of(json!({"op": "remove"})), Some(OP_PATH_INVALID));
        assert_eq!(reason_of(json!({"op": "remove", "path": 3})), Some(OP_PATH_INVALID));
        assert_eq!(reason_of(json!({"op": "remove", "path": "a"})), Some(OP_PATH_INVALID));
        assert_eq!(reason_of(json!({"op": "remove", "path": "/a~2"})), Some(OP_PATH_INVALID));
    }

    #[test]
    fn rejects_missing_from() {
        assert_eq!(reason_of(json!({"op": "copy", "path": "/a"})), Some(OP_FROM_INVALID));
        assert_eq!(
            reason_of(json!({"op": "move", "path": "/a", "from": "b"})),
            Some(OP_FROM_INVALID)
        );
    }

    #[test]
    fn rejects_missing_value() {
        for op in ["add", "replace", "test"] {
            assert_eq!(
                reason_of(json!({"op": op, "path": "/a"})),
                Some(OP_VALUE_MISSING),
                "{op}"
            );
        }
    }

    #[test]
    fn ignores_extra_members() {
        let kind = validate_operation(&json!({
            "op": "remove", "path": "/a", "value": 1, "from": "/b", "note": "x"
        }))
        .unwrap();
        assert_eq!(kind, OperationKind::Remove);
    }

    #[test]
    fn error_names_first_failing_index() {
        let err = validate_operations(&json!([
            {"op": "remove", "path": "/a"},
            {"op": "remove", "path": "/b"},
            {"op": "copy", "path": "/c"},
            {"op": "nope"}
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Operation {
                index: 2,
                reason: OP_FROM_INVALID
            }
        );
    }
}

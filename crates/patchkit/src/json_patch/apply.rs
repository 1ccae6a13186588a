//! The standard handler set: RFC 6902 semantics over a `serde_json::Value`.
//!
//! Handlers never abort the pass. A failing operation is recorded on the
//! [`Target`] and the next operation runs against the document as it stands.

use std::mem;

use patchkit_json_pointer::{get, get_mut, locate_mut, JsonPointerError, Location};
use serde_json::Value;

use super::contextual::ContextualOperationRegistry;
use super::types::{
    ApplyPatchOptions, FailureReason, JsonPointer, OperationFailure, OperationKind, PatchDocument,
    PatchError,
};
use super::value::PatchValue;

/// The context the standard handlers operate on.
#[derive(Debug, Clone, Default)]
pub struct Target {
    pub doc: Value,
    /// Failed operations in the order they ran.
    pub failures: Vec<OperationFailure>,
    seen: usize,
}

impl Target {
    pub fn new(doc: Value) -> Self {
        Target {
            doc,
            failures: Vec::new(),
            seen: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// The patched document, or every recorded failure.
    pub fn into_result(self) -> Result<Value, PatchError> {
        if self.failures.is_empty() {
            Ok(self.doc)
        } else {
            Err(PatchError::Failed(self.failures))
        }
    }

    // `index` counts the operations this target has been handed, which is the
    // document index when every kind has a handler.
    fn settle(
        &mut self,
        kind: OperationKind,
        path: &JsonPointer,
        outcome: Result<(), FailureReason>,
    ) -> bool {
        let index = self.seen;
        self.seen += 1;
        match outcome {
            Ok(()) => true,
            Err(reason) => {
                let failure = OperationFailure {
                    index,
                    kind,
                    path: path.to_string(),
                    reason,
                };
                log::debug!("{failure}");
                self.failures.push(failure);
                false
            }
        }
    }
}

// ── Primitives ────────────────────────────────────────────────────────────

fn last_segment(pointer: &JsonPointer) -> usize {
    pointer.len().saturating_sub(1)
}

fn add(doc: &mut Value, path: &JsonPointer, value: Value) -> Result<(), JsonPointerError> {
    match locate_mut(doc, path)? {
        Location::Root(root) => *root = value,
        Location::Member { object, key } => {
            object.insert(key, value);
        }
        Location::Element { array, index } => array.insert(index, value),
        Location::End { array } => array.push(value),
    }
    Ok(())
}

fn remove(doc: &mut Value, path: &JsonPointer) -> Result<Value, FailureReason> {
    take(doc, path).map(|(value, _)| value)
}

// Removes the addressed value and returns it with the position it held in its
// parent: the member index for objects, the element index for arrays.
fn take(doc: &mut Value, path: &JsonPointer) -> Result<(Value, usize), FailureReason> {
    let missing = || JsonPointerError::not_found(path, last_segment(path));
    match locate_mut(doc, path)? {
        Location::Root(_) => Err(FailureReason::RemoveRoot),
        Location::Member { object, key } => {
            let position = object.keys().position(|k| *k == key).ok_or_else(missing)?;
            let value = object.shift_remove(&key).ok_or_else(missing)?;
            Ok((value, position))
        }
        Location::Element { array, index } if index < array.len() => {
            Ok((array.remove(index), index))
        }
        Location::Element { .. } | Location::End { .. } => Err(missing().into()),
    }
}

// Inverse of `take`.
fn restore(
    doc: &mut Value,
    path: &JsonPointer,
    value: Value,
    position: usize,
) -> Result<(), JsonPointerError> {
    match locate_mut(doc, path)? {
        Location::Member { object, key } => {
            let position = position.min(object.len());
            object.shift_insert(position, key, value);
        }
        Location::Element { array, index } => array.insert(index, value),
        Location::Root(root) => *root = value,
        Location::End { array } => array.push(value),
    }
    Ok(())
}

fn replace(doc: &mut Value, path: &JsonPointer, value: Value) -> Result<Value, JsonPointerError> {
    let slot = get_mut(doc, path)?;
    Ok(mem::replace(slot, value))
}

fn copy(doc: &mut Value, from: &JsonPointer, path: &JsonPointer) -> Result<(), JsonPointerError> {
    let value = get(doc, from)?.clone();
    add(doc, path, value)
}

fn move_value(doc: &mut Value, from: &JsonPointer, path: &JsonPointer) -> Result<(), FailureReason> {
    if path.is_descendant_of(from) {
        return Err(FailureReason::MoveIntoDescendant);
    }
    if path == from {
        get(doc, from)?;
        return Ok(());
    }
    let (value, position) = take(doc, from)?;
    if let Err(err) = locate_mut(doc, path).map(drop) {
        restore(doc, from, value, position)?;
        return Err(err.into());
    }
    add(doc, path, value)?;
    Ok(())
}

fn test_value(doc: &Value, path: &JsonPointer, expected: &Value) -> Result<(), FailureReason> {
    if json_equal(get(doc, path)?, expected) {
        Ok(())
    } else {
        Err(FailureReason::TestMismatch)
    }
}

/// Structural JSON equality. Numbers compare by value, so `1` equals `1.0`.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            x.as_f64() == y.as_f64()
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| json_equal(x, y)))
        }
        _ => a == b,
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

fn on_add(target: &mut Target, path: &JsonPointer, value: &PatchValue) {
    let outcome = add(&mut target.doc, path, value.as_value().clone()).map_err(Into::into);
    target.settle(OperationKind::Add, path, outcome);
}

fn on_copy(target: &mut Target, from: &JsonPointer, path: &JsonPointer) {
    let outcome = copy(&mut target.doc, from, path).map_err(Into::into);
    target.settle(OperationKind::Copy, path, outcome);
}

fn on_move(target: &mut Target, from: &JsonPointer, path: &JsonPointer) {
    let outcome = move_value(&mut target.doc, from, path);
    target.settle(OperationKind::Move, path, outcome);
}

fn on_remove(target: &mut Target, path: &JsonPointer) {
    let outcome = remove(&mut target.doc, path).map(drop);
    target.settle(OperationKind::Remove, path, outcome);
}

fn on_replace(target: &mut Target, path: &JsonPointer, value: &PatchValue) {
    let outcome = replace(&mut target.doc, path, value.as_value().clone())
        .map(drop)
        .map_err(Into::into);
    target.settle(OperationKind::Replace, path, outcome);
}

fn on_test(target: &mut Target, path: &JsonPointer, value: &PatchValue) -> bool {
    let outcome = test_value(&target.doc, path, value.as_value());
    target.settle(OperationKind::Test, path, outcome)
}

/// A registry with every kind bound to its RFC 6902 behaviour.
pub fn standard_registry() -> ContextualOperationRegistry<'static, Target> {
    let mut registry = ContextualOperationRegistry::new();
    registry
        .set_add(on_add)
        .set_copy(on_copy)
        .set_move(on_move)
        .set_remove(on_remove)
        .set_replace(on_replace)
        .set_test(on_test);
    registry
}

/// Apply a patch to a document with the standard handler set.
///
/// Without [`ApplyPatchOptions::mutate`] the patch runs on a copy and `doc` is
/// replaced only if every operation succeeded. With it, `doc` is patched in
/// place and keeps the operations that succeeded.
///
/// # Example
///
/// ```
/// use patchkit::json_patch::{apply_patch, ApplyPatchOptions, PatchDocument, PatchError};
/// use serde_json::json;
///
/// let mut doc = json!({"foo": ["bar", "baz"]});
/// let patch: PatchDocument = r#"[
///     {"op": "add", "path": "/foo/1", "value": "qux"},
///     {"op": "test", "path": "/foo/0", "value": "bar"}
/// ]"#
/// .parse()
/// .unwrap();
/// apply_patch(&mut doc, &patch, &ApplyPatchOptions::default()).unwrap();
/// assert_eq!(doc, json!({"foo": ["bar", "qux", "baz"]}));
///
/// let bad: PatchDocument = r#"[{"op": "remove", "path": "/nope"}]"#.parse().unwrap();
/// let err = apply_patch(&mut doc, &bad, &ApplyPatchOptions::default()).unwrap_err();
/// assert!(matches!(err, PatchError::Failed(ref failures) if failures.len() == 1));
/// assert_eq!(doc, json!({"foo": ["bar", "qux", "baz"]}));
/// ```
pub fn apply_patch(
    doc: &mut Value,
    patch: &PatchDocument,
    options: &ApplyPatchOptions,
) -> Result<(), PatchError> {
    let working = if options.mutate {
        mem::take(doc)
    } else {
        doc.clone()
    };
    let mut target = Target::new(working);
    let dispatched = standard_registry().apply(patch, &mut target);

    let succeeded = dispatched.is_ok() && target.is_ok();
    if options.mutate || succeeded {
        *doc = mem::take(&mut target.doc);
    }
    dispatched?;
    target.into_result().map(drop)
}

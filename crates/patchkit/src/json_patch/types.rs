//! Core types for the JSON Patch module: operation kinds, operations, the
//! patch document, errors, and options.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

pub use patchkit_json_pointer::JsonPointer;
use patchkit_json_pointer::JsonPointerError;

use super::validate::ValidationError;
use super::value::PatchValue;

// ── Operation kind ────────────────────────────────────────────────────────

/// The six RFC 6902 operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    Add,
    Copy,
    Move,
    Remove,
    Replace,
    Test,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Add,
        OperationKind::Copy,
        OperationKind::Move,
        OperationKind::Remove,
        OperationKind::Replace,
        OperationKind::Test,
    ];

    /// The `op` member value on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Copy => "copy",
            OperationKind::Move => "move",
            OperationKind::Remove => "remove",
            OperationKind::Replace => "replace",
            OperationKind::Test => "test",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(OperationKind::Add),
            "copy" => Some(OperationKind::Copy),
            "move" => Some(OperationKind::Move),
            "remove" => Some(OperationKind::Remove),
            "replace" => Some(OperationKind::Replace),
            "test" => Some(OperationKind::Test),
            _ => None,
        }
    }

    pub fn requires_from(&self) -> bool {
        matches!(self, OperationKind::Copy | OperationKind::Move)
    }

    pub fn requires_value(&self) -> bool {
        matches!(
            self,
            OperationKind::Add | OperationKind::Replace | OperationKind::Test
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// A JSON Patch operation. The fields of each variant are exactly the members
/// its kind requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add {
        path: JsonPointer,
        value: PatchValue,
    },
    Copy {
        from: JsonPointer,
        path: JsonPointer,
    },
    Move {
        from: JsonPointer,
        path: JsonPointer,
    },
    Remove {
        path: JsonPointer,
    },
    Replace {
        path: JsonPointer,
        value: PatchValue,
    },
    Test {
        path: JsonPointer,
        value: PatchValue,
    },
}

impl Op {
    pub fn kind(&self) -> OperationKind {
        match self {
            Op::Add { .. } => OperationKind::Add,
            Op::Copy { .. } => OperationKind::Copy,
            Op::Move { .. } => OperationKind::Move,
            Op::Remove { .. } => OperationKind::Remove,
            Op::Replace { .. } => OperationKind::Replace,
            Op::Test { .. } => OperationKind::Test,
        }
    }

    pub fn path(&self) -> &JsonPointer {
        match self {
            Op::Add { path, .. }
            | Op::Copy { path, .. }
            | Op::Move { path, .. }
            | Op::Remove { path }
            | Op::Replace { path, .. }
            | Op::Test { path, .. } => path,
        }
    }

    pub fn from(&self) -> Option<&JsonPointer> {
        match self {
            Op::Copy { from, .. } | Op::Move { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&PatchValue> {
        match self {
            Op::Add { value, .. } | Op::Replace { value, .. } | Op::Test { value, .. } => {
                Some(value)
            }
            _ => None,
        }
    }
}

// ── Patch document ────────────────────────────────────────────────────────

/// An ordered sequence of operations. Order is apply order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchDocument {
    ops: Vec<Op>,
}

impl PatchDocument {
    pub fn new(ops: Vec<Op>) -> Self {
        PatchDocument { ops }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Distinct operation kinds used by the document.
    pub fn kinds(&self) -> BTreeSet<OperationKind> {
        self.ops.iter().map(Op::kind).collect()
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }
}

impl From<Vec<Op>> for PatchDocument {
    fn from(ops: Vec<Op>) -> Self {
        PatchDocument { ops }
    }
}

impl FromIterator<Op> for PatchDocument {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        PatchDocument {
            ops: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PatchDocument {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl IntoIterator for PatchDocument {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// What the dispatcher does when a `test` handler returns `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestFailurePolicy {
    /// Log the failure and keep dispatching.
    #[default]
    Ignore,
    /// Stop dispatching and return [`PatchError::TestFailed`].
    Abort,
}

/// Options for `apply_with` on the operation registries.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    pub test_failure: TestFailurePolicy,
}

/// Options for [`apply_patch`](super::apply::apply_patch).
#[derive(Debug, Clone, Default)]
pub struct ApplyPatchOptions {
    /// If true, operate on the caller's document in place; operations that
    /// succeeded stay applied even when others failed.
    /// If false, work on a copy that replaces the document only when every
    /// operation succeeded.
    pub mutate: bool,
}

// ── Errors ────────────────────────────────────────────────────────────────

/// Why one operation could not be applied by the standard handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FailureReason {
    #[error(transparent)]
    Pointer(#[from] JsonPointerError),
    #[error("TEST")]
    TestMismatch,
    #[error("cannot move into own children")]
    MoveIntoDescendant,
    #[error("cannot remove the document root")]
    RemoveRoot,
}

/// A failed operation recorded by the standard handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at operation [index = {index}] ({path:?}): {reason}")]
pub struct OperationFailure {
    pub index: usize,
    pub kind: OperationKind,
    pub path: String,
    pub reason: FailureReason,
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("operation(s) not supported: {}", join_kinds(kinds))]
    NotSupported { kinds: BTreeSet<OperationKind> },
    #[error("test failed at operation [index = {index}] ({path:?})")]
    TestFailed { index: usize, path: String },
    #[error("{} operation(s) failed, first: {}", .0.len(), first_failure(.0))]
    Failed(Vec<OperationFailure>),
}

impl PatchError {
    /// The kinds without a registered handler, for
    /// [`PatchError::NotSupported`].
    pub fn unsupported_kinds(&self) -> Option<&BTreeSet<OperationKind>> {
        match self {
            PatchError::NotSupported { kinds } => Some(kinds),
            _ => None,
        }
    }
}

fn join_kinds(kinds: &BTreeSet<OperationKind>) -> String {
    kinds
        .iter()
        .map(OperationKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_failure(failures: &[OperationFailure]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

//! JSON Patch (RFC 6902) documents dispatched to per-operation handlers.
//!
//! # Operations
//!
//! The six RFC 6902 kinds: `add`, `copy`, `move`, `remove`, `replace`, `test`.
//! Other `op` names are rejected while decoding.
//!
//! # Dispatch
//!
//! A registry holds at most one handler per kind and walks a
//! [`PatchDocument`] in order. Kinds without a handler are skipped and
//! reported once each, together, after the walk:
//!
//! - [`OperationRegistry`]: handlers get the operation's members only
//! - [`ContextualOperationRegistry`]: handlers also get a caller-supplied
//!   `&mut C`
//!
//! [`standard_registry`] and [`apply_patch`] bind every kind to its RFC 6902
//! behaviour over a `serde_json::Value`.

pub mod apply;
pub mod codec;
pub mod contextual;
pub mod registry;
pub mod types;
pub mod validate;
pub mod value;

pub use apply::{apply_patch, json_equal, standard_registry, Target};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use contextual::ContextualOperationRegistry;
pub use registry::OperationRegistry;
pub use types::{
    ApplyPatchOptions, DispatchOptions, FailureReason, JsonPointer, Op, OperationFailure,
    OperationKind, PatchDocument, PatchError, TestFailurePolicy,
};
pub use validate::{validate_operation, validate_operations, ValidationError};
pub use value::PatchValue;

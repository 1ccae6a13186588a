//! Logic behind the command-line tools.
//!
//! - `json-patch`: apply a JSON Patch to a document
//! - `json-pointer`: look up a JSON Pointer in a document

use patchkit_json_pointer::{JsonPointer, JsonPointerError};
use serde_json::Value;
use thiserror::Error;

use crate::json_patch::{apply_patch, ApplyPatchOptions, PatchDocument, PatchError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Patch(#[from] PatchError),
    #[error("{0}")]
    Pointer(#[from] JsonPointerError),
}

// ── json-patch ────────────────────────────────────────────────────────────

/// Apply a JSON Patch (RFC 6902) to a document.
///
/// `doc_json` is the document, `patch_json` the operation array. Returns the
/// patched document pretty-printed.
pub fn apply_json_patch(doc_json: &str, patch_json: &str) -> Result<String, CliError> {
    let mut doc: Value = serde_json::from_str(doc_json)?;
    let patch: PatchDocument = patch_json.parse()?;
    log::debug!("applying {} operation(s)", patch.len());
    apply_patch(&mut doc, &patch, &ApplyPatchOptions { mutate: true })?;
    Ok(serde_json::to_string_pretty(&doc)?)
}

// ── json-pointer ──────────────────────────────────────────────────────────

/// Look up a JSON Pointer (RFC 6901) in a document.
///
/// Returns the value pretty-printed. The empty pointer selects the whole
/// document.
pub fn lookup_pointer(doc_json: &str, pointer: &str) -> Result<String, CliError> {
    let doc: Value = serde_json::from_str(doc_json)?;
    let pointer: JsonPointer = pointer.parse()?;
    let value = pointer.resolve(&doc)?;
    Ok(serde_json::to_string_pretty(value)?)
}

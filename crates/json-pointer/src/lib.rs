//! JSON Pointer (RFC 6901) utilities.
//!
//! This crate parses and formats [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901)
//! strings and resolves them against [`serde_json::Value`] documents, either to
//! an existing value or to a mutable [`Location`] that a patch operation can
//! write into.
//!
//! # Example
//!
//! ```
//! use patchkit_json_pointer::{format_json_pointer, get, parse_json_pointer, JsonPointer};
//!
//! let tokens = parse_json_pointer("/users/a~1b");
//! assert_eq!(tokens, ["users", "a/b"]);
//! assert_eq!(format_json_pointer(&tokens), "/users/a~1b");
//!
//! let doc = serde_json::json!({"users": {"a/b": {"id": 3}}});
//! let pointer: JsonPointer = "/users/a~1b/id".parse().unwrap();
//! assert_eq!(get(&doc, &pointer), Ok(&serde_json::json!(3)));
//! ```

use thiserror::Error;

pub mod types;
pub use types::{JsonPointer, Path, PathStep};

pub mod validate;
pub use validate::validate_json_pointer;

pub mod resolve;
pub use resolve::{contains, get, get_mut, locate_mut, Location};

/// The reference token that addresses the position one past the last element
/// of an array.
pub const APPEND_TOKEN: &str = "-";

/// Unescapes a JSON Pointer reference token.
///
/// Per RFC 6901, `~1` is replaced with `/` and then `~0` is replaced with `~`.
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::unescape_component;
///
/// assert_eq!(unescape_component("tilde~0here"), "tilde~here");
/// assert_eq!(unescape_component("~01"), "~1");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 must be decoded before ~0, otherwise "~01" would turn into "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer reference token.
///
/// Per RFC 6901, `~` is replaced with `~0` and then `/` is replaced with `~1`.
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::escape_component;
///
/// assert_eq!(escape_component("application/json"), "application~1json");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into reference tokens.
///
/// - The empty string is the root and yields no tokens.
/// - The leading `/` is stripped; a pointer without one is read as if it had it.
/// - Each token is unescaped.
///
/// This function does not reject malformed escapes; use
/// [`JsonPointer::parse`] for input that has not been validated.
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::parse_json_pointer;
///
/// assert!(parse_json_pointer("").is_empty());
/// assert_eq!(parse_json_pointer("/"), [""]);
/// assert_eq!(parse_json_pointer("/headers/content~1type"), ["headers", "content/type"]);
/// ```
pub fn parse_json_pointer(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_component).collect()
}

/// Format reference tokens into a JSON Pointer string.
///
/// Returns an empty string for the root path.
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer(&[]), "");
/// assert_eq!(format_json_pointer(&["a/b".to_string(), "c~d".to_string()]), "/a~1b/c~0d");
/// ```
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::with_capacity(path.iter().map(|t| t.len() + 1).sum());
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Check if a token is a canonical array index: a non-negative base-10
/// integer without leading zeros (except `0` itself).
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::is_valid_index;
///
/// assert!(is_valid_index("0") && is_valid_index("42"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    let bytes = index.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

/// Check if `parent` is a proper prefix of `child`.
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::{is_child, parse_json_pointer};
///
/// let tokens = parse_json_pointer("/users/0/name");
/// assert!(is_child(&tokens[..1], &tokens));
/// assert!(!is_child(&tokens, &tokens));
/// ```
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    parent.len() < child.len() && child.starts_with(parent)
}

/// The path without its last token.
///
/// # Errors
///
/// Returns [`JsonPointerError::NoParent`] for the root path.
pub fn parent(path: &[String]) -> Result<Vec<String>, JsonPointerError> {
    match path.split_last() {
        Some((_, init)) => Ok(init.to_vec()),
        None => Err(JsonPointerError::NoParent),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("POINTER_INVALID: {0:?}")]
    PointerInvalid(String),
    #[error("NO_PARENT")]
    NoParent,
    #[error("NOT_FOUND: {pointer:?} (segment {segment})")]
    NotFound { pointer: String, segment: usize },
    #[error("INVALID_INDEX: {pointer:?} (segment {segment})")]
    InvalidIndex { pointer: String, segment: usize },
}

impl JsonPointerError {
    pub fn not_found(pointer: &JsonPointer, segment: usize) -> Self {
        JsonPointerError::NotFound {
            pointer: pointer.to_string(),
            segment,
        }
    }

    pub fn invalid_index(pointer: &JsonPointer, segment: usize) -> Self {
        JsonPointerError::InvalidIndex {
            pointer: pointer.to_string(),
            segment,
        }
    }

    /// The full pointer the error was raised for, when it came from resolution.
    pub fn pointer(&self) -> Option<&str> {
        match self {
            JsonPointerError::NotFound { pointer, .. }
            | JsonPointerError::InvalidIndex { pointer, .. } => Some(pointer),
            _ => None,
        }
    }

    /// Zero-based index of the reference token that failed to resolve.
    pub fn segment(&self) -> Option<usize> {
        match self {
            JsonPointerError::NotFound { segment, .. }
            | JsonPointerError::InvalidIndex { segment, .. } => Some(*segment),
            _ => None,
        }
    }
}

//! Validation functions for JSON Pointer strings.

use crate::JsonPointerError;

/// Validate a JSON Pointer string.
///
/// # Errors
///
/// Returns [`JsonPointerError::PointerInvalid`] if:
/// - The pointer is non-empty but doesn't start with `/`
/// - A `~` is not followed by `0` or `1`
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap(); // Root is valid
/// validate_json_pointer("/foo/bar").unwrap();
/// validate_json_pointer("/a~1b/c~0d").unwrap();
/// validate_json_pointer("foo").unwrap_err(); // Missing leading /
/// validate_json_pointer("/a~2").unwrap_err(); // Unknown escape
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), JsonPointerError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(JsonPointerError::PointerInvalid(pointer.to_string()));
    }
    let mut chars = pointer.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0' | '1')) {
            return Err(JsonPointerError::PointerInvalid(pointer.to_string()));
        }
    }
    Ok(())
}

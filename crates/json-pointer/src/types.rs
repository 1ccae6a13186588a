//! Type definitions for JSON Pointer.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::{format_json_pointer, is_child, parse_json_pointer, validate_json_pointer};
use crate::{JsonPointerError, APPEND_TOKEN};

/// A single reference token of a JSON Pointer, stored unescaped.
pub type PathStep = String;

/// A JSON Pointer path as a sequence of unescaped reference tokens.
pub type Path = Vec<PathStep>;

/// A parsed JSON Pointer.
///
/// Holds the unescaped reference tokens; the empty pointer addresses the
/// document root. [`Display`](fmt::Display) renders the escaped wire form, so
/// parsing and formatting a valid pointer string reproduces it exactly.
///
/// ```
/// use patchkit_json_pointer::JsonPointer;
///
/// let pointer = JsonPointer::parse("/a~1b/c~0d").unwrap();
/// assert_eq!(pointer.tokens(), ["a/b", "c~d"]);
/// assert_eq!(pointer.to_string(), "/a~1b/c~0d");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPointer {
    tokens: Path,
}

impl JsonPointer {
    /// The pointer to the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and validate a pointer string.
    ///
    /// # Errors
    ///
    /// [`JsonPointerError::PointerInvalid`] when a non-empty pointer does not
    /// start with `/` or contains a `~` that is not part of `~0` or `~1`.
    pub fn parse(pointer: &str) -> Result<Self, JsonPointerError> {
        validate_json_pointer(pointer)?;
        Ok(Self {
            tokens: parse_json_pointer(pointer),
        })
    }

    /// Build a pointer from unescaped reference tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The final reference token, `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// True when the final token is the array append token `-`.
    pub fn ends_with_append(&self) -> bool {
        self.last() == Some(APPEND_TOKEN)
    }

    /// The pointer to the container of this location.
    ///
    /// # Errors
    ///
    /// [`JsonPointerError::NoParent`] for the root.
    pub fn parent(&self) -> Result<JsonPointer, JsonPointerError> {
        crate::parent(&self.tokens).map(|tokens| JsonPointer { tokens })
    }

    /// A new pointer with `token` appended.
    pub fn join(&self, token: impl Into<String>) -> JsonPointer {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        JsonPointer { tokens }
    }

    /// True when `prefix` equals this pointer or is one of its ancestors.
    pub fn starts_with(&self, prefix: &JsonPointer) -> bool {
        self.tokens.starts_with(&prefix.tokens)
    }

    /// True when this pointer is a strict descendant of `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &JsonPointer) -> bool {
        is_child(&ancestor.tokens, &self.tokens)
    }

    /// Resolve this pointer to an existing value in `doc`.
    pub fn resolve<'v>(&self, doc: &'v Value) -> Result<&'v Value, JsonPointerError> {
        crate::resolve::get(doc, self)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_json_pointer(&self.tokens))
    }
}

impl FromStr for JsonPointer {
    type Err = JsonPointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPointer::parse(s)
    }
}

impl From<Path> for JsonPointer {
    fn from(tokens: Path) -> Self {
        JsonPointer { tokens }
    }
}

impl AsRef<[String]> for JsonPointer {
    fn as_ref(&self) -> &[String] {
        &self.tokens
    }
}

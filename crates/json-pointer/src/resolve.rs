//! Pointer resolution against `serde_json::Value` documents.
//!
//! [`get`] and [`get_mut`] require the addressed value to exist. [`locate_mut`]
//! only requires the parent container to exist, so it can address a member
//! that is about to be created or an array insertion point.

use serde_json::{Map, Value};

use crate::{is_valid_index, JsonPointer, JsonPointerError, APPEND_TOKEN};

/// A writable location inside a document, as found by [`locate_mut`].
#[derive(Debug)]
pub enum Location<'a> {
    /// The empty pointer: the whole document.
    Root(&'a mut Value),
    /// A member of an object. The member may or may not exist yet.
    Member {
        object: &'a mut Map<String, Value>,
        key: String,
    },
    /// An array position in `0..=len`. `index == len` is an insertion point.
    Element {
        array: &'a mut Vec<Value>,
        index: usize,
    },
    /// The `-` token: one past the last element.
    End { array: &'a mut Vec<Value> },
}

impl Location<'_> {
    /// The value currently stored at this location, if any.
    pub fn get(&self) -> Option<&Value> {
        match self {
            Location::Root(value) => Some(value),
            Location::Member { object, key } => object.get(key),
            Location::Element { array, index } => array.get(*index),
            Location::End { .. } => None,
        }
    }

    pub fn exists(&self) -> bool {
        self.get().is_some()
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Location::Root(_))
    }
}

#[derive(Debug, Clone, Copy)]
enum Miss {
    NotFound,
    InvalidIndex,
}

impl Miss {
    fn at(self, pointer: &JsonPointer, segment: usize) -> JsonPointerError {
        match self {
            Miss::NotFound => JsonPointerError::not_found(pointer, segment),
            Miss::InvalidIndex => JsonPointerError::invalid_index(pointer, segment),
        }
    }
}

fn array_index(token: &str) -> Result<usize, Miss> {
    // "-" names the slot after the last element, which never holds a value
    if token == APPEND_TOKEN {
        return Err(Miss::NotFound);
    }
    if !is_valid_index(token) {
        return Err(Miss::InvalidIndex);
    }
    token.parse().map_err(|_| Miss::NotFound)
}

fn child<'v>(value: &'v Value, token: &str) -> Result<&'v Value, Miss> {
    match value {
        Value::Object(map) => map.get(token).ok_or(Miss::NotFound),
        Value::Array(arr) => arr.get(array_index(token)?).ok_or(Miss::NotFound),
        _ => Err(Miss::NotFound),
    }
}

fn child_mut<'v>(value: &'v mut Value, token: &str) -> Result<&'v mut Value, Miss> {
    match value {
        Value::Object(map) => map.get_mut(token).ok_or(Miss::NotFound),
        Value::Array(arr) => {
            let index = array_index(token)?;
            arr.get_mut(index).ok_or(Miss::NotFound)
        }
        _ => Err(Miss::NotFound),
    }
}

fn walk<'a>(
    doc: &'a Value,
    pointer: &JsonPointer,
    tokens: &[String],
) -> Result<&'a Value, JsonPointerError> {
    let mut current = doc;
    for (segment, token) in tokens.iter().enumerate() {
        current = child(current, token).map_err(|miss| miss.at(pointer, segment))?;
    }
    Ok(current)
}

fn walk_mut<'a>(
    doc: &'a mut Value,
    pointer: &JsonPointer,
    tokens: &[String],
) -> Result<&'a mut Value, JsonPointerError> {
    let mut current = doc;
    for (segment, token) in tokens.iter().enumerate() {
        current = child_mut(current, token).map_err(|miss| miss.at(pointer, segment))?;
    }
    Ok(current)
}

/// Get an existing value in a JSON document by pointer.
///
/// # Errors
///
/// - [`JsonPointerError::NotFound`] if a member is missing, an index is out of
///   bounds, a token descends into a scalar, or `-` is used on an array
/// - [`JsonPointerError::InvalidIndex`] if a non-index token is used on an array
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::{get, JsonPointer, JsonPointerError};
/// use serde_json::json;
///
/// let doc = json!({"foo": {"bar": [10, 20]}});
/// let pointer: JsonPointer = "/foo/bar/1".parse().unwrap();
/// assert_eq!(get(&doc, &pointer), Ok(&json!(20)));
///
/// let missing: JsonPointer = "/foo/baz/0".parse().unwrap();
/// assert_eq!(
///     get(&doc, &missing),
///     Err(JsonPointerError::NotFound { pointer: "/foo/baz/0".into(), segment: 1 })
/// );
/// ```
pub fn get<'a>(doc: &'a Value, pointer: &JsonPointer) -> Result<&'a Value, JsonPointerError> {
    walk(doc, pointer, pointer.tokens())
}

/// Get a mutable reference to an existing value by pointer.
///
/// Fails under the same conditions as [`get`].
pub fn get_mut<'a>(
    doc: &'a mut Value,
    pointer: &JsonPointer,
) -> Result<&'a mut Value, JsonPointerError> {
    walk_mut(doc, pointer, pointer.tokens())
}

/// Check whether a pointer addresses an existing value.
pub fn contains(doc: &Value, pointer: &JsonPointer) -> bool {
    get(doc, pointer).is_ok()
}

/// Locate the writable slot a pointer addresses.
///
/// Every token but the last must resolve to an existing value; the last token
/// is interpreted against that parent container:
/// - object: any key, present or not ([`Location::Member`])
/// - array: `-` ([`Location::End`]) or a canonical index in `0..=len`
///   ([`Location::Element`])
///
/// # Errors
///
/// - [`JsonPointerError::NotFound`] if the parent is missing or is a scalar,
///   or the index is greater than the array length
/// - [`JsonPointerError::InvalidIndex`] if the last token is not an index or
///   `-` and the parent is an array
///
/// # Example
///
/// ```
/// use patchkit_json_pointer::{locate_mut, JsonPointer, Location};
/// use serde_json::json;
///
/// let mut doc = json!({"items": [1, 2]});
/// let pointer: JsonPointer = "/items/-".parse().unwrap();
/// match locate_mut(&mut doc, &pointer).unwrap() {
///     Location::End { array } => array.push(json!(3)),
///     other => panic!("unexpected {other:?}"),
/// }
/// assert_eq!(doc, json!({"items": [1, 2, 3]}));
/// ```
pub fn locate_mut<'a>(
    doc: &'a mut Value,
    pointer: &JsonPointer,
) -> Result<Location<'a>, JsonPointerError> {
    let Some((last, init)) = pointer.tokens().split_last() else {
        return Ok(Location::Root(doc));
    };
    let segment = init.len();
    match walk_mut(doc, pointer, init)? {
        Value::Object(object) => Ok(Location::Member {
            object,
            key: last.clone(),
        }),
        Value::Array(array) => {
            if last == APPEND_TOKEN {
                return Ok(Location::End { array });
            }
            if !is_valid_index(last) {
                return Err(JsonPointerError::invalid_index(pointer, segment));
            }
            match last.parse::<usize>() {
                Ok(index) if index <= array.len() => Ok(Location::Element { array, index }),
                _ => Err(JsonPointerError::not_found(pointer, segment)),
            }
        }
        _ => Err(JsonPointerError::not_found(pointer, segment)),
    }
}

//! The literal carried by `add`, `replace` and `test` operations.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// An operation's `value` member.
///
/// The dispatcher never looks inside it; handlers read it as raw JSON through
/// [`as_value`](Self::as_value) or interpret it as a concrete type with
/// [`to`](Self::to).
///
/// ```
/// use patchkit::json_patch::PatchValue;
/// use serde_json::json;
///
/// let value = PatchValue::new(json!(["admin", "editor"]));
/// let roles: Vec<String> = value.to().unwrap();
/// assert_eq!(roles, ["admin", "editor"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PatchValue(Value);

impl PatchValue {
    pub fn new(value: Value) -> Self {
        PatchValue(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Deserialize the value into `T`.
    pub fn to<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl From<Value> for PatchValue {
    fn from(value: Value) -> Self {
        PatchValue(value)
    }
}

impl AsRef<Value> for PatchValue {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}

//! The handler registry without a context.
//!
//! Handlers get only the operation's members. It shares the dispatcher of
//! [`ContextualOperationRegistry`] with a unit context, so unsupported-kind
//! accounting is identical between the two.

use std::collections::BTreeSet;
use std::fmt;

use super::contextual::ContextualOperationRegistry;
use super::types::{DispatchOptions, JsonPointer, OperationKind, PatchDocument, PatchError};
use super::value::PatchValue;

/// One optional handler per operation kind.
///
/// ```
/// use std::cell::RefCell;
///
/// use patchkit::json_patch::{OperationKind, OperationRegistry, PatchDocument};
///
/// let patch: PatchDocument = r#"[
///     {"op": "add", "path": "/tags/-", "value": "new"},
///     {"op": "copy", "from": "/a", "path": "/b"},
///     {"op": "copy", "from": "/a", "path": "/c"}
/// ]"#
/// .parse()
/// .unwrap();
///
/// let added = RefCell::new(Vec::new());
/// let mut registry = OperationRegistry::new();
/// registry.set_add(|path, _value| added.borrow_mut().push(path.to_string()));
///
/// let err = registry.apply(&patch).unwrap_err();
/// drop(registry);
/// assert_eq!(added.into_inner(), ["/tags/-"]);
/// assert_eq!(
///     err.unsupported_kinds().unwrap().iter().copied().collect::<Vec<_>>(),
///     [OperationKind::Copy]
/// );
/// ```
#[derive(Default)]
pub struct OperationRegistry<'a> {
    inner: ContextualOperationRegistry<'a, ()>,
}

impl<'a> OperationRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_add<F>(&mut self, mut handler: F) -> &mut Self
    where
        F: FnMut(&JsonPointer, &PatchValue) + 'a,
    {
        self.inner.set_add(move |_: &mut (), path, value| handler(path, value));
        self
    }

    /// The handler receives `from` before `path`.
    pub fn set_copy<F>(&mut self, mut handler: F) -> &mut Self
    where
        F: FnMut(&JsonPointer, &JsonPointer) + 'a,
    {
        self.inner.set_copy(move |_: &mut (), from, path| handler(from, path));
        self
    }

    /// The handler receives `from` before `path`.
    pub fn set_move<F>(&mut self, mut handler: F) -> &mut Self
    where
        F: FnMut(&JsonPointer, &JsonPointer) + 'a,
    {
        self.inner.set_move(move |_: &mut (), from, path| handler(from, path));
        self
    }

    pub fn set_remove<F>(&mut self, mut handler: F) -> &mut Self
    where
        F: FnMut(&JsonPointer) + 'a,
    {
        self.inner.set_remove(move |_: &mut (), path| handler(path));
        self
    }

    pub fn set_replace<F>(&mut self, mut handler: F) -> &mut Self
    where
        F: FnMut(&JsonPointer, &PatchValue) + 'a,
    {
        self.inner.set_replace(move |_: &mut (), path, value| handler(path, value));
        self
    }

    pub fn set_test<F>(&mut self, mut handler: F) -> &mut Self
    where
        F: FnMut(&JsonPointer, &PatchValue) -> bool + 'a,
    {
        self.inner.set_test(move |_: &mut (), path, value| handler(path, value));
        self
    }

    pub fn clear(&mut self, kind: OperationKind) -> &mut Self {
        self.inner.clear(kind);
        self
    }

    pub fn supports(&self, kind: OperationKind) -> bool {
        self.inner.supports(kind)
    }

    pub fn supported_kinds(&self) -> BTreeSet<OperationKind> {
        self.inner.supported_kinds()
    }

    pub fn unsupported_in(&self, patch: &PatchDocument) -> BTreeSet<OperationKind> {
        self.inner.unsupported_in(patch)
    }

    pub fn ensure_supported(&self, patch: &PatchDocument) -> Result<(), PatchError> {
        self.inner.ensure_supported(patch)
    }

    /// Dispatch every operation of `patch` in order.
    ///
    /// See [`ContextualOperationRegistry::apply`].
    pub fn apply(&mut self, patch: &PatchDocument) -> Result<(), PatchError> {
        self.inner.apply(patch, &mut ())
    }

    pub fn apply_with(
        &mut self,
        patch: &PatchDocument,
        options: &DispatchOptions,
    ) -> Result<(), PatchError> {
        self.inner.apply_with(patch, &mut (), options)
    }
}

impl fmt::Debug for OperationRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("supported", &self.supported_kinds())
            .finish()
    }
}

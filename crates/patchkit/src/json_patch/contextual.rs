//! The handler registry and dispatcher, with a caller-supplied context.
//!
//! Every handler receives `&mut C` first and the operation's members after
//! it. The context is passed to [`ContextualOperationRegistry::apply`] and
//! handed unchanged to each handler; the registry never stores it.

use std::collections::BTreeSet;
use std::fmt;

use super::types::{
    DispatchOptions, JsonPointer, Op, OperationKind, PatchDocument, PatchError, TestFailurePolicy,
};
use super::value::PatchValue;

type ValueHandler<'a, C> = Box<dyn FnMut(&mut C, &JsonPointer, &PatchValue) + 'a>;
type FromHandler<'a, C> = Box<dyn FnMut(&mut C, &JsonPointer, &JsonPointer) + 'a>;
type PathHandler<'a, C> = Box<dyn FnMut(&mut C, &JsonPointer) + 'a>;
type TestHandler<'a, C> = Box<dyn FnMut(&mut C, &JsonPointer, &PatchValue) -> bool + 'a>;

/// One optional handler per operation kind; an empty slot marks the kind as
/// unsupported.
///
/// ```
/// use patchkit::json_patch::{ContextualOperationRegistry, OperationKind, PatchDocument};
///
/// struct User {
///     name: String,
/// }
///
/// let patch: PatchDocument = r#"[
///     {"op": "replace", "path": "/name", "value": "Ada"},
///     {"op": "remove", "path": "/name"}
/// ]"#
/// .parse()
/// .unwrap();
///
/// let mut registry = ContextualOperationRegistry::<User>::new();
/// registry.set_replace(|user, _path, value| {
///     if let Some(name) = value.as_value().as_str() {
///         user.name = name.to_string();
///     }
/// });
///
/// let mut user = User { name: "Grace".into() };
/// let err = registry.apply(&patch, &mut user).unwrap_err();
/// assert_eq!(user.name, "Ada");
/// assert_eq!(
///     err.unsupported_kinds().unwrap().iter().copied().collect::<Vec<_>>(),
///     [OperationKind::Remove]
/// );
/// ```
pub struct ContextualOperationRegistry<'a, C> {
    on_add: Option<ValueHandler<'a, C>>,
    on_copy: Option<FromHandler<'a, C>>,
    on_move: Option<FromHandler<'a, C>>,
    on_remove: Option<PathHandler<'a, C>>,
    on_replace: Option<ValueHandler<'a, C>>,
    on_test: Option<TestHandler<'a, C>>,
}

impl<'a, C> ContextualOperationRegistry<'a, C> {
    /// A registry with no handlers: every kind is unsupported.
    pub fn new() -> Self {
        ContextualOperationRegistry {
            on_add: None,
            on_copy: None,
            on_move: None,
            on_remove: None,
            on_replace: None,
            on_test: None,
        }
    }

    pub fn set_add<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C, &JsonPointer, &PatchValue) + 'a,
    {
        self.on_add = Some(Box::new(handler));
        self
    }

    /// The handler receives `from` before `path`.
    pub fn set_copy<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C, &JsonPointer, &JsonPointer) + 'a,
    {
        self.on_copy = Some(Box::new(handler));
        self
    }

    /// The handler receives `from` before `path`.
    pub fn set_move<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C, &JsonPointer, &JsonPointer) + 'a,
    {
        self.on_move = Some(Box::new(handler));
        self
    }

    pub fn set_remove<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C, &JsonPointer) + 'a,
    {
        self.on_remove = Some(Box::new(handler));
        self
    }

    pub fn set_replace<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C, &JsonPointer, &PatchValue) + 'a,
    {
        self.on_replace = Some(Box::new(handler));
        self
    }

    /// The handler returns whether the test passed; see
    /// [`TestFailurePolicy`] for what the dispatcher does with `false`.
    pub fn set_test<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut C, &JsonPointer, &PatchValue) -> bool + 'a,
    {
        self.on_test = Some(Box::new(handler));
        self
    }

    /// Empty the slot for `kind`.
    pub fn clear(&mut self, kind: OperationKind) -> &mut Self {
        match kind {
            OperationKind::Add => self.on_add = None,
            OperationKind::Copy => self.on_copy = None,
            OperationKind::Move => self.on_move = None,
            OperationKind::Remove => self.on_remove = None,
            OperationKind::Replace => self.on_replace = None,
            OperationKind::Test => self.on_test = None,
        }
        self
    }

    pub fn supports(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Add => self.on_add.is_some(),
            OperationKind::Copy => self.on_copy.is_some(),
            OperationKind::Move => self.on_move.is_some(),
            OperationKind::Remove => self.on_remove.is_some(),
            OperationKind::Replace => self.on_replace.is_some(),
            OperationKind::Test => self.on_test.is_some(),
        }
    }

    pub fn supported_kinds(&self) -> BTreeSet<OperationKind> {
        OperationKind::ALL
            .into_iter()
            .filter(|kind| self.supports(*kind))
            .collect()
    }

    /// Kinds used by `patch` that have no handler here.
    pub fn unsupported_in(&self, patch: &PatchDocument) -> BTreeSet<OperationKind> {
        patch
            .kinds()
            .into_iter()
            .filter(|kind| !self.supports(*kind))
            .collect()
    }

    /// Fail with [`PatchError::NotSupported`] without running any handler if
    /// `patch` uses a kind this registry does not handle.
    pub fn ensure_supported(&self, patch: &PatchDocument) -> Result<(), PatchError> {
        let kinds = self.unsupported_in(patch);
        if kinds.is_empty() {
            Ok(())
        } else {
            Err(PatchError::NotSupported { kinds })
        }
    }

    /// Dispatch every operation of `patch` in order with default options.
    ///
    /// Operations whose kind has no handler are skipped and reported together
    /// after the pass as [`PatchError::NotSupported`]; handlers for the other
    /// operations have run by then.
    pub fn apply(&mut self, patch: &PatchDocument, context: &mut C) -> Result<(), PatchError> {
        self.apply_with(patch, context, &DispatchOptions::default())
    }

    pub fn apply_with(
        &mut self,
        patch: &PatchDocument,
        context: &mut C,
        options: &DispatchOptions,
    ) -> Result<(), PatchError> {
        let mut unsupported = BTreeSet::new();

        for (index, op) in patch.iter().enumerate() {
            let handled = match op {
                Op::Add { path, value } => match self.on_add.as_mut() {
                    Some(handler) => {
                        handler(context, path, value);
                        true
                    }
                    None => false,
                },
                Op::Copy { from, path } => match self.on_copy.as_mut() {
                    Some(handler) => {
                        handler(context, from, path);
                        true
                    }
                    None => false,
                },
                Op::Move { from, path } => match self.on_move.as_mut() {
                    Some(handler) => {
                        handler(context, from, path);
                        true
                    }
                    None => false,
                },
                Op::Remove { path } => match self.on_remove.as_mut() {
                    Some(handler) => {
                        handler(context, path);
                        true
                    }
                    None => false,
                },
                Op::Replace { path, value } => match self.on_replace.as_mut() {
                    Some(handler) => {
                        handler(context, path, value);
                        true
                    }
                    None => false,
                },
                Op::Test { path, value } => match self.on_test.as_mut() {
                    Some(handler) => {
                        if !handler(context, path, value) {
                            on_test_failure(index, path, options.test_failure)?;
                        }
                        true
                    }
                    None => false,
                },
            };

            if handled {
                log::debug!("dispatched {} [index = {index}] ({})", op.kind(), op.path());
            } else {
                unsupported.insert(op.kind());
            }
        }

        if unsupported.is_empty() {
            return Ok(());
        }
        let err = PatchError::NotSupported { kinds: unsupported };
        log::warn!("{err}");
        Err(err)
    }
}

fn on_test_failure(
    index: usize,
    path: &JsonPointer,
    policy: TestFailurePolicy,
) -> Result<(), PatchError> {
    match policy {
        TestFailurePolicy::Ignore => {
            log::debug!("test failed [index = {index}] ({path}), continuing");
            Ok(())
        }
        TestFailurePolicy::Abort => Err(PatchError::TestFailed {
            index,
            path: path.to_string(),
        }),
    }
}

impl<C> Default for ContextualOperationRegistry<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ContextualOperationRegistry<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextualOperationRegistry")
            .field("supported", &self.supported_kinds())
            .finish()
    }
}

//! RAII guard for the evaluator's active scope.
//!
//! [`ScopedEvaluator`] swaps a scope in when created and swaps the previous
//! one back when dropped, so early returns through `?` and unwinding both
//! restore the caller's scope.

use std::ops::{Deref, DerefMut};

use misp_types::RecordId;

use crate::evaluator::Evaluator;

/// Evaluator access with a temporarily switched active scope.
///
/// Derefs to [`Evaluator`]; the previous scope is restored on drop.
pub struct ScopedEvaluator<'e> {
    evaluator: &'e mut Evaluator,
    saved: RecordId,
}

impl Drop for ScopedEvaluator<'_> {
    fn drop(&mut self) {
        self.evaluator.set_active_scope(self.saved);
    }
}

impl Deref for ScopedEvaluator<'_> {
    type Target = Evaluator;

    fn deref(&self) -> &Self::Target {
        self.evaluator
    }
}

impl DerefMut for ScopedEvaluator<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.evaluator
    }
}

impl Evaluator {
    /// Make `scope` active until the returned guard is dropped.
    pub fn scoped(&mut self, scope: RecordId) -> ScopedEvaluator<'_> {
        let saved = self.active_scope();
        self.set_active_scope(scope);
        ScopedEvaluator {
            evaluator: self,
            saved,
        }
    }

    /// Run `f` with `scope` active, restoring the previous scope afterwards.
    pub fn with_scope<T, F>(&mut self, scope: RecordId, f: F) -> T
    where
        F: FnOnce(&mut Evaluator) -> T,
    {
        let mut scoped = self.scoped(scope);
        f(&mut *scoped)
    }

    /// Run `f` in a fresh child of the active scope.
    pub fn with_child_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut Evaluator, RecordId) -> T,
    {
        let child = self.child_scope();
        let mut scoped = self.scoped(child);
        f(&mut *scoped, child)
    }
}

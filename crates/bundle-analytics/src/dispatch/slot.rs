//! Late-bound collaborator slot.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Holds an optional collaborator that the environment may install or
/// remove at any time.
///
/// A poisoned lock reads as empty.
pub struct GlobalSlot<T: ?Sized> {
    inner: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> GlobalSlot<T> {
    /// An empty slot.
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// A slot already holding `value`.
    pub fn with(value: Arc<T>) -> Self {
        Self {
            inner: RwLock::new(Some(value)),
        }
    }

    /// Install a collaborator, replacing any previous one.
    pub fn install(&self, value: Arc<T>) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(value);
        }
    }

    /// Remove the collaborator, returning it if one was installed.
    pub fn remove(&self) -> Option<Arc<T>> {
        self.inner.write().ok().and_then(|mut guard| guard.take())
    }

    /// The current collaborator, if any.
    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_available(&self) -> bool {
        self.get().is_some()
    }
}

impl<T: ?Sized> Default for GlobalSlot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> fmt::Debug for GlobalSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalSlot")
            .field("available", &self.is_available())
            .finish()
    }
}

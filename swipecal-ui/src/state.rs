//! Shared, lockable state handles.
//!
//! ## Usage
//!
//! A [`State`] is cloned into the closures a component hands to its
//! children (render slots, change hooks) so they all observe one value.
//! Readers take a shared lock through [`State::with`]; the single writer
//! goes through [`State::with_mut`].

use std::{fmt, sync::Arc};

use parking_lot::RwLock;

/// Cloneable handle to a value behind a `parking_lot::RwLock`.
///
/// Closures passed to `with`/`with_mut` must not re-enter the same state;
/// the lock is not reentrant.
pub struct State<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> State<T> {
    /// Wraps a value in a new state handle.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Execute a closure with a shared reference to the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Execute a closure with a mutable reference to the stored value.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Get a cloned value. Requires `T: Clone`.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(Clone::clone)
    }

    /// Replace the stored value.
    pub fn set(&self, value: T) {
        self.with_mut(|slot| *slot = value);
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&*self.inner.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_value() {
        let state = State::new(1);
        let other = state.clone();
        other.with_mut(|v| *v += 41);
        assert_eq!(state.get(), 42);
        state.set(7);
        assert_eq!(other.with(|v| *v * 2), 14);
    }
}

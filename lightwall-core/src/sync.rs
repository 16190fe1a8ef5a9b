//! Cross-context state access
//!
//! State shared between the actuation tick and the command path is only
//! ever touched inside a closure passed to [`SharedState`]. On target the
//! closure runs inside a critical section ([`CsState`]); on the host it
//! runs against a `RefCell` ([`MockState`]).
//!
//! Closures must copy or replace whole objects and return quickly. They
//! never span an await point.

use core::cell::RefCell;

/// Closure-scoped access to state shared with the timer context
pub trait SharedState<T> {
    /// Access state immutably
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R;

    /// Access state mutably
    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R;

    /// Copy the whole object out
    fn snapshot(&self) -> T
    where
        T: Copy,
    {
        self.with(|value| *value)
    }

    /// Replace the whole object, returning the previous value
    fn replace(&self, value: T) -> T {
        self.with_mut(|slot| core::mem::replace(slot, value))
    }
}

#[cfg(feature = "embassy")]
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Critical-section backed state for embedded targets
///
/// Safe to use from both the interrupt executor and thread-mode tasks.
#[cfg(feature = "embassy")]
pub struct CsState<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<T>>,
}

#[cfg(feature = "embassy")]
impl<T> CsState<T> {
    /// Create a new state cell, usable in a `static`
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }
}

#[cfg(feature = "embassy")]
impl<T> SharedState<T> for CsState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Single-threaded state for host tests
///
/// Panics on re-entrant mutable access, which indicates a bug in the
/// code under test.
#[derive(Debug, Default)]
pub struct MockState<T> {
    inner: RefCell<T>,
}

impl<T> MockState<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: RefCell::new(value),
        }
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T> SharedState<T> for MockState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.borrow())
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.inner.borrow_mut())
    }
}

impl<T, S: SharedState<T>> SharedState<T> for &S {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        (**self).with(f)
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        (**self).with_mut(f)
    }
}

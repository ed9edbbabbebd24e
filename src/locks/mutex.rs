//! A drop-in replacement for `std::sync::Mutex` that records every
//! acquisition with the core detector.

use std::ops::{Deref, DerefMut};
use std::panic::Location;

use parking_lot::{Mutex as Inner, MutexGuard as InnerGuard};

use crate::core::detector::mutex as hooks;
use crate::core::lock::next_lock_id;
use crate::core::types::LockId;

/// A mutex that reports lock/unlock events to the deadlock detector.
///
/// # Example
///
/// ```
/// use lockwarden::TrackedMutex;
///
/// let mutex = TrackedMutex::new(42);
/// {
///     let guard = mutex.lock();
///     assert_eq!(*guard, 42);
/// }
/// ```
pub struct TrackedMutex<T> {
    id: LockId,
    inner: Inner<T>,
}

/// Guard for a `TrackedMutex`; reports lock release to the detector when
/// dropped.
pub struct TrackedMutexGuard<'a, T> {
    thread: std::thread::ThreadId,
    lock_id: LockId,
    guard: InnerGuard<'a, T>,
}

impl<T> TrackedMutex<T> {
    pub fn new(value: T) -> Self {
        let id = next_lock_id();
        hooks::create_lock(id);
        TrackedMutex {
            id,
            inner: Inner::new(value),
        }
    }

    pub fn id(&self) -> LockId {
        self.id
    }

    /// Acquire the lock, blocking if necessary. See DESIGN.md point 6 for
    /// why the detector is notified before the underlying mutex actually
    /// blocks, rather than after.
    #[track_caller]
    pub fn lock(&self) -> TrackedMutexGuard<'_, T> {
        let thread = std::thread::current().id();
        let location = Location::caller();
        if let Err(err) = hooks::on_lock(thread, self.id, false, Some(location)) {
            panic!("{err}");
        }
        TrackedMutexGuard {
            thread,
            lock_id: self.id,
            guard: self.inner.lock(),
        }
    }

    /// Try to acquire the lock without blocking.
    #[track_caller]
    pub fn try_lock(&self) -> Option<TrackedMutexGuard<'_, T>> {
        let guard = self.inner.try_lock()?;
        let thread = std::thread::current().id();
        let location = Location::caller();
        if let Err(err) = hooks::on_lock(thread, self.id, false, Some(location)) {
            panic!("{err}");
        }
        Some(TrackedMutexGuard {
            thread,
            lock_id: self.id,
            guard,
        })
    }

    pub fn into_inner(self) -> T
    where
        T: Sized,
    {
        hooks::destroy_lock(self.id);
        let this = std::mem::ManuallyDrop::new(self);
        unsafe { std::ptr::read(&this.inner) }.into_inner()
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }
}

impl<T> Drop for TrackedMutex<T> {
    fn drop(&mut self) {
        hooks::destroy_lock(self.id);
    }
}

impl<T> Deref for TrackedMutexGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        self.guard.deref()
    }
}

impl<T> DerefMut for TrackedMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard.deref_mut()
    }
}

impl<T> Drop for TrackedMutexGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = hooks::on_unlock(self.thread, self.lock_id) {
            panic!("{err}");
        }
    }
}

impl<T: Default> Default for TrackedMutex<T> {
    fn default() -> Self {
        TrackedMutex::new(T::default())
    }
}

impl<T> From<T> for TrackedMutex<T> {
    fn from(value: T) -> Self {
        TrackedMutex::new(value)
    }
}

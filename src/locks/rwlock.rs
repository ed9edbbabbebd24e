//! A drop-in replacement for `std::sync::RwLock` that records every
//! acquisition with the core detector, tagging each dependency with its
//! read/write mode for the reader/writer relaxation.

use std::ops::{Deref, DerefMut};
use std::panic::Location;

use parking_lot::{RwLock as Inner, RwLockReadGuard as InnerReadGuard, RwLockWriteGuard as InnerWriteGuard};

use crate::core::detector::rwlock as hooks;
use crate::core::lock::next_lock_id;
use crate::core::types::LockId;

/// An rwlock that reports lock/unlock events to the deadlock detector.
pub struct TrackedRwLock<T> {
    id: LockId,
    inner: Inner<T>,
}

/// Guard for a read acquisition; reports release to the detector when
/// dropped.
pub struct TrackedRwLockReadGuard<'a, T> {
    thread: std::thread::ThreadId,
    lock_id: LockId,
    guard: InnerReadGuard<'a, T>,
}

/// Guard for a write acquisition; reports release to the detector when
/// dropped.
pub struct TrackedRwLockWriteGuard<'a, T> {
    thread: std::thread::ThreadId,
    lock_id: LockId,
    guard: InnerWriteGuard<'a, T>,
}

impl<T> TrackedRwLock<T> {
    pub fn new(value: T) -> Self {
        let id = next_lock_id();
        crate::core::detector::mutex::create_lock(id);
        TrackedRwLock {
            id,
            inner: Inner::new(value),
        }
    }

    pub fn id(&self) -> LockId {
        self.id
    }

    /// Acquire a read lock, blocking if a writer currently holds it. Notified
    /// to the detector before the underlying rwlock actually blocks, for the
    /// same reason as `TrackedMutex::lock` (DESIGN.md point 6).
    #[track_caller]
    pub fn read(&self) -> TrackedRwLockReadGuard<'_, T> {
        let thread = std::thread::current().id();
        let location = Location::caller();
        if let Err(err) = hooks::on_read_lock(thread, self.id, Some(location)) {
            panic!("{err}");
        }
        TrackedRwLockReadGuard {
            thread,
            lock_id: self.id,
            guard: self.inner.read(),
        }
    }

    /// Acquire a write lock, blocking if necessary.
    #[track_caller]
    pub fn write(&self) -> TrackedRwLockWriteGuard<'_, T> {
        let thread = std::thread::current().id();
        let location = Location::caller();
        if let Err(err) = hooks::on_write_lock(thread, self.id, Some(location)) {
            panic!("{err}");
        }
        TrackedRwLockWriteGuard {
            thread,
            lock_id: self.id,
            guard: self.inner.write(),
        }
    }

    #[track_caller]
    pub fn try_read(&self) -> Option<TrackedRwLockReadGuard<'_, T>> {
        let guard = self.inner.try_read()?;
        let thread = std::thread::current().id();
        let location = Location::caller();
        if let Err(err) = hooks::on_read_lock(thread, self.id, Some(location)) {
            panic!("{err}");
        }
        Some(TrackedRwLockReadGuard {
            thread,
            lock_id: self.id,
            guard,
        })
    }

    #[track_caller]
    pub fn try_write(&self) -> Option<TrackedRwLockWriteGuard<'_, T>> {
        let guard = self.inner.try_write()?;
        let thread = std::thread::current().id();
        let location = Location::caller();
        if let Err(err) = hooks::on_write_lock(thread, self.id, Some(location)) {
            panic!("{err}");
        }
        Some(TrackedRwLockWriteGuard {
            thread,
            lock_id: self.id,
            guard,
        })
    }

    pub fn into_inner(self) -> T
    where
        T: Sized,
    {
        crate::core::detector::mutex::destroy_lock(self.id);
        let this = std::mem::ManuallyDrop::new(self);
        unsafe { std::ptr::read(&this.inner) }.into_inner()
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }
}

impl<T> Drop for TrackedRwLock<T> {
    fn drop(&mut self) {
        crate::core::detector::mutex::destroy_lock(self.id);
    }
}

impl<T> Deref for TrackedRwLockReadGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        self.guard.deref()
    }
}

impl<T> Drop for TrackedRwLockReadGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = hooks::on_unlock(self.thread, self.lock_id) {
            panic!("{err}");
        }
    }
}

impl<T> Deref for TrackedRwLockWriteGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        self.guard.deref()
    }
}

impl<T> DerefMut for TrackedRwLockWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard.deref_mut()
    }
}

impl<T> Drop for TrackedRwLockWriteGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = hooks::on_unlock(self.thread, self.lock_id) {
            panic!("{err}");
        }
    }
}

impl<T: Default> Default for TrackedRwLock<T> {
    fn default() -> Self {
        TrackedRwLock::new(T::default())
    }
}

impl<T> From<T> for TrackedRwLock<T> {
    fn from(value: T) -> Self {
        TrackedRwLock::new(value)
    }
}

//! The instrumented lock types exposed to user code.

pub mod mutex;
pub mod rwlock;

pub use mutex::{TrackedMutex, TrackedMutexGuard};
pub use rwlock::{TrackedRwLock, TrackedRwLockReadGuard, TrackedRwLockWriteGuard};

//! Rwlock-shaped hooks — thin wrappers over the mutex hooks that pin the
//! read/write mode flag to whichever acquisition just happened.

use crate::core::detector::mutex;
use crate::core::error::DetectorError;
use crate::core::types::{ContextId, LockId};

pub fn on_read_lock(
    thread: std::thread::ThreadId,
    lock_id: LockId,
    location: Option<&'static std::panic::Location<'static>>,
) -> Result<ContextId, DetectorError> {
    mutex::on_lock(thread, lock_id, true, location)
}

pub fn on_write_lock(
    thread: std::thread::ThreadId,
    lock_id: LockId,
    location: Option<&'static std::panic::Location<'static>>,
) -> Result<ContextId, DetectorError> {
    mutex::on_lock(thread, lock_id, false, location)
}

pub fn on_unlock(thread: std::thread::ThreadId, lock_id: LockId) -> Result<(), DetectorError> {
    mutex::on_unlock(thread, lock_id)
}

//! Mutex-shaped hooks into per-context bookkeeping, wired for the
//! `locks::mutex` instrumentation layer.

use crate::core::detector::GLOBAL_DETECTOR;
use crate::core::error::DetectorError;
use crate::core::types::{ContextId, Events, LockId};

/// Register a lock creation (logging only — the core has no per-lock state
/// beyond what lives in dependencies and holding-sets).
pub fn create_lock(lock_id: LockId) {
    let mut detector = GLOBAL_DETECTOR.lock();
    detector.known_locks.insert(lock_id);
    detector.log_if_enabled(|l| l.log_lock_event(lock_id, None, Events::LockCreate));
}

/// Register lock destruction: purge the lock from every context's
/// holding-set (a well-behaved caller has already released it, but this
/// keeps state consistent even if it has not) and log the event.
pub fn destroy_lock(lock_id: LockId) {
    let mut detector = GLOBAL_DETECTOR.lock();
    detector.known_locks.remove(&lock_id);
    for i in 0..detector.registry.len() {
        detector.registry.get_mut(i).on_unlock(lock_id);
    }
    detector.log_if_enabled(|l| l.log_lock_event(lock_id, None, Events::LockDestroy));
}

/// Record a lock acquisition, reached from both the blocking and the
/// non-blocking acquisition paths.
pub fn on_lock(
    thread: std::thread::ThreadId,
    lock_id: LockId,
    is_read: bool,
    location: Option<&'static std::panic::Location<'static>>,
) -> Result<ContextId, DetectorError> {
    let mut detector = GLOBAL_DETECTOR.lock();
    let context = detector.context_for(thread)?;

    if !detector.known_locks.contains(&lock_id) {
        return Err(DetectorError::LockNotInitialized { lock: lock_id });
    }

    detector.log_if_enabled(|l| l.log_lock_event(lock_id, Some(context), Events::Attempt));

    if detector.options.check_double_locking && detector.registry.get(context).is_holding(lock_id)
    {
        return Err(DetectorError::DoubleLock {
            context,
            lock: lock_id,
        });
    }

    detector.registry.get_mut(context).on_lock(lock_id, is_read, location);
    detector.log_if_enabled(|l| l.log_lock_event(lock_id, Some(context), Events::Acquired));

    Ok(context)
}

/// Record a lock release.
pub fn on_unlock(thread: std::thread::ThreadId, lock_id: LockId) -> Result<(), DetectorError> {
    let mut detector = GLOBAL_DETECTOR.lock();
    let context = detector.context_for(thread)?;

    if !detector.registry.get(context).is_holding(lock_id) {
        return Err(DetectorError::UnlockNotHeld {
            context,
            lock: lock_id,
        });
    }

    detector.registry.get_mut(context).on_unlock(lock_id);
    detector.log_if_enabled(|l| l.log_lock_event(lock_id, Some(context), Events::Released));

    Ok(())
}

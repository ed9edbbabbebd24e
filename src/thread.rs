//! `TrackedThread` — a thin wrapper over `std::thread::spawn` that registers
//! and retires an execution context with the detector.
//!
//! The detector already allocates a context lazily on first lock, so this
//! wrapper exists only to make `ContextSpawn`/`ContextExit` visible in the
//! structured log for threads that spawn and exit without ever touching a
//! tracked lock.

use std::thread::JoinHandle;

use crate::core::detector::context::{on_context_exit, on_context_spawn};

/// A wrapper around `std::thread::JoinHandle` that registers an execution
/// context up front, instead of waiting for the thread's first lock
/// acquisition, so `ContextSpawn`/`ContextExit` appear in the structured
/// log even for threads that never touch a tracked lock.
pub struct TrackedThread<T>(JoinHandle<T>);

impl<T> TrackedThread<T>
where
    T: Send + 'static,
{
    /// Spawn `f` on a new OS thread, logging `ContextSpawn` before it runs
    /// and `ContextExit` once it returns (even if `f` panics).
    pub fn spawn<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let handle = std::thread::spawn(move || {
            let thread = std::thread::current().id();
            let _ = on_context_spawn(thread);

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

            on_context_exit(thread);

            match result {
                Ok(value) => value,
                Err(payload) => std::panic::resume_unwind(payload),
            }
        });
        TrackedThread(handle)
    }

    /// Wait for the thread to finish and return its result.
    pub fn join(self) -> std::thread::Result<T> {
        self.0.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_returns_the_closure_result() {
        let handle = TrackedThread::spawn(|| 1 + 1);
        assert_eq!(handle.join().unwrap(), 2);
    }

    #[test]
    fn a_panicking_closure_is_reported_through_join() {
        let handle = TrackedThread::spawn(|| -> () { panic!("boom") });
        assert!(handle.join().is_err());
    }
}

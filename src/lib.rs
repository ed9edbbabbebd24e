//! `lockwarden` — a dynamic deadlock detector for lock-based concurrent
//! programs.
//!
//! Swap `std::sync::Mutex`/`RwLock` for [`TrackedMutex`]/[`TrackedRwLock`],
//! start the detector with [`Sentinel`], and it records the lock-order
//! dependencies every execution context creates as it runs. Two searches
//! consume that history: a post-mortem [`find_potential_deadlocks`] pass
//! that enumerates every simple cycle, and a periodic on-line pass that
//! watches live, currently-blocked contexts and confirms a hit with a
//! re-sample before reporting it.
//!
//! ```no_run
//! use lockwarden::{Sentinel, TrackedMutex};
//! use std::sync::Arc;
//!
//! Sentinel::new()
//!     .callback(|report| eprintln!("deadlock: {report:?}"))
//!     .start()
//!     .expect("failed to start detector");
//!
//! let a = Arc::new(TrackedMutex::new(0));
//! let guard = a.lock();
//! drop(guard);
//! ```

mod core;
pub mod locks;
pub mod thread;

pub use crate::core::detector::reporting::find_potential_deadlocks;
pub use crate::core::error::DetectorError;
pub use crate::core::options::{Options, Sentinel};
pub use crate::core::types::{ContextId, DeadlockKind, DeadlockReport, Events, LockId, ReportedDependency};
pub use crate::locks::mutex::{TrackedMutex, TrackedMutexGuard};
pub use crate::locks::rwlock::{TrackedRwLock, TrackedRwLockReadGuard, TrackedRwLockWriteGuard};
pub use crate::thread::TrackedThread;

/// Stop the periodic-detection background thread. A pass already in
/// progress is allowed to finish. No-op if it was never started.
pub fn stop_periodic() {
    core::detector::GLOBAL_DETECTOR.lock().stop_periodic();
}

/// (Re)start the periodic-detection background thread using the interval
/// configured at [`Sentinel::start`] time. No-op if already running.
pub fn start_periodic() {
    core::detector::GLOBAL_DETECTOR.lock().start_periodic();
}

/// Flush the structured event logger, if one is configured. Blocks until
/// every entry sent so far has been written to disk.
pub fn flush_logs() -> anyhow::Result<()> {
    core::detector::flush_global_detector_logs()
}

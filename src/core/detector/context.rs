//! Context lifecycle hooks, wired for `TrackedThread`.
//!
//! `TrackedThread` calls these explicitly at spawn and at exit so the
//! structured log carries `ContextSpawn`/`ContextExit` markers even for
//! threads that never take a lock.

use crate::core::detector::GLOBAL_DETECTOR;
use crate::core::error::DetectorError;
use crate::core::types::{ContextId, Events};

pub fn on_context_spawn(thread: std::thread::ThreadId) -> Result<ContextId, DetectorError> {
    let mut detector = GLOBAL_DETECTOR.lock();
    let context = detector.context_for(thread)?;
    detector.log_if_enabled(|l| l.log_context_event(context, Events::ContextSpawn));
    Ok(context)
}

pub fn on_context_exit(thread: std::thread::ThreadId) {
    let detector = GLOBAL_DETECTOR.lock();
    if let Some(context) = detector.registry.existing_context_for(thread) {
        detector.log_if_enabled(|l| l.log_context_event(context, Events::ContextExit));
    }
}

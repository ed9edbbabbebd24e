//! Typed usage and resource-exhaustion errors.
//!
//! A double-lock or an unlock of a lock not held is a programmer bug in the
//! instrumented program, not a condition this crate can run through — the
//! instrumentation layer panics with one of these rather than returning a
//! `Result` the caller is expected to recover from.

use crate::core::types::{ContextId, LockId};

#[derive(Debug, Clone, thiserror::Error)]
pub enum DetectorError {
    #[error("context {context} attempted to lock {lock} it already holds (double-lock)")]
    DoubleLock { context: ContextId, lock: LockId },

    #[error("context {context} attempted to unlock {lock} it does not hold")]
    UnlockNotHeld { context: ContextId, lock: LockId },

    #[error("attempted to lock {lock}, which was never registered with the detector")]
    LockNotInitialized { lock: LockId },

    #[error("more execution contexts were observed than max_contexts ({max_contexts})")]
    ContextsExhausted { max_contexts: usize },
}

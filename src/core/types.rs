//! Core identifier and event types shared across the detector.

use serde::{Deserialize, Serialize};

/// Identifies one execution context (currently always an OS thread).
pub type ContextId = usize;

/// Identifies one instrumented lock instance, stable for its lifetime.
pub type LockId = usize;

/// Opaque fingerprint used to deduplicate dependencies and to gauge how many
/// distinct acquired-while-holding patterns exist before the comprehensive
/// search bothers running.
pub type Fingerprint = u64;

/// Lock events recorded by the structured logger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Events {
    ContextSpawn,
    ContextExit,
    LockCreate,
    LockDestroy,
    Attempt,
    Acquired,
    Released,
    DeadlockSuspected,
    DeadlockConfirmed,
}

/// Which search produced a report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeadlockKind {
    /// Found by the post-mortem comprehensive search.
    Comprehensive,
    /// Found by the on-line periodic search.
    Periodic,
}

/// One dependency as it appears in a reported cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportedDependency {
    /// Lock acquired by this step of the cycle.
    pub lock: LockId,
    /// Locks held by `context` at the moment `lock` was acquired.
    pub holding: Vec<LockId>,
    /// Execution context that owns this dependency.
    pub context: ContextId,
    /// Source location captured at the `lock()` call site, if available.
    pub location: Option<String>,
}

/// A reported deadlock: a sequence of dependencies forming a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlockReport {
    pub kind: DeadlockKind,
    pub cycle: Vec<ReportedDependency>,
    /// Set for periodic reports only once the confirmation re-sample has
    /// passed; always `true` for comprehensive reports.
    pub confirmed: bool,
    pub timestamp: String,
}

//! Lock identity allocation and the read/write mode flag.
//!
//! `is_locked`/`locked_by`-style bookkeeping lives in the instrumentation
//! layer (`locks::mutex`, `locks::rwlock`); the search and predicate code
//! never looks at a live lock, only at the identities and `is_read` flags
//! captured in a `Dependency` snapshot.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::types::LockId;

static NEXT_LOCK_ID: AtomicUsize = AtomicUsize::new(1);

/// Allocate a fresh, process-unique lock identity.
pub fn next_lock_id() -> LockId {
    NEXT_LOCK_ID.fetch_add(1, Ordering::Relaxed)
}

/// The mode a lock was acquired in. Read-read pairs are the only ones the
/// reader/writer relaxation in `predicates` ever lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Read,
    Write,
}

impl LockMode {
    pub fn is_read(self) -> bool {
        matches!(self, LockMode::Read)
    }
}

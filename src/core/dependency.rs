//! The dependency record: a lock acquired while already holding some set of
//! other locks, plus enough of a snapshot to test later whether it closes a
//! cycle.

use std::hash::Hasher;
use std::panic::Location;

use fxhash::FxHasher;

use crate::core::types::{ContextId, Fingerprint, LockId};

/// One entry of a holding-set snapshot: the lock's identity and the mode it
/// was held in at snapshot time. The reader/writer relaxation needs the mode
/// of *held* locks, not just acquired ones, so both travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldLock {
    pub id: LockId,
    pub is_read: bool,
}

/// Created at the instant a context acquires lock `m` while already holding
/// the sequence `H`.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// The lock newly acquired by this dependency.
    pub m: LockId,
    /// Whether `m` was acquired in read mode.
    pub m_is_read: bool,
    /// Snapshot of the holding-set at acquisition time. Never mutated after
    /// creation.
    pub holding: Vec<HeldLock>,
    /// The context that created this dependency.
    pub context: ContextId,
    /// Source location of the `lock()` call, if captured.
    pub location: Option<&'static Location<'static>>,
}

impl Dependency {
    /// Build a dependency for acquiring `m`, copying the holding-set `H`.
    pub fn new(
        context: ContextId,
        m: LockId,
        m_is_read: bool,
        holding: &[HeldLock],
        location: Option<&'static Location<'static>>,
    ) -> Self {
        debug_assert!(
            !holding.iter().any(|h| h.id == m),
            "lock {m} already present in its own holding-set"
        );
        Dependency {
            m,
            m_is_read,
            holding: holding.to_vec(),
            context,
            location,
        }
    }

    /// Identity of `m` followed by the identities of `H`, in order. Two
    /// dependencies with the same fingerprint were created under the same
    /// acquired-while-holding pattern.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = FxHasher::default();
        hasher.write_usize(self.m);
        for held in &self.holding {
            hasher.write_usize(held.id);
        }
        hasher.finish()
    }

    pub fn holds(&self, lock: LockId) -> Option<&HeldLock> {
        self.holding.iter().find(|h| h.id == lock)
    }
}

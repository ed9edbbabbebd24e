//! Per-context lock bookkeeping.
//!
//! All operations here are called by the instrumentation layer
//! (`locks::mutex`, `locks::rwlock`) in acquisition order for one context —
//! the order between two calls for the *same* context is already enforced
//! by the global detector lock they're invoked under.

use std::panic::Location;
use std::sync::Arc;

use crate::core::dependency::{Dependency, HeldLock};
use crate::core::types::{ContextId, LockId};

/// One tracked execution context — currently always an OS thread.
pub(crate) struct Context {
    pub(crate) id: ContextId,
    /// Locks currently held, in acquisition order.
    pub(crate) holding: Vec<HeldLock>,
    /// Every dependency this context has ever created, oldest first. Never
    /// shrinks or reorders once an entry is appended.
    pub(crate) dependencies: Vec<Arc<Dependency>>,
    /// The most recently appended dependency, or `None` while this context
    /// holds no locks.
    pub(crate) current_dependency: Option<Arc<Dependency>>,
}

impl Context {
    pub(crate) fn new(id: ContextId) -> Self {
        Context {
            id,
            holding: Vec::new(),
            dependencies: Vec::new(),
            current_dependency: None,
        }
    }

    /// Record that this context is acquiring `m` while already holding
    /// whatever is in `holding`. If this is the context's first lock, there
    /// is nothing to depend on yet, so no dependency is recorded.
    pub(crate) fn on_lock(
        &mut self,
        m: LockId,
        is_read: bool,
        location: Option<&'static Location<'static>>,
    ) {
        if !self.holding.is_empty() {
            let dep = Arc::new(Dependency::new(
                self.id,
                m,
                is_read,
                &self.holding,
                location,
            ));
            self.dependencies.push(Arc::clone(&dep));
            self.current_dependency = Some(dep);
        }
        self.holding.push(HeldLock { id: m, is_read });
    }

    /// A non-blocking acquisition that succeeded: bookkeeping is identical
    /// to a normal lock.
    pub(crate) fn on_try_lock_success(
        &mut self,
        m: LockId,
        is_read: bool,
        location: Option<&'static Location<'static>>,
    ) {
        self.on_lock(m, is_read, location);
    }

    /// Release `m`. The dependency history is never touched — only the
    /// holding-set and the current-dependency pointer move.
    pub(crate) fn on_unlock(&mut self, m: LockId) {
        if let Some(pos) = self.holding.iter().position(|h| h.id == m) {
            self.holding.remove(pos);
        }
        if self.holding.is_empty() {
            self.current_dependency = None;
        }
    }

    pub(crate) fn is_holding(&self, m: LockId) -> bool {
        self.holding.iter().any(|h| h.id == m)
    }

    pub(crate) fn top_of_holding(&self) -> Option<LockId> {
        self.holding.last().map(|h| h.id)
    }
}

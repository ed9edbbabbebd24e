//! A dense, index-addressable table of contexts, keyed internally by OS
//! thread id. Indices are handed out once and never reused or reassigned.

use fxhash::FxHashMap;

use crate::core::context::Context;
use crate::core::error::DetectorError;
use crate::core::types::ContextId;

pub(crate) struct Registry {
    contexts: Vec<Context>,
    index_of: FxHashMap<std::thread::ThreadId, ContextId>,
    max_contexts: usize,
}

impl Registry {
    pub(crate) fn new(max_contexts: usize) -> Self {
        Registry {
            contexts: Vec::new(),
            index_of: FxHashMap::default(),
            max_contexts,
        }
    }

    /// Look up the dense index for the calling OS thread, allocating one on
    /// first use.
    pub(crate) fn context_for(
        &mut self,
        thread: std::thread::ThreadId,
    ) -> Result<ContextId, DetectorError> {
        if let Some(&id) = self.index_of.get(&thread) {
            return Ok(id);
        }
        if self.contexts.len() >= self.max_contexts {
            return Err(DetectorError::ContextsExhausted {
                max_contexts: self.max_contexts,
            });
        }
        let id = self.contexts.len();
        self.contexts.push(Context::new(id));
        self.index_of.insert(thread, id);
        Ok(id)
    }

    /// Look up a context's dense index without allocating one if absent.
    pub(crate) fn existing_context_for(&self, thread: std::thread::ThreadId) -> Option<ContextId> {
        self.index_of.get(&thread).copied()
    }

    pub(crate) fn get(&self, id: ContextId) -> &Context {
        &self.contexts[id]
    }

    pub(crate) fn get_mut(&mut self, id: ContextId) -> &mut Context {
        &mut self.contexts[id]
    }

    pub(crate) fn len(&self) -> usize {
        self.contexts.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Context> {
        self.contexts.iter()
    }

    /// Count of distinct dependency fingerprints across every context. Used
    /// to gate the comprehensive search: a handful of contexts that never
    /// created more than one distinct dependency can't form a cycle.
    pub(crate) fn distinct_dependency_fingerprints(&self) -> usize {
        let mut seen = fxhash::FxHashSet::default();
        for ctx in &self.contexts {
            for dep in &ctx.dependencies {
                seen.insert(dep.fingerprint());
            }
        }
        seen.len()
    }
}

//! Comprehensive (post-mortem) search over every recorded dependency.
//!
//! Adapted from the Goodlock algorithm: enumerate every simple cycle across
//! all dependencies ever created, across every context. Intended to run
//! once, after user code has finished, from a single dedicated context.

use std::sync::Arc;

use chrono::Utc;
use fxhash::FxHashSet;

use crate::core::dependency::Dependency;
use crate::core::predicates::{is_chain, is_cycle};
use crate::core::registry::Registry;
use crate::core::types::{DeadlockKind, DeadlockReport, ReportedDependency};

/// Enumerate all simple cycles over `registry`'s recorded dependencies.
///
/// A no-op returning an empty vector unless at least 2 contexts were ever
/// active and at least 2 distinct dependency fingerprints exist — fewer than
/// that can never close a cycle, so there's nothing worth searching.
pub fn comprehensive_scan(registry: &Registry) -> Vec<DeadlockReport> {
    let mut reports = Vec::new();

    if registry.len() < 2 || registry.distinct_dependency_fingerprints() < 2 {
        return reports;
    }

    let n = registry.len();
    for i in 0..n {
        let ctx_i = registry.get(i);
        // Clone the dependency list up front: dependencies are append-only
        // and never mutated, so a snapshot is always consistent.
        let starts: Vec<Arc<Dependency>> = ctx_i.dependencies.clone();
        for start in starts {
            let mut stack = vec![start];
            let mut occupied: FxHashSet<usize> = FxHashSet::default();
            occupied.insert(i);
            dfs(registry, i, &mut stack, &mut occupied, &mut reports);
        }
    }

    reports
}

/// DFS considers only contexts with index strictly greater than the
/// original starting index `i_start` (every simple cycle is discovered
/// exactly once, rooted at its lowest-indexed member — see DESIGN.md
/// "Comprehensive DFS recursion bound").
fn dfs(
    registry: &Registry,
    i_start: usize,
    stack: &mut Vec<Arc<Dependency>>,
    occupied: &mut FxHashSet<usize>,
    reports: &mut Vec<DeadlockReport>,
) {
    let n = registry.len();
    for j in (i_start + 1)..n {
        if occupied.contains(&j) {
            continue;
        }
        let candidates: Vec<Arc<Dependency>> = registry.get(j).dependencies.clone();
        for candidate in candidates {
            if !is_chain(stack, &candidate) {
                continue;
            }
            if is_cycle(stack, &candidate) {
                reports.push(build_report(stack, &candidate));
                continue; // do not recurse through a closing edge
            }
            stack.push(Arc::clone(&candidate));
            occupied.insert(j);
            dfs(registry, i_start, stack, occupied, reports);
            stack.pop();
            occupied.remove(&j);
        }
    }
}

pub(crate) fn build_report(path: &[Arc<Dependency>], closing: &Dependency) -> DeadlockReport {
    let mut cycle: Vec<ReportedDependency> = path.iter().map(|d| to_reported(d)).collect();
    cycle.push(to_reported(closing));

    DeadlockReport {
        kind: DeadlockKind::Comprehensive,
        cycle,
        confirmed: true,
        timestamp: Utc::now().to_rfc3339(),
    }
}

fn to_reported(d: &Dependency) -> ReportedDependency {
    ReportedDependency {
        lock: d.m,
        holding: d.holding.iter().map(|h| h.id).collect(),
        context: d.context,
        location: d.location.map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Context;

    fn registry_from(contexts: Vec<Context>) -> Registry {
        let mut reg = Registry::new(contexts.len().max(1));
        for ctx in contexts {
            let id = reg.context_for(thread_key(ctx.id)).unwrap();
            assert_eq!(id, ctx.id);
            *reg.get_mut(id) = ctx;
        }
        reg
    }

    // Distinct fake OS-thread keys, one per context index, so Registry's
    // internal map allocates contexts in the order we want.
    fn thread_key(i: usize) -> std::thread::ThreadId {
        use std::thread;
        // ThreadId has no public constructor; spawn throwaway threads and
        // keep only the nth id.
        let handles: Vec<_> = (0..=i)
            .map(|_| thread::spawn(|| thread::current().id()))
            .collect();
        handles.into_iter().last().unwrap().join().unwrap()
    }

    #[test]
    fn classic_ab_ba_reports_one_cycle() {
        let mut ctx0 = Context::new(0);
        ctx0.on_lock(1, false, None); // lock A
        ctx0.on_lock(2, false, None); // lock B while holding A -> D=(B,{A})

        let mut ctx1 = Context::new(1);
        ctx1.on_lock(2, false, None); // lock B
        ctx1.on_lock(1, false, None); // lock A while holding B -> D=(A,{B})

        let registry = registry_from(vec![ctx0, ctx1]);
        let reports = comprehensive_scan(&registry);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].cycle.len(), 2);
    }

    #[test]
    fn no_gate_no_back_edge_reports_nothing() {
        let mut ctx0 = Context::new(0);
        ctx0.on_lock(1, false, None); // A
        ctx0.on_lock(2, false, None); // B while holding A

        let mut ctx1 = Context::new(1);
        ctx1.on_lock(3, false, None); // C
        ctx1.on_lock(2, false, None); // B while holding C

        let registry = registry_from(vec![ctx0, ctx1]);
        assert!(comprehensive_scan(&registry).is_empty());
    }

    #[test]
    fn gate_lock_suppresses_cycle() {
        let mut ctx0 = Context::new(0);
        ctx0.on_lock(10, false, None); // G
        ctx0.on_lock(1, false, None); // A while holding G
        ctx0.on_lock(2, false, None); // B while holding G,A

        let mut ctx1 = Context::new(1);
        ctx1.on_lock(10, false, None); // G
        ctx1.on_lock(2, false, None); // B while holding G
        ctx1.on_lock(1, false, None); // A while holding G,B

        let registry = registry_from(vec![ctx0, ctx1]);
        assert!(comprehensive_scan(&registry).is_empty());
    }

    #[test]
    fn three_cycle_is_reported() {
        let mut ctx0 = Context::new(0);
        ctx0.on_lock(1, false, None); // A
        ctx0.on_lock(2, false, None); // B while holding A

        let mut ctx1 = Context::new(1);
        ctx1.on_lock(2, false, None); // B
        ctx1.on_lock(3, false, None); // C while holding B

        let mut ctx2 = Context::new(2);
        ctx2.on_lock(3, false, None); // C
        ctx2.on_lock(1, false, None); // A while holding C

        let registry = registry_from(vec![ctx0, ctx1, ctx2]);
        let reports = comprehensive_scan(&registry);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].cycle.len(), 3);
    }

    #[test]
    fn fewer_than_two_contexts_is_a_noop() {
        let mut ctx0 = Context::new(0);
        ctx0.on_lock(1, false, None);
        ctx0.on_lock(2, false, None);
        let registry = registry_from(vec![ctx0]);
        assert!(comprehensive_scan(&registry).is_empty());
    }
}

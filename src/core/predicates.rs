//! Chain and cycle predicates over a path of dependencies.
//!
//! A path `P = [D_1, ..., D_k]` is the current stack built up by a search.
//! `is_chain(P, D)` decides whether `D` may extend `P`; `is_cycle(P, D)`
//! decides whether `D` closes `P` back into a cycle indicating a deadlock.

use std::sync::Arc;

use crate::core::dependency::Dependency;

/// Whether `d` may extend `path` without breaking any of the chain rules:
/// no repeated dependency or lock, no colliding gate lock, and the new edge
/// must continue from the lock the path's tail acquired.
pub fn is_chain(path: &[Arc<Dependency>], d: &Dependency) -> bool {
    // 1. No repeated dependency (by identity).
    if path.iter().any(|p| std::ptr::eq(p.as_ref(), d)) {
        return false;
    }

    // 2. No repeated acquired lock.
    if path.iter().any(|p| p.m == d.m) {
        return false;
    }

    // 3. No gate-lock collision, unless both sides are read acquisitions.
    for p in path {
        for a in &p.holding {
            for b in &d.holding {
                if a.id == b.id && !(a.is_read && b.is_read) {
                    return false;
                }
            }
        }
    }

    // 4. Edge continuity: the lock acquired by the previous tail of the
    //    path must appear in D's holding-set. Vacuous when P is empty.
    if let Some(tail) = path.last() {
        if d.holds(tail.m).is_none() {
            return false;
        }
    }

    true
}

/// `is-cycle(P, D)`. Precondition: `is_chain(P, D)` holds. Returns `false`
/// (rather than panicking) when `P` is empty, since an empty path has no
/// `D_1` to close back to — callers never invoke this on an empty path in
/// practice (the searches only test `is_cycle` for non-start dependencies).
pub fn is_cycle(path: &[Arc<Dependency>], d: &Dependency) -> bool {
    debug_assert!(is_chain(path, d), "is_cycle precondition: is_chain must hold");

    let Some(first) = path.first() else {
        return false;
    };

    if first.holds(d.m).is_none() {
        return false;
    }

    check_rw_cycle(path, d)
}

/// Reader/writer relaxation on a closing cycle.
///
/// Examines the closing edge (`d`) and the edge before it (`path.last()`).
/// For each, if the acquired lock was taken in read mode, look at the
/// *successor's* holding-set (wrapping: the successor of `d` is `path[0]`,
/// the successor of `path.last()` is `d`). If the matching lock found there
/// was also taken in read mode, the cycle does not indicate a deadlock.
fn check_rw_cycle(path: &[Arc<Dependency>], d: &Dependency) -> bool {
    let first = match path.first() {
        Some(f) => f,
        None => return true,
    };
    let prev = path.last().expect("path non-empty, checked above");

    // Edge: d, successor: first (wraps to D_1).
    if rejected_by_rw(d, first) {
        return false;
    }

    // Edge: prev, successor: d.
    if rejected_by_rw(prev, d) {
        return false;
    }

    true
}

/// If `edge` was acquired in read mode and its successor's holding-set
/// records the same lock as also held in read mode, the back-edge cannot
/// block — reject the cycle.
fn rejected_by_rw(edge: &Dependency, successor: &Dependency) -> bool {
    if !edge.m_is_read {
        return false;
    }
    match successor.holds(edge.m) {
        Some(held) => held.is_read,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dependency::HeldLock;

    fn dep(context: usize, m: usize, m_is_read: bool, holding: &[(usize, bool)]) -> Arc<Dependency> {
        Arc::new(Dependency::new(
            context,
            m,
            m_is_read,
            &holding
                .iter()
                .map(|&(id, is_read)| HeldLock { id, is_read })
                .collect::<Vec<_>>(),
            None,
        ))
    }

    #[test]
    fn empty_path_accepts_any_start() {
        let d = dep(0, 1, false, &[]);
        assert!(is_chain(&[], &d));
    }

    #[test]
    fn chain_requires_edge_continuity() {
        // D1 = (A, {}) acquired by ctx 0, then D2 = (B, {A}) continues the chain.
        let d1 = dep(0, 1, false, &[]);
        let d2 = dep(1, 2, false, &[(1, false)]);
        assert!(is_chain(&[d1.clone()], &d2));

        // D3 = (C, {X}) does not continue — X != d1.m.
        let d3 = dep(2, 3, false, &[(9, false)]);
        assert!(!is_chain(&[d1], &d3));
    }

    #[test]
    fn classic_ab_ba_cycle() {
        // ctx0: D1 = (B, {A})   ctx1: D2 = (A, {B})
        let d1 = dep(0, 2, false, &[(1, false)]); // acquires B while holding A
        let d2 = dep(1, 1, false, &[(2, false)]); // acquires A while holding B
        assert!(is_chain(&[], &d1));
        assert!(is_chain(&[d1.clone()], &d2));
        assert!(is_cycle(&[d1], &d2));
    }

    #[test]
    fn gate_lock_blocks_extension() {
        // ctx0 holds {G, A} acquiring B; ctx1 holds {G, B} acquiring A.
        // Both hold G -> rule 3 rejects the extension.
        let d1 = dep(0, 3, false, &[(10, false), (1, false)]);
        let d2 = dep(1, 1, false, &[(10, false), (3, false)]);
        assert!(!is_chain(&[d1], &d2));
    }

    #[test]
    fn two_readers_do_not_gate() {
        // Both contexts hold lock 10 as a *reader* -> not a gate lock.
        let d1 = dep(0, 3, false, &[(10, true), (1, false)]);
        let d2 = dep(1, 1, false, &[(10, true), (3, false)]);
        assert!(is_chain(&[d1], &d2));
    }

    #[test]
    fn rw_relaxation_rejects_all_read_cycle() {
        // ctx0: D1 = (B, {A}) acquired in read mode, A held in read mode too (via successor check)
        // ctx1: D2 = (A, {B}) acquired in read mode, B held in read mode.
        let d1 = dep(0, 2, true, &[(1, true)]);
        let d2 = dep(1, 1, true, &[(2, true)]);
        assert!(is_chain(&[d1.clone()], &d2));
        assert!(!is_cycle(&[d1], &d2), "all-read cycle must be filtered out");
    }

    #[test]
    fn write_mode_cycle_survives_rw_filter() {
        let d1 = dep(0, 2, false, &[(1, false)]);
        let d2 = dep(1, 1, false, &[(2, false)]);
        assert!(is_cycle(&[d1], &d2));
    }
}

use lockwarden::TrackedMutex;

mod common;
use common::start_detector_comprehensive_only;

/// Re-entering a `TrackedMutex` already held by the same thread is a
/// programmer bug the instrumentation catches immediately, rather than
/// letting the thread block on itself forever in the underlying
/// `parking_lot::Mutex`.
#[test]
#[should_panic(expected = "double-lock")]
fn reentrant_lock_on_same_thread_panics() {
    let _harness = start_detector_comprehensive_only();

    let mutex = TrackedMutex::new(0);
    let _first = mutex.lock();
    let _second = mutex.lock();
}

//! Report assembly and callback dispatch.

use crate::core::detector::{DISPATCHER, GLOBAL_DETECTOR};
use crate::core::search::comprehensive_scan;
use crate::core::types::{DeadlockReport, Events};

/// Run the comprehensive search now and dispatch/log every report found.
/// Intended to be invoked at program end; never terminates the process,
/// regardless of what it finds.
pub fn find_potential_deadlocks() -> Vec<DeadlockReport> {
    let reports = {
        let detector = GLOBAL_DETECTOR.lock();
        if !(detector.options.run_detection && detector.options.comprehensive_detection) {
            return Vec::new();
        }
        comprehensive_scan(&detector.registry)
    };

    for report in &reports {
        dispatch(report.clone());
    }

    reports
}

fn dispatch(report: DeadlockReport) {
    let detector = GLOBAL_DETECTOR.lock();
    detector.log_if_enabled(|l| {
        l.log_context_event(0, Events::DeadlockSuspected);
        l.log_deadlock(report.clone());
    });
    drop(detector);
    DISPATCHER.send(report);
}

/// A periodic search confirmed a deadlock: log it, dispatch the callback,
/// run the comprehensive search to enrich diagnostics, and terminate the
/// process with exit code 2. This is the only code path in the crate that
/// calls `std::process::exit` — kept isolated from `periodic_scan` itself so
/// the algorithm stays unit-testable without tearing down the test process.
pub fn handle_confirmed_periodic(report: DeadlockReport) -> ! {
    {
        let detector = GLOBAL_DETECTOR.lock();
        detector.log_if_enabled(|l| {
            l.log_context_event(0, Events::DeadlockConfirmed);
            l.log_deadlock(report.clone());
        });
    }
    DISPATCHER.send(report);

    // Enrich diagnostics with a full comprehensive pass before exiting.
    let _ = find_potential_deadlocks();

    if let Err(err) = crate::core::detector::flush_global_detector_logs() {
        eprintln!("lockwarden: failed to flush logs before exit: {err}");
    }

    std::process::exit(2);
}

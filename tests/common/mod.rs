use lockwarden::DeadlockReport;
use std::sync::{Arc, Mutex as StdMutex, mpsc};
use std::time::Duration;

#[allow(dead_code)]
pub const DEADLOCK_TIMEOUT: Duration = Duration::from_secs(3);
#[allow(dead_code)]
pub const NO_DEADLOCK_TIMEOUT: Duration = Duration::from_millis(300);

pub struct DetectorHarness {
    pub rx: mpsc::Receiver<DeadlockReport>,
    pub detected: Arc<StdMutex<bool>>,
}

/// Starts the detector with periodic detection disabled: comprehensive-only
/// tests drive `find_potential_deadlocks()` explicitly and must not risk the
/// periodic timer's confirmed path, which exits the process.
#[allow(dead_code)]
pub fn start_detector_comprehensive_only() -> DetectorHarness {
    let (tx, rx) = mpsc::channel::<DeadlockReport>();
    let detected = Arc::new(StdMutex::new(false));
    let flag = Arc::clone(&detected);

    let mut options = lockwarden::Options::default();
    options.periodic_detection = false;

    lockwarden::Sentinel::new()
        .options(options)
        .callback(move |report| {
            *flag.lock().unwrap() = true;
            let _ = tx.send(report);
        })
        .start()
        .expect("failed to start detector");

    DetectorHarness { rx, detected }
}

#[allow(dead_code)]
pub fn expect_deadlock(h: &DetectorHarness, timeout: Duration) -> DeadlockReport {
    match h.rx.recv_timeout(timeout) {
        Ok(report) => {
            assert!(*h.detected.lock().unwrap(), "deadlock flag should be set");
            report
        }
        Err(_) => panic!("no deadlock detected within {timeout:?}"),
    }
}

#[allow(dead_code)]
pub fn assert_no_deadlock(h: &DetectorHarness, timeout: Duration) {
    assert!(
        h.rx.recv_timeout(timeout).is_err(),
        "unexpected deadlock detected"
    );
}

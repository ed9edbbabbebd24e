//! Background thread driving the periodic search.
//!
//! Ticks on `options.periodic_interval`, invoking the periodic search
//! against the live registry. The host may stop scheduling the timer at
//! any time.

use std::sync::mpsc;
use std::time::Duration;

use crate::core::detector::{Detector, GLOBAL_DETECTOR, reporting};
use crate::core::search::periodic_scan;

impl Detector {
    /// Spawn the periodic-detection background thread, if not already
    /// running. Reads `periodic_interval` once at startup.
    pub fn start_periodic(&mut self) {
        if self.periodic_stop.is_some() {
            return;
        }
        let interval = self.options.periodic_interval;
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        self.periodic_stop = Some(stop_tx);

        std::thread::spawn(move || periodic_loop(interval, stop_rx));
    }

    /// Stop the periodic-detection background thread. A pass already in
    /// progress is allowed to finish.
    pub fn stop_periodic(&mut self) {
        if let Some(stop) = self.periodic_stop.take() {
            let _ = stop.send(());
        }
    }
}

fn periodic_loop(interval: Duration, stop_rx: mpsc::Receiver<()>) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => return,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        let confirmed = {
            let mut detector = GLOBAL_DETECTOR.lock();
            if !(detector.options.run_detection && detector.options.periodic_detection) {
                continue;
            }
            let Detector {
                registry,
                periodic_state,
                ..
            } = &mut *detector;
            periodic_scan(registry, periodic_state)
        };

        if let Some(report) = confirmed {
            reporting::handle_confirmed_periodic(report);
        }
    }
}

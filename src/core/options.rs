//! Process-wide detector configuration and startup.

use std::time::Duration;

use anyhow::Context as _;

use crate::core::detector::{self, GLOBAL_DETECTOR};
use crate::core::logger::EventLogger;
use crate::core::types::DeadlockReport;

/// Recognized options. Read once at detector initialization; not
/// reconfigurable afterward.
#[derive(Debug, Clone)]
pub struct Options {
    /// Master switch: when `false`, no detection ever runs.
    pub run_detection: bool,
    pub periodic_detection: bool,
    pub comprehensive_detection: bool,
    pub check_double_locking: bool,
    /// Sizes the registry / previous-snapshot array.
    pub max_contexts: usize,
    pub periodic_interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            run_detection: true,
            periodic_detection: true,
            comprehensive_detection: true,
            check_double_locking: true,
            max_contexts: 4096,
            periodic_interval: Duration::from_millis(100),
        }
    }
}

/// Builder for process-wide detector configuration and startup.
pub struct Sentinel {
    options: Options,
    log_path: Option<String>,
    callback: Box<dyn Fn(DeadlockReport) + Send + Sync + 'static>,
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new()
    }
}

impl Sentinel {
    /// Create a new builder with default options and a callback that panics
    /// with the report's contents, so a deadlock never goes unnoticed by
    /// default.
    pub fn new() -> Self {
        Sentinel {
            options: Options::default(),
            log_path: None,
            callback: Box::new(|report: DeadlockReport| {
                panic!(
                    "deadlock detected: {}",
                    serde_json::to_string_pretty(&report)
                        .unwrap_or_else(|_| format!("{:?}", report))
                );
            }),
        }
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Enable the structured logger and set the log file path. If the path
    /// contains `{timestamp}`, it is replaced with the current time.
    pub fn with_log<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.log_path = Some(path.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(DeadlockReport) + Send + Sync + 'static,
    {
        self.callback = Box::new(callback);
        self
    }

    /// Initialize the global detector with the configured options, logger,
    /// and callback. Starts the periodic timer if enabled.
    pub fn start(self) -> anyhow::Result<()> {
        let logger = match self.log_path {
            Some(path) => Some(EventLogger::with_path(&path).context("failed to start logger")?),
            None => None,
        };

        detector::init_detector(self.options.clone(), self.callback, logger);

        if self.options.run_detection && self.options.periodic_detection {
            let mut detector = GLOBAL_DETECTOR.lock();
            detector.start_periodic();
        }

        Ok(())
    }
}

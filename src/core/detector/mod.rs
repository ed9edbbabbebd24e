//! Global detector state and lifecycle: one process-wide `GLOBAL_DETECTOR`
//! guarded by a `parking_lot::Mutex`, plus a background dispatcher thread so
//! a deadlock callback can run even when the detecting thread itself is
//! deadlocked.

pub mod context;
pub mod mutex;
pub mod reporting;
pub mod rwlock;
pub mod timer;

use std::sync::{Arc, OnceLock};

use crossbeam_channel::{Sender, unbounded};
use fxhash::FxHashSet;
use parking_lot::Mutex;

use crate::core::error::DetectorError;
use crate::core::logger::EventLogger;
use crate::core::options::Options;
use crate::core::registry::Registry;
use crate::core::search::PeriodicScan;
use crate::core::types::{ContextId, DeadlockReport, LockId};

/// Global storage for the user-provided deadlock callback.
static CALLBACK: OnceLock<Arc<dyn Fn(DeadlockReport) + Send + Sync>> = OnceLock::new();

struct Dispatcher {
    sender: Sender<DeadlockReport>,
    _thread: std::thread::JoinHandle<()>,
}

impl Dispatcher {
    fn new() -> Self {
        let (tx, rx) = unbounded::<DeadlockReport>();
        let handle = std::thread::spawn(move || {
            while let Ok(report) = rx.recv() {
                if let Some(cb) = CALLBACK.get() {
                    cb(report);
                }
            }
        });
        Dispatcher {
            sender: tx,
            _thread: handle,
        }
    }

    fn send(&self, report: DeadlockReport) {
        let _ = self.sender.send(report);
    }
}

lazy_static::lazy_static! {
    static ref DISPATCHER: Dispatcher = Dispatcher::new();
    pub static ref GLOBAL_DETECTOR: Mutex<Detector> = Mutex::new(Detector::new());
}

/// The heart of `lockwarden`: owns the context registry, the configured
/// options, the optional structured logger, and the periodic-search state
/// carried between timer ticks.
pub struct Detector {
    pub(crate) registry: Registry,
    pub(crate) options: Options,
    pub(crate) logger: Option<EventLogger>,
    /// Lock identities created via `create_lock` and not yet destroyed.
    /// Checked by `detector::mutex::on_lock` so acquiring an id this
    /// process never registered is a usage error rather than silently
    /// fabricating state for it.
    pub(crate) known_locks: FxHashSet<LockId>,
    periodic_state: PeriodicScan,
    periodic_stop: Option<std::sync::mpsc::Sender<()>>,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    pub fn new() -> Self {
        let options = Options::default();
        Detector {
            registry: Registry::new(options.max_contexts),
            options,
            logger: None,
            known_locks: FxHashSet::default(),
            periodic_state: PeriodicScan::new(),
            periodic_stop: None,
        }
    }

    pub(crate) fn context_for(
        &mut self,
        thread: std::thread::ThreadId,
    ) -> Result<ContextId, DetectorError> {
        self.registry.context_for(thread)
    }

    pub(crate) fn log_if_enabled<F: FnOnce(&EventLogger)>(&self, f: F) {
        if let Some(logger) = &self.logger {
            f(logger);
        }
    }

    pub fn flush_logs(&self) -> anyhow::Result<()> {
        if let Some(logger) = &self.logger {
            return logger.flush();
        }
        Ok(())
    }
}

/// Initialize the global detector with configuration, a callback, and an
/// optional logger. Replaces the registry so `max_contexts` takes effect.
pub fn init_detector<F>(options: Options, callback: F, logger: Option<EventLogger>)
where
    F: Fn(DeadlockReport) + Send + Sync + 'static,
{
    let cb: Arc<dyn Fn(DeadlockReport) + Send + Sync> = Arc::new(callback);
    CALLBACK.set(cb).ok();

    let mut detector = GLOBAL_DETECTOR.lock();
    detector.registry = Registry::new(options.max_contexts);
    detector.known_locks.clear();
    detector.logger = logger;
    detector.options = options;
}

pub fn flush_global_detector_logs() -> anyhow::Result<()> {
    GLOBAL_DETECTOR.lock().flush_logs()
}

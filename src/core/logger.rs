//! Structured, asynchronous event logger: a background writer thread fed
//! through a channel, batching JSON-line entries tagged with a UTC
//! timestamp.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::core::types::{ContextId, DeadlockReport, Events, LockId};

/// One log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub context: Option<ContextId>,
    pub lock: Option<LockId>,
    pub event: Events,
    pub timestamp: String,
}

enum Command {
    Entry(LogEntry),
    Deadlock(Box<DeadlockReport>),
    Flush(Sender<()>),
}

pub struct EventLogger {
    sender: Sender<Command>,
}

impl EventLogger {
    /// Open (or create) the log file at `path`, replacing a literal
    /// `{timestamp}` placeholder with the current time, and spawn the
    /// background writer thread.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rendered = path
            .as_ref()
            .to_string_lossy()
            .replace("{timestamp}", &Utc::now().format("%Y%m%d_%H%M%S").to_string());
        let path_buf = PathBuf::from(rendered);

        if let Some(parent) = path_buf.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path_buf)
            .with_context(|| format!("opening log file {}", path_buf.display()))?;

        let (tx, rx) = channel::<Command>();
        thread::spawn(move || writer_thread(file, rx));

        Ok(EventLogger { sender: tx })
    }

    pub fn log_lock_event(&self, lock: LockId, context: Option<ContextId>, event: Events) {
        let _ = self.sender.send(Command::Entry(LogEntry {
            context,
            lock: Some(lock),
            event,
            timestamp: Utc::now().to_rfc3339(),
        }));
    }

    pub fn log_context_event(&self, context: ContextId, event: Events) {
        let _ = self.sender.send(Command::Entry(LogEntry {
            context: Some(context),
            lock: None,
            event,
            timestamp: Utc::now().to_rfc3339(),
        }));
    }

    pub fn log_deadlock(&self, report: DeadlockReport) {
        let _ = self.sender.send(Command::Deadlock(Box::new(report)));
    }

    /// Block until every entry sent so far has been written to disk.
    pub fn flush(&self) -> Result<()> {
        let (tx, rx) = channel();
        self.sender
            .send(Command::Flush(tx))
            .context("logger thread has shut down")?;
        rx.recv().context("logger thread dropped without acking flush")
    }
}

fn writer_thread(file: File, rx: Receiver<Command>) {
    let mut writer = BufWriter::new(file);
    for command in rx {
        match command {
            Command::Entry(entry) => {
                if let Ok(line) = serde_json::to_string(&entry) {
                    let _ = writeln!(writer, "{line}");
                }
            }
            Command::Deadlock(report) => {
                if let Ok(line) = serde_json::to_string(&report) {
                    let _ = writeln!(writer, "{line}");
                }
                let _ = writer.flush();
            }
            Command::Flush(ack) => {
                let _ = writer.flush();
                let _ = ack.send(());
            }
        }
    }
}

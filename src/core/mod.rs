pub mod context;
pub mod dependency;
pub mod detector;
pub mod error;
pub mod lock;
pub mod logger;
pub mod options;
pub mod predicates;
pub mod registry;
pub mod search;
pub mod types;

pub use error::DetectorError;
pub use options::{Options, Sentinel};
pub use types::{ContextId, DeadlockKind, DeadlockReport, Events, LockId, ReportedDependency};

//! Cycle searches over recorded lock-order dependencies.

pub mod comprehensive;
pub mod periodic;

pub use comprehensive::comprehensive_scan;
pub use periodic::{PeriodicScan, periodic_scan};

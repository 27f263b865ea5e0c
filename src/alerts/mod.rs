//! Threshold-based success-rate alerting
//!
//! The monitoring loop collects a report for every scope each cycle and hands
//! it to the dispatcher when any scope falls below the threshold or has no
//! data at all.

pub mod config;
pub mod dispatcher;
pub mod monitor;
pub mod notifier;
pub mod report;

pub use config::MonitorConfig;
pub use dispatcher::{AlertDispatcher, DispatchOutcome};
pub use monitor::{CycleOutcome, MonitoringLoop};
pub use notifier::{Notifier, NotifierError};
pub use report::ScopeReport;

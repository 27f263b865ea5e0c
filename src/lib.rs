//! Paywatch: Payment Success-Rate Monitor
//!
//! Polls a payment-transaction API on a fixed interval, computes success-rate
//! statistics per provider and per merchant, and alerts a Telegram operator
//! when any scope drops below a threshold.
//!
//! # Features
//!
//! - **Scoped Stats**: global, per-provider (Easypaisa, JazzCash) and per-merchant
//! - **Consolidated Alerts**: one message covering every scope, with a down-server signal
//! - **Acknowledgment**: the operator replies `/check` to silence the current cycle
//! - **On-Demand Reports**: `/update <merchant>`, `/updateeasy`, `/updatejazz`, `/updateall`
//! - **Health Endpoint**: `GET /` liveness probe
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use paywatch::transactions::{HttpTransactionFetcher, MerchantRegistry, TransactionSource};
//! use paywatch::transactions::{filter_by_provider, Provider, StatsSnapshot};
//!
//! # async fn run() {
//! let registry = MerchantRegistry::parse(
//!     "https://server.example.com/transactions/last-15-mins",
//!     "51:Monetix,5,16",
//! )
//! .unwrap();
//! let fetcher = Arc::new(HttpTransactionFetcher::new());
//!
//! let all = fetcher.fetch(registry.global_endpoint()).await;
//! let easypaisa = StatsSnapshot::from_records(filter_by_provider(&all, Provider::Easypaisa));
//! println!("Easypaisa success rate: {:.2}%", easypaisa.success_rate);
//! # }
//! ```

pub mod alerts;
pub mod api;
pub mod commands;
pub mod config;
pub mod telegram;
pub mod transactions;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use alerts::{AlertDispatcher, MonitorConfig, MonitoringLoop, ScopeReport};
pub use commands::{Command, CommandListener};
pub use config::ConfigError;
pub use transactions::{StatsSnapshot, TransactionRecord};

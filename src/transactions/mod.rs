//! Transaction records and the statistics derived from them
//!
//! Records are fetched from the payment API for a fixed trailing window,
//! partitioned by provider and reduced to success-rate snapshots.

pub mod fetcher;
pub mod filter;
pub mod model;
pub mod registry;
pub mod stats;

pub use fetcher::{FetchError, HttpTransactionFetcher, TransactionSource};
pub use filter::{filter_by_provider, Provider};
pub use model::{ProviderDetails, TransactionRecord, TransactionStatus};
pub use registry::{Merchant, MerchantRegistry};
pub use stats::StatsSnapshot;

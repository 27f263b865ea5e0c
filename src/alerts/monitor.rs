//! Background monitoring loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use super::dispatcher::{AlertDispatcher, DispatchOutcome};
use super::report::{ScopeReport, ALL_EASYPAISA, ALL_JAZZCASH, ALL_TRANSACTIONS};
use crate::transactions::{
    filter_by_provider, MerchantRegistry, Provider, StatsSnapshot, TransactionSource,
};

/// What a single monitoring cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every scope was healthy
    Idle,
    Alerted(DispatchOutcome),
}

/// Periodically fetches every scope and alerts on low success rates
pub struct MonitoringLoop {
    source: Arc<dyn TransactionSource>,
    registry: Arc<MerchantRegistry>,
    dispatcher: AlertDispatcher,
    threshold: f64,
    interval: Duration,
    running: AtomicBool,
}

impl MonitoringLoop {
    pub fn new(
        source: Arc<dyn TransactionSource>,
        registry: Arc<MerchantRegistry>,
        dispatcher: AlertDispatcher,
        threshold: f64,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            registry,
            dispatcher,
            threshold,
            interval,
            running: AtomicBool::new(false),
        }
    }

    /// Fetch the global and per-merchant transactions and build every scope
    ///
    /// Merchant scopes appear only when the provider subset is non-empty.
    pub async fn collect(&self) -> ScopeReport {
        let mut report = ScopeReport::new();

        let all = self.source.fetch(self.registry.global_endpoint()).await;
        report.insert(ALL_TRANSACTIONS, StatsSnapshot::from_records(&all));
        report.insert(
            ALL_EASYPAISA,
            StatsSnapshot::from_records(filter_by_provider(&all, Provider::Easypaisa)),
        );
        report.insert(
            ALL_JAZZCASH,
            StatsSnapshot::from_records(filter_by_provider(&all, Provider::JazzCash)),
        );

        for merchant in self.registry.iter() {
            let transactions = self.source.fetch(&merchant.endpoint).await;
            let name = merchant.display_name();

            for provider in Provider::ALL {
                let subset = filter_by_provider(&transactions, provider);
                if subset.is_empty() {
                    continue;
                }
                report.insert(
                    format!("{} {}", name, provider),
                    StatsSnapshot::from_records(subset),
                );
            }
        }

        report
    }

    /// Run one fetch/evaluate/alert cycle
    pub async fn run_cycle(&self) -> CycleOutcome {
        let report = self.collect().await;

        for (scope, stats) in report.iter() {
            tracing::info!(
                scope,
                success_rate = %format_args!("{:.2}%", stats.success_rate),
                total = stats.total,
                completed = stats.completed,
                failed = stats.failed,
                pending = stats.pending,
                "Transaction success rate"
            );
        }

        if report.any_alerting(self.threshold) {
            CycleOutcome::Alerted(self.dispatcher.dispatch(&report).await)
        } else {
            CycleOutcome::Idle
        }
    }

    /// Start the background loop
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            tracing::info!("Monitoring loop started with interval {:?}", self.interval);

            while self.running.load(Ordering::SeqCst) {
                let outcome = self.run_cycle().await;
                tracing::debug!(?outcome, "Monitoring cycle finished");
                time::sleep(self.interval).await;
            }

            tracing::info!("Monitoring loop stopped");
        })
    }

    /// Stop the loop after its current cycle
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

//! Success-rate statistics over a set of transactions


use super::model::{TransactionRecord, TransactionStatus};

/// Aggregate counts for one scope at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    /// Percentage of completed transactions, 0 when there are none
    pub success_rate: f64,
}

impl StatsSnapshot {
    /// Reduce a set of records into a snapshot
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut stats = StatsSnapshot::default();

        for record in records {
            stats.total += 1;
            match record.status() {
                TransactionStatus::Completed => stats.completed += 1,
                TransactionStatus::Failed => stats.failed += 1,
                TransactionStatus::Pending => stats.pending += 1,
                TransactionStatus::Other => {}
            }
        }

        stats.success_rate = if stats.total == 0 {
            0.0
        } else {
            stats.completed as f64 / stats.total as f64 * 100.0
        };

        stats
    }

    /// No data at all for this scope, read as an unreachable upstream
    pub fn server_may_be_down(&self) -> bool {
        self.total == 0 && self.success_rate == 0.0
    }

    /// Whether this scope should raise an alert at `threshold` percent
    pub fn is_alerting(&self, threshold: f64) -> bool {
        self.success_rate < threshold || self.server_may_be_down()
    }
}

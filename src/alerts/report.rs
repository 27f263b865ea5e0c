//! Scope reports and their chat formatting

use std::fmt::Write;

use crate::transactions::{MerchantRegistry, StatsSnapshot};

pub const ALL_TRANSACTIONS: &str = "All Transactions";
pub const ALL_EASYPAISA: &str = "All Easypaisa";
pub const ALL_JAZZCASH: &str = "All JazzCash";

/// Stats for every scope of one cycle, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeReport {
    entries: Vec<(String, StatsSnapshot)>,
}

impl ScopeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scope: impl Into<String>, stats: StatsSnapshot) {
        self.entries.push((scope.into(), stats));
    }

    pub fn get(&self, scope: &str) -> Option<&StatsSnapshot> {
        self.entries
            .iter()
            .find(|(label, _)| label == scope)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatsSnapshot)> {
        self.entries.iter().map(|(label, stats)| (label.as_str(), stats))
    }

    pub fn scopes(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any scope breaches the threshold
    pub fn any_alerting(&self, threshold: f64) -> bool {
        self.entries.iter().any(|(_, stats)| stats.is_alerting(threshold))
    }
}

fn push_breakdown(message: &mut String, rate_icon: &str, stats: &StatsSnapshot) {
    let _ = write!(
        message,
        "{} Success Rate: {:.2}%\n\
         ✅ Completed: {}\n\
         ❌ Failed: {}\n\
         ⏳ Pending: {}\n\
         📈 Total: {}",
        rate_icon, stats.success_rate, stats.completed, stats.failed, stats.pending, stats.total
    );
}

/// Consolidated alert covering every scope
pub fn format_alert(report: &ScopeReport, threshold: f64) -> String {
    let mut message = String::from("🚨 Transaction Success Rate Report 🚨\n\n");

    for (scope, stats) in report.iter() {
        if stats.server_may_be_down() {
            let _ = writeln!(
                message,
                "⚠️ *{}*: Server might be down (No response from API)",
                scope
            );
            continue;
        }

        if stats.success_rate < threshold {
            let _ = writeln!(message, "*{}* (Below {}%):", scope, threshold);
        } else {
            let _ = writeln!(message, "*{}*:", scope);
        }
        push_breakdown(&mut message, "📊", stats);
        message.push_str("\n\n");
    }

    message.push_str("Reply /check to stop alerts!");
    message
}

/// On-demand report for a single scope
pub fn format_update(scope: &str, stats: &StatsSnapshot) -> String {
    let mut message = format!("📊 *{}* Success Rate Update:\n\n", scope);
    push_breakdown(&mut message, "✅", stats);
    message
}

/// Reply to `/update` with an id that is not in the registry
pub fn format_invalid_merchant(raw_id: &str, registry: &MerchantRegistry) -> String {
    format!(
        "❌ Invalid Merchant ID: {}\nAvailable IDs: {}",
        raw_id,
        registry.available_ids()
    )
}

pub const ACKNOWLEDGED_MESSAGE: &str = "✅ Alerts stopped by user response.";

use serde::{Deserialize, Serialize};

/// A single transaction as reported by the payment API
///
/// Only the fields the monitor reads are modelled; everything else in the
/// payload is ignored during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "providerDetails")]
    pub provider_details: Option<ProviderDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderDetails {
    #[serde(default)]
    pub name: Option<String>,
}

/// Classified transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Completed,
    Failed,
    Pending,
    /// Anything else, including a missing status
    Other,
}

impl TransactionStatus {
    /// Exact, case-sensitive match against the API's status strings
    pub fn parse(raw: &str) -> Self {
        match raw {
            "completed" => TransactionStatus::Completed,
            "failed" => TransactionStatus::Failed,
            "pending" => TransactionStatus::Pending,
            _ => TransactionStatus::Other,
        }
    }
}

impl TransactionRecord {
    pub fn new(status: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            provider_details: Some(ProviderDetails {
                name: Some(provider.into()),
            }),
        }
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
            .as_deref()
            .map(TransactionStatus::parse)
            .unwrap_or(TransactionStatus::Other)
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider_details.as_ref()?.name.as_deref()
    }
}

/// Response body of the transaction listing endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Option<Vec<TransactionRecord>>,
}

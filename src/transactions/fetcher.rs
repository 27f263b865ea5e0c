//! Transaction listing client

use async_trait::async_trait;

use super::model::{TransactionRecord, TransactionsResponse};

/// Source of transaction records for a query endpoint
///
/// Implementations never fail: an unreachable or misbehaving upstream is
/// reported as an empty list, which the alerting path treats as "server may
/// be down".
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch(&self, endpoint: &str) -> Vec<TransactionRecord>;
}

/// HTTP client for the transaction listing endpoint
#[derive(Debug, Clone)]
pub struct HttpTransactionFetcher {
    http_client: reqwest::Client,
}

impl HttpTransactionFetcher {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    /// Fetch and decode the transactions reported at `endpoint`
    pub async fn try_fetch(&self, endpoint: &str) -> Result<Vec<TransactionRecord>, FetchError> {
        let response = self
            .http_client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: TransactionsResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Deserialization(e.to_string()))?;

        Ok(body.transactions.unwrap_or_default())
    }
}

impl Default for HttpTransactionFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionSource for HttpTransactionFetcher {
    async fn fetch(&self, endpoint: &str) -> Vec<TransactionRecord> {
        match self.try_fetch(endpoint).await {
            Ok(transactions) => {
                tracing::debug!(
                    endpoint = %endpoint,
                    count = transactions.len(),
                    "Fetched transactions"
                );
                transactions
            }
            Err(e) => {
                tracing::error!(endpoint = %endpoint, error = %e, "Error fetching transactions");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

//! In-memory transports for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::telegram::{Messenger, TelegramError, Update};
use crate::transactions::{TransactionRecord, TransactionSource};

/// Records outgoing messages and replays scripted `getUpdates` results
#[derive(Default)]
pub struct FakeMessenger {
    sent: Mutex<Vec<String>>,
    polls: Mutex<VecDeque<Result<Vec<Update>, TelegramError>>>,
    offsets: Mutex<Vec<i64>>,
    webhook_deletes: AtomicUsize,
    fail_sends: bool,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Queue the result of the next poll; an empty queue yields no updates
    pub fn push_updates(&self, updates: Vec<Update>) {
        self.polls.lock().push_back(Ok(updates));
    }

    pub fn push_error(&self, error: TelegramError) {
        self.polls.lock().push_back(Err(error));
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn requested_offsets(&self) -> Vec<i64> {
        self.offsets.lock().clone()
    }

    pub fn webhook_deletes(&self) -> usize {
        self.webhook_deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        if self.fail_sends {
            return Err(TelegramError::Network("connection refused".to_string()));
        }
        self.sent.lock().push(text.to_string());
        Ok(())
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        self.offsets.lock().push(offset);
        self.polls.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn delete_webhook(&self) -> Result<(), TelegramError> {
        self.webhook_deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Serves fixed transaction lists per endpoint and records every request
#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<String, Vec<TransactionRecord>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, endpoint: &str, records: Vec<TransactionRecord>) -> Self {
        self.responses.insert(endpoint.to_string(), records);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TransactionSource for FakeSource {
    async fn fetch(&self, endpoint: &str) -> Vec<TransactionRecord> {
        self.requests.lock().push(endpoint.to_string());
        self.responses.get(endpoint).cloned().unwrap_or_default()
    }
}

/// Build records from `(status, provider)` pairs
pub fn txns(pairs: &[(&str, &str)]) -> Vec<TransactionRecord> {
    pairs
        .iter()
        .map(|(status, provider)| TransactionRecord::new(*status, *provider))
        .collect()
}

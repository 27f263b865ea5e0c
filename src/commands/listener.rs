//! Inbox polling and command execution

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time;

use super::parser::Command;
use super::retry::RetryPolicy;
use crate::alerts::notifier::Notifier;
use crate::alerts::report::{
    format_invalid_merchant, format_update, ALL_EASYPAISA, ALL_JAZZCASH, ALL_TRANSACTIONS,
};
use crate::telegram::{Messenger, Update};
use crate::transactions::{
    filter_by_provider, MerchantRegistry, Provider, StatsSnapshot, TransactionSource,
};

/// Polls the operator inbox and runs on-demand reports
pub struct CommandListener {
    messenger: Arc<dyn Messenger>,
    notifier: Notifier,
    source: Arc<dyn TransactionSource>,
    registry: Arc<MerchantRegistry>,
    operator_chat_id: i64,
    bot_username: Option<String>,
    retry: RetryPolicy,
    /// Highest processed `update_id`; the lock is held for a whole poll
    offset: Mutex<i64>,
    /// Set when any poll sees `/check`, cleared when an alert goes out
    acknowledged: AtomicBool,
    running: AtomicBool,
}

impl CommandListener {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        source: Arc<dyn TransactionSource>,
        registry: Arc<MerchantRegistry>,
        operator_chat_id: i64,
    ) -> Self {
        Self {
            notifier: Notifier::new(Arc::clone(&messenger)),
            messenger,
            source,
            registry,
            operator_chat_id,
            bot_username: None,
            retry: RetryPolicy::default(),
            offset: Mutex::new(0),
            acknowledged: AtomicBool::new(false),
            running: AtomicBool::new(false),
        }
    }

    pub fn with_bot_username(mut self, bot_username: Option<String>) -> Self {
        self.bot_username = bot_username;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Last processed update id
    pub async fn offset(&self) -> i64 {
        *self.offset.lock().await
    }

    /// Forget any `/check` seen before the current alert
    pub fn reset_acknowledgment(&self) {
        self.acknowledged.store(false, Ordering::SeqCst);
    }

    /// Poll once more, then report whether `/check` arrived since the last reset
    ///
    /// Covers acknowledgments already consumed by the standalone loop.
    pub async fn await_acknowledgment(&self) -> bool {
        let polled = self.poll().await;
        self.acknowledged.swap(false, Ordering::SeqCst) || polled
    }

    /// Poll the inbox once and run every operator command found
    ///
    /// Returns true when the operator acknowledged with `/check`. The offset
    /// advances past every returned update, recognized or not.
    pub async fn poll(&self) -> bool {
        let mut offset = self.offset.lock().await;

        tracing::debug!(offset = *offset + 1, "Fetching Telegram updates");
        let Some(updates) = self.fetch_updates(*offset + 1).await else {
            return false;
        };

        let mut acknowledged = false;
        for update in updates {
            *offset = (*offset).max(update.update_id);

            let Some(command) = self.operator_command(&update) else {
                continue;
            };

            if command == Command::Check {
                tracing::info!(update_id = update.update_id, "User acknowledged an alert");
                self.acknowledged.store(true, Ordering::SeqCst);
                acknowledged = true;
            } else {
                self.execute(command).await;
            }
        }

        acknowledged
    }

    /// Command carried by an update, if it came from the operator
    fn operator_command(&self, update: &Update) -> Option<Command> {
        let message = update.message.as_ref()?;
        if message.chat.id != self.operator_chat_id {
            tracing::debug!(
                update_id = update.update_id,
                chat_id = message.chat.id,
                "Ignoring message from unknown chat"
            );
            return None;
        }
        let text = message.text.as_deref()?;
        Command::parse(text, self.bot_username.as_deref())
    }

    async fn fetch_updates(&self, offset: i64) -> Option<Vec<Update>> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.messenger.get_updates(offset).await {
                Ok(updates) => return Some(updates),
                Err(e) if e.is_conflict() && self.retry.should_retry(attempts) => {
                    tracing::warn!(
                        attempt = attempts,
                        delay = ?self.retry.delay,
                        "Conflict detected in getUpdates, retrying after delay"
                    );
                    time::sleep(self.retry.delay).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempts, "Error checking Telegram messages");
                    return None;
                }
            }
        }
    }

    async fn execute(&self, command: Command) {
        let global = self.registry.global_endpoint();

        match command {
            Command::Check => {}
            Command::Update(raw_id) => match self.registry.lookup(&raw_id) {
                Some(merchant) => {
                    tracing::info!(merchant_id = merchant.id, "User requested merchant update");
                    let scope = format!("{} {}", merchant.display_name(), Provider::Easypaisa);
                    self.send_report(&scope, &merchant.endpoint, Some(Provider::Easypaisa))
                        .await;
                }
                None => {
                    tracing::info!(merchant_id = %raw_id, "User requested unknown merchant");
                    let message = format_invalid_merchant(&raw_id, &self.registry);
                    self.notifier.notify_or_log(&message).await;
                }
            },
            Command::UpdateProvider(provider) => {
                let scope = match provider {
                    Provider::Easypaisa => ALL_EASYPAISA,
                    Provider::JazzCash => ALL_JAZZCASH,
                };
                tracing::info!(scope, "User requested provider update");
                self.send_report(scope, global, Some(provider)).await;
            }
            Command::UpdateAll => {
                tracing::info!(scope = ALL_TRANSACTIONS, "User requested update");
                self.send_report(ALL_TRANSACTIONS, global, None).await;
            }
        }
    }

    /// Fetch, optionally filter, and send a one-scope report
    pub async fn send_report(
        &self,
        scope: &str,
        endpoint: &str,
        provider: Option<Provider>,
    ) -> StatsSnapshot {
        let transactions = self.source.fetch(endpoint).await;
        let stats = match provider {
            Some(provider) => StatsSnapshot::from_records(filter_by_provider(&transactions, provider)),
            None => StatsSnapshot::from_records(&transactions),
        };

        self.notifier.notify_or_log(&format_update(scope, &stats)).await;
        stats
    }

    /// Start the standalone polling loop
    pub fn start(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            tracing::info!("Command listener started with interval {:?}", interval);

            while self.running.load(Ordering::SeqCst) {
                self.poll().await;
                time::sleep(interval).await;
            }

            tracing::info!("Command listener stopped");
        })
    }

    /// Stop the loop after its current iteration
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::TelegramError;
    use crate::testing::{txns, FakeMessenger, FakeSource};

    const OPERATOR: i64 = 777;
    const BASE: &str = "http://payments.test/last-15-mins";

    fn registry() -> Arc<MerchantRegistry> {
        Arc::new(MerchantRegistry::parse(BASE, "51:Monetix,5,16").unwrap())
    }

    fn listener(messenger: &Arc<FakeMessenger>, source: &Arc<FakeSource>) -> CommandListener {
        CommandListener::new(messenger.clone(), source.clone(), registry(), OPERATOR)
            .with_bot_username(Some("Devtectalertbot".to_string()))
    }

    #[tokio::test]
    async fn test_check_acknowledges_and_advances_offset() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_updates(vec![
            Update::text_message(10, OPERATOR, "hello"),
            Update::text_message(11, OPERATOR, "/check@Devtectalertbot"),
        ]);

        let listener = listener(&messenger, &source);
        assert!(listener.poll().await);
        assert_eq!(listener.offset().await, 11);
        assert_eq!(messenger.requested_offsets(), vec![1]);

        // Next poll asks for updates after the last one seen
        assert!(!listener.poll().await);
        assert_eq!(messenger.requested_offsets(), vec![1, 12]);
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_chat_is_ignored_but_consumed() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_updates(vec![
            Update::text_message(40, 12345, "/check"),
            Update::text_message(41, 12345, "/updateall"),
            Update {
                update_id: 42,
                message: None,
            },
        ]);

        let listener = listener(&messenger, &source);
        assert!(!listener.poll().await);
        assert_eq!(listener.offset().await, 42);
        assert!(source.requests().is_empty());
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_update_known_merchant() {
        let merchant_url = format!("{}?merchantId=51", BASE);
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new().with(
            &merchant_url,
            txns(&[
                ("completed", "Easypaisa"),
                ("failed", "Easypaisa"),
                ("failed", "JazzCash"),
            ]),
        ));
        messenger.push_updates(vec![Update::text_message(5, OPERATOR, "/update 51")]);

        let listener = listener(&messenger, &source);
        assert!(!listener.poll().await);

        assert_eq!(source.requests(), vec![merchant_url]);
        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("📊 *Monetix Easypaisa* Success Rate Update:"));
        assert!(sent[0].contains("Success Rate: 50.00%"));
        assert!(sent[0].contains("📈 Total: 2"));
    }

    #[tokio::test]
    async fn test_update_unnamed_merchant_label() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_updates(vec![Update::text_message(5, OPERATOR, "/update 16")]);

        let listener = listener(&messenger, &source);
        listener.poll().await;

        assert_eq!(source.requests(), vec![format!("{}?merchantId=16", BASE)]);
        assert!(messenger.sent()[0].starts_with("📊 *Merchant 16 Easypaisa*"));
    }

    #[tokio::test]
    async fn test_update_unknown_merchant() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_updates(vec![Update::text_message(9, OPERATOR, "/update 999")]);

        let listener = listener(&messenger, &source);
        assert!(!listener.poll().await);

        assert!(source.requests().is_empty());
        assert_eq!(
            messenger.sent(),
            vec!["❌ Invalid Merchant ID: 999\nAvailable IDs: 5, 16, 51".to_string()]
        );
    }

    #[tokio::test]
    async fn test_global_reports() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new().with(
            BASE,
            txns(&[
                ("completed", "Easypaisa"),
                ("completed", "JazzCash"),
                ("failed", "JazzCash"),
                ("pending", "Other"),
            ]),
        ));
        messenger.push_updates(vec![
            Update::text_message(1, OPERATOR, "/updateeasy"),
            Update::text_message(2, OPERATOR, "/updatejazz"),
            Update::text_message(3, OPERATOR, "/updateall"),
        ]);

        let listener = listener(&messenger, &source);
        listener.poll().await;

        assert_eq!(source.requests(), vec![BASE, BASE, BASE]);
        let sent = messenger.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].starts_with("📊 *All Easypaisa*"));
        assert!(sent[0].contains("Success Rate: 100.00%"));
        assert!(sent[1].starts_with("📊 *All JazzCash*"));
        assert!(sent[1].contains("Success Rate: 50.00%"));
        assert!(sent[2].starts_with("📊 *All Transactions*"));
        assert!(sent[2].contains("📈 Total: 4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_conflict_retries_after_delay() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_error(TelegramError::Conflict("terminated by other getUpdates".into()));
        messenger.push_error(TelegramError::Conflict("terminated by other getUpdates".into()));
        messenger.push_updates(vec![Update::text_message(3, OPERATOR, "/check")]);

        let listener = listener(&messenger, &source);
        let started = time::Instant::now();
        assert!(listener.poll().await);

        assert!(started.elapsed() >= Duration::from_secs(10));
        assert_eq!(messenger.requested_offsets(), vec![1, 1, 1]);
        assert_eq!(listener.offset().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_conflict_retry_gives_up() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        for _ in 0..3 {
            messenger.push_error(TelegramError::Conflict("conflict".into()));
        }
        messenger.push_updates(vec![Update::text_message(3, OPERATOR, "/check")]);

        let listener = listener(&messenger, &source)
            .with_retry(RetryPolicy::bounded(Duration::from_secs(5), 2));
        assert!(!listener.poll().await);
        assert_eq!(messenger.requested_offsets().len(), 2);
        assert_eq!(listener.offset().await, 0);
    }

    #[tokio::test]
    async fn test_other_errors_yield_no_acknowledgment() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_error(TelegramError::Api {
            status: 502,
            body: "Bad Gateway".into(),
        });

        let listener = listener(&messenger, &source);
        assert!(!listener.poll().await);
        assert_eq!(messenger.requested_offsets(), vec![1]);
        assert_eq!(listener.offset().await, 0);
    }

    #[tokio::test]
    async fn test_offset_never_decreases() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_updates(vec![
            Update::text_message(20, OPERATOR, "a"),
            Update::text_message(18, OPERATOR, "b"),
        ]);
        messenger.push_updates(vec![Update::text_message(7, OPERATOR, "stale")]);
        messenger.push_updates(vec![Update::text_message(25, OPERATOR, "c")]);

        let listener = listener(&messenger, &source);
        let mut last = listener.offset().await;
        for expected in [20, 20, 25] {
            listener.poll().await;
            let offset = listener.offset().await;
            assert!(offset >= last);
            assert_eq!(offset, expected);
            last = offset;
        }
    }

    #[tokio::test]
    async fn test_acknowledgment_survives_earlier_poll() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_updates(vec![Update::text_message(4, OPERATOR, "/check")]);

        let listener = listener(&messenger, &source);
        listener.reset_acknowledgment();
        assert!(listener.poll().await);

        // The second poll sees nothing new but the earlier /check still counts, once
        assert!(listener.await_acknowledgment().await);
        assert!(!listener.await_acknowledgment().await);
        assert_eq!(messenger.requested_offsets(), vec![1, 5, 5]);
    }

    #[tokio::test]
    async fn test_reset_discards_stale_acknowledgment() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        messenger.push_updates(vec![Update::text_message(4, OPERATOR, "/check")]);

        let listener = listener(&messenger, &source);
        assert!(listener.poll().await);
        listener.reset_acknowledgment();
        assert!(!listener.await_acknowledgment().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop_loop() {
        let messenger = Arc::new(FakeMessenger::new());
        let source = Arc::new(FakeSource::new());
        let listener = Arc::new(listener(&messenger, &source));

        let handle = Arc::clone(&listener).start(Duration::from_secs(30));
        time::sleep(Duration::from_secs(65)).await;
        assert!(listener.is_running());
        assert_eq!(messenger.requested_offsets().len(), 3);

        listener.stop();
        handle.await.unwrap();
        assert!(!listener.is_running());
    }
}

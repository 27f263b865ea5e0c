//! Alerting and scheduling configuration

use std::time::Duration;

use crate::commands::RetryPolicy;
use crate::config::{env_parse, ConfigError};

/// Timing and threshold settings for the monitoring and command loops
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Success-rate percentage below which a scope alerts
    pub success_threshold: f64,
    /// Sleep between monitoring cycles
    pub cycle_interval: Duration,
    /// Wait after an alert before checking for `/check`
    pub ack_wait: Duration,
    /// Sleep between standalone command polls
    pub command_poll_interval: Duration,
    /// Retry behaviour on conflicting `getUpdates` sessions
    pub conflict_retry: RetryPolicy,
    /// Pause after webhook teardown before the first poll
    pub startup_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            success_threshold: 60.0,
            cycle_interval: Duration::from_secs(600),
            ack_wait: Duration::from_secs(60),
            command_poll_interval: Duration::from_secs(30),
            conflict_retry: RetryPolicy::default(),
            startup_delay: Duration::from_secs(1),
        }
    }
}

impl MonitorConfig {
    /// Create from environment variables, keeping defaults for unset ones
    /// ALERT_THRESHOLD=60
    /// MONITOR_INTERVAL_SECS=600
    /// ACK_WAIT_SECS=60
    /// COMMAND_POLL_INTERVAL_SECS=30
    /// CONFLICT_RETRY_DELAY_SECS=5
    /// CONFLICT_RETRY_MAX_ATTEMPTS=(unbounded)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(threshold) = env_parse::<f64>("ALERT_THRESHOLD")? {
            config = config.with_threshold(threshold)?;
        }
        if let Some(secs) = env_parse::<u64>("MONITOR_INTERVAL_SECS")? {
            config.cycle_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("ACK_WAIT_SECS")? {
            config.ack_wait = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("COMMAND_POLL_INTERVAL_SECS")? {
            config.command_poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("CONFLICT_RETRY_DELAY_SECS")? {
            config.conflict_retry.delay = Duration::from_secs(secs);
        }
        config.conflict_retry.max_attempts = env_parse::<u32>("CONFLICT_RETRY_MAX_ATTEMPTS")?;

        Ok(config)
    }

    /// Set the alert threshold, which must be a percentage
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                var: "ALERT_THRESHOLD",
                value: threshold.to_string(),
                reason: "must be between 0 and 100".to_string(),
            });
        }
        self.success_threshold = threshold;
        Ok(self)
    }
}

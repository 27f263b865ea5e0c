use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::handlers::health_check;
use crate::alerts::{AlertDispatcher, MonitorConfig, MonitoringLoop, Notifier};
use crate::commands::CommandListener;
use crate::config::{env_or, parse_value, ConfigError};
use crate::telegram::{Messenger, TelegramClient, TelegramConfig};
use crate::transactions::{HttpTransactionFetcher, MerchantRegistry, TransactionSource};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub telegram: TelegramConfig,
    pub monitor: MonitorConfig,
    pub registry: MerchantRegistry,
}

impl ServerConfig {
    /// Assemble the full configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "0.0.0.0");
        let port = parse_value("PORT", &env_or("PORT", "3000"))?;

        Ok(Self {
            host,
            port,
            telegram: TelegramConfig::from_env()?,
            monitor: MonitorConfig::from_env()?,
            registry: MerchantRegistry::from_env()?,
        })
    }
}

/// Build the health router
pub fn build_router() -> Router {
    Router::new()
        .route("/", get(health_check))
        .layer(TraceLayer::new_for_http())
}

/// Handles to the two background loops
pub struct Workers {
    pub listener: Arc<CommandListener>,
    pub monitor: Arc<MonitoringLoop>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Workers {
    /// Ask both loops to stop after their current iteration
    pub fn stop(&self) {
        self.listener.stop();
        self.monitor.stop();
    }

    /// Stop immediately without waiting for sleeps to finish
    pub fn abort(self) {
        for handle in self.handles {
            handle.abort();
        }
    }
}

/// Remove the webhook, then start the monitoring and command loops
///
/// The webhook must be gone before the first `getUpdates` call, otherwise
/// Telegram rejects polling.
pub async fn start_workers(
    messenger: Arc<dyn Messenger>,
    source: Arc<dyn TransactionSource>,
    registry: Arc<MerchantRegistry>,
    telegram: &TelegramConfig,
    config: &MonitorConfig,
) -> Workers {
    match messenger.delete_webhook().await {
        Ok(()) => tracing::info!("Webhook deleted"),
        Err(e) => tracing::error!(error = %e, "Error deleting webhook"),
    }
    tokio::time::sleep(config.startup_delay).await;

    let listener = Arc::new(
        CommandListener::new(
            Arc::clone(&messenger),
            Arc::clone(&source),
            Arc::clone(&registry),
            telegram.operator_chat_id,
        )
        .with_bot_username(telegram.bot_username.clone())
        .with_retry(config.conflict_retry),
    );

    let dispatcher = AlertDispatcher::new(
        Notifier::new(messenger),
        Arc::clone(&listener),
        config.ack_wait,
        config.success_threshold,
    );

    let monitor = Arc::new(MonitoringLoop::new(
        source,
        registry,
        dispatcher,
        config.success_threshold,
        config.cycle_interval,
    ));

    tracing::info!("Starting all monitoring tasks");
    let handles = vec![
        Arc::clone(&monitor).start(),
        Arc::clone(&listener).start(config.command_poll_interval),
    ];

    Workers {
        listener,
        monitor,
        handles,
    }
}

/// Run the monitor and the health endpoint until interrupted
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramClient::new(config.telegram.clone()));
    let source: Arc<dyn TransactionSource> = Arc::new(HttpTransactionFetcher::new());
    let registry = Arc::new(config.registry.clone());

    // Bind before starting the loops so a bad address fails fast
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Health endpoint listening on {}", addr);

    let workers = start_workers(messenger, source, registry, &config.telegram, &config.monitor).await;

    axum::serve(listener, build_router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    workers.stop();
    workers.abort();

    tracing::info!("Paywatch stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, stopping workers...");
}

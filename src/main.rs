//! Paywatch Server
//!
//! Run with: cargo run
//!
//! Environment variables (a `.env` file is loaded if present):
//! - TELEGRAM_BOT_TOKEN: Bot API token (required)
//! - TELEGRAM_USER_ID: Operator chat id (required)
//! - TELEGRAM_BOT_USERNAME: Bot name for `/check@<bot>` (default: Devtectalertbot)
//! - HOST: Bind address for the health endpoint (default: 0.0.0.0)
//! - PORT: Port number (default: 3000)
//! - TRANSACTIONS_API_URL: Transaction listing endpoint
//! - MERCHANTS: Tracked merchants as `id[:name]` list (default: 51:Monetix,5,16)
//! - ALERT_THRESHOLD: Success-rate threshold in percent (default: 60)
//! - MONITOR_INTERVAL_SECS / COMMAND_POLL_INTERVAL_SECS / ACK_WAIT_SECS
//! - RUST_LOG: Log level (default: info)

use paywatch::api::{run_server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paywatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    tracing::info!("Paywatch configuration:");
    tracing::info!("  Health endpoint: {}:{}", config.host, config.port);
    tracing::info!("  Transactions API: {}", config.registry.global_endpoint());
    tracing::info!("  Operator chat: {}", config.telegram.operator_chat_id);
    tracing::info!("  Alert threshold: {}%", config.monitor.success_threshold);
    tracing::info!(
        "  Monitor interval: {} seconds",
        config.monitor.cycle_interval.as_secs()
    );
    tracing::info!(
        "  Command poll interval: {} seconds",
        config.monitor.command_poll_interval.as_secs()
    );
    tracing::info!("  Merchants: {}", config.registry.len());
    for merchant in config.registry.iter() {
        tracing::info!("    - {} ({})", merchant.id, merchant.display_name());
    }

    run_server(config).await
}

//! Gamefeed service binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `gamefeed.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Serve the push-event API until the process is terminated

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use gamefeed_core::{FeedConfig, StreamConfig};
use gamefeed_db::{PgSnapshotProvider, PostgresConfig, PostgresPool};
use gamefeed_server::{AppState, ServerConfig, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "gamefeed.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        poll_interval_ms = config.stream.poll_interval_ms,
        max_consecutive_failures = config.stream.max_consecutive_failures,
        board_size = config.stream.board_size,
        "gamefeed starting"
    );

    let pg = PostgresPool::connect(&PostgresConfig::from(&config.infrastructure))
        .await
        .context("failed to connect to PostgreSQL")?;
    pg.run_migrations()
        .await
        .context("failed to run migrations")?;

    let provider = Arc::new(PgSnapshotProvider::new(pg.pool().clone()));
    let state = Arc::new(AppState::new(provider, StreamConfig::from(&config.stream)));

    let served = start_server(&ServerConfig::from(&config.server), state).await;
    pg.close().await;
    served.context("server failed")?;

    info!("gamefeed stopped");
    Ok(())
}

/// Load `gamefeed.yaml` if present, otherwise defaults plus environment
/// overrides.
fn load_config() -> anyhow::Result<FeedConfig> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        FeedConfig::from_file(path).with_context(|| format!("failed to load {CONFIG_PATH}"))
    } else {
        FeedConfig::parse("{}").context("failed to apply environment overrides")
    }
}

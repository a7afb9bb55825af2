//! SalesDesk: notification feeds and sales leaderboard
//!
//! Main entry point that wires the store, leaderboard, and feed session
//! together and keeps the feed running until Ctrl-C.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use salesdesk_core::config::AppConfig;
use salesdesk_core::error::AppError;
use salesdesk_core::traits::AuthProvider;
use salesdesk_core::types::id::UserId;
use salesdesk_realtime::FeedSession;
use salesdesk_service::RankAggregator;
use salesdesk_store::{LocalAuthSession, MemoryDocumentStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("SalesDesk error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SALESDESK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SalesDesk v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Document store ───────────────────────────────────
    let store = Arc::new(MemoryDocumentStore::from_config(&config.store).await?);

    // ── Step 2: Leaderboard ──────────────────────────────────────
    let aggregator = RankAggregator::new(store.clone(), config.leaderboard.clone());
    match aggregator.refresh().await {
        Ok(report) => tracing::info!(
            "Leaderboard ranks persisted: {}/{}",
            report.succeeded,
            report.attempted
        ),
        Err(e) => tracing::warn!("Leaderboard unavailable: {}", e),
    }
    let ranked = aggregator.ranked_performers().await;
    for p in &ranked {
        tracing::info!(
            rank = p.rank,
            name = %p.name,
            revenue = p.revenue,
            deals_closed = p.deals_closed,
            deals_total = p.deals_total,
            conversion_rate = p.conversion_rate,
            "Leaderboard row"
        );
    }

    // ── Step 3: Auth + notification feed ─────────────────────────
    let auth = Arc::new(LocalAuthSession::new());
    let session = FeedSession::start(store.clone(), auth.clone(), config.feed.clone());

    let user = std::env::var("SALESDESK_USER")
        .ok()
        .and_then(|s| s.parse::<UserId>().ok())
        .or_else(|| ranked.first().map(|p| p.user_id));

    match user {
        Some(user_id) => {
            auth.sign_in(user_id);
            session.wait_for_user(Some(user_id)).await;
            if let Some(feed) = session.feed().await {
                let mut updates = feed.watch();
                tokio::spawn(async move {
                    while updates.changed().await.is_ok() {
                        let snapshot = updates.borrow_and_update().clone();
                        tracing::info!(
                            unread = snapshot.unread_count,
                            total = snapshot.notifications.len(),
                            "Notification feed updated"
                        );
                    }
                });
            }
        }
        None => tracing::warn!("No user to sign in; notification feed idle"),
    }

    // ── Step 4: Run until interrupted ────────────────────────────
    tracing::info!("SalesDesk running; press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown: {e}")))?;

    tracing::info!(user = ?auth.current_user(), "Shutting down");
    auth.sign_out();
    session.stop().await;
    Ok(())
}

//! Stock News Bot
//!
//! Entry point. Loads configuration and credentials, initialises
//! structured logging, restores the seen set from disk, and runs the
//! poll → filter → dedup → notify loop until Ctrl+C.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use stock_news_bot::config::{AppConfig, Credentials};
use stock_news_bot::engine::{run_until, NewsCycle, Pacing, Schedule};
use stock_news_bot::filter::KeywordFilter;
use stock_news_bot::news::finnhub::FinnhubClient;
use stock_news_bot::notify::format::{format_startup, keyword_summary};
use stock_news_bot::notify::telegram::TelegramNotifier;
use stock_news_bot::storage::SeenStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = std::env::var("NEWSBOT_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = AppConfig::load_or_default(&config_path)?;

    init_logging();

    // Missing credentials are fatal: nothing useful can happen without them
    let creds = Credentials::from_env(&cfg).context("Missing credentials")?;

    info!(
        symbols = %cfg.watchlist.symbols.join(", "),
        keywords = cfg.filter.keywords.len(),
        interval_secs = cfg.bot.poll_interval_secs,
        category = %cfg.finnhub.category,
        "Stock News Bot starting up"
    );

    // -- Initialise components -------------------------------------------

    let source = FinnhubClient::new(
        creds.finnhub_api_key,
        cfg.finnhub.base_url.clone(),
        Duration::from_secs(cfg.finnhub.timeout_secs),
    )?;

    let notifier = TelegramNotifier::new(
        creds.telegram_bot_token,
        creds.telegram_chat_id,
        cfg.telegram.base_url.clone(),
        Duration::from_secs(cfg.telegram.timeout_secs),
    )?
    .with_link_previews(!cfg.telegram.disable_web_page_preview);

    let filter = KeywordFilter::new(&cfg.filter.keywords)?;
    let store = SeenStore::new(&cfg.storage.seen_file, cfg.storage.max_entries);

    let mut cycle = NewsCycle::new(
        Box::new(source),
        Box::new(notifier),
        store,
        filter,
        cfg.watchlist.symbols.clone(),
        cfg.finnhub.category.clone(),
    )
    .with_lookback_days(cfg.bot.lookback_days)
    .with_pacing(Pacing {
        message_delay: Duration::from_millis(cfg.bot.message_delay_ms),
        fetch_delay: Duration::from_millis(cfg.bot.fetch_delay_ms),
    });

    if cfg.bot.announce_startup {
        let text = format_startup(
            &cfg.watchlist.symbols,
            &keyword_summary(&cfg.filter.keywords, 5),
            cfg.bot.poll_interval_secs,
        );
        cycle.announce(&text).await;
    }

    // -- Main loop -------------------------------------------------------

    info!(
        interval_secs = cfg.bot.poll_interval_secs,
        cooldown_secs = cfg.bot.error_cooldown_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    let schedule = Schedule {
        interval: cfg.poll_interval(),
        cooldown: cfg.error_cooldown(),
    };
    let summary = run_until(&mut cycle, schedule, tokio::signal::ctrl_c()).await;

    info!(
        cycles = summary.cycles_ok,
        failed = summary.cycles_failed,
        sent = summary.articles_sent,
        seen = cycle.seen().len(),
        "Bot stopped by user"
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stock_news_bot=info"));

    if std::env::var("NEWSBOT_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

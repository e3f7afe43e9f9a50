//! Setup check.
//!
//! Verifies credentials and connectivity before the bot is left running:
//! fetches the general feed once and sends one test message. Exits
//! non-zero if either check fails.

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tracing::{error, info, warn};

use stock_news_bot::config::{AppConfig, Credentials};
use stock_news_bot::news::finnhub::FinnhubClient;
use stock_news_bot::news::NewsSource;
use stock_news_bot::notify::telegram::TelegramNotifier;
use stock_news_bot::notify::Notifier;

const TEST_MESSAGE: &str = "✅ Test message from Stock News Bot!\n\n\
    If you see this, your bot is configured correctly!";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config_path = std::env::var("NEWSBOT_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = AppConfig::load_or_default(&config_path)?;
    let creds = Credentials::from_env(&cfg).context("Missing credentials")?;

    let finnhub_ok = check_finnhub(&cfg, &creds).await;
    let telegram_ok = check_telegram(&cfg, &creds).await;

    if finnhub_ok && telegram_ok {
        info!("All checks passed. Ready to run: stock-news-bot");
        Ok(())
    } else {
        bail!("Some checks failed (finnhub: {finnhub_ok}, telegram: {telegram_ok})");
    }
}

async fn check_finnhub(cfg: &AppConfig, creds: &Credentials) -> bool {
    let client = match FinnhubClient::new(
        creds.finnhub_api_key.clone(),
        cfg.finnhub.base_url.clone(),
        Duration::from_secs(cfg.finnhub.timeout_secs),
    ) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Could not build Finnhub client");
            return false;
        }
    };

    match client.fetch_general(&cfg.finnhub.category).await {
        Ok(articles) if !articles.is_empty() => {
            let sample: String = articles[0].headline.chars().take(60).collect();
            info!(count = articles.len(), sample = %sample, "Finnhub API working");
            true
        }
        Ok(_) => {
            warn!("Finnhub API connected but no articles returned");
            false
        }
        Err(e) => {
            error!(error = %e, "Finnhub check failed: verify the API key and rate limits");
            false
        }
    }
}

async fn check_telegram(cfg: &AppConfig, creds: &Credentials) -> bool {
    let notifier = match TelegramNotifier::new(
        creds.telegram_bot_token.clone(),
        creds.telegram_chat_id.clone(),
        cfg.telegram.base_url.clone(),
        Duration::from_secs(cfg.telegram.timeout_secs),
    ) {
        Ok(n) => n,
        Err(e) => {
            error!(error = %e, "Could not build Telegram client");
            return false;
        }
    };

    match notifier.send(TEST_MESSAGE).await {
        Ok(()) => {
            info!("Test message sent. Check your Telegram chat to confirm it arrived");
            true
        }
        Err(e) => {
            error!(
                error = %e,
                "Telegram check failed: verify the bot token, that you have started a chat with the bot, and the chat id"
            );
            false
        }
    }
}

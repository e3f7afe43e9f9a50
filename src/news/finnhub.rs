//! Finnhub news client.
//!
//! API: `https://finnhub.io/api/v1`
//! - `/company-news?symbol=&from=&to=` — per-ticker news, dates as YYYY-MM-DD
//! - `/news?category=` — general feed ("general", "technology", ...)
//! Auth: API key via `token` query param. Free tier: 60 req/min.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::NewsSource;
use crate::types::{Article, NewsBotError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// API response types (Finnhub JSON → Rust)
// ---------------------------------------------------------------------------

/// One entry of the `/company-news` or `/news` array. Every field is
/// optional; missing text fields become empty strings.
#[derive(Debug, Deserialize)]
struct FinnhubArticle {
    /// Usually an integer, occasionally a string or absent.
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    datetime: Option<i64>,
    #[serde(default)]
    url: Option<String>,
}

impl From<FinnhubArticle> for Article {
    fn from(raw: FinnhubArticle) -> Self {
        let url = raw.url.unwrap_or_default();
        Article {
            id: derive_id(raw.id.as_ref(), &url),
            headline: raw.headline.unwrap_or_default(),
            summary: raw.summary.unwrap_or_default(),
            source: raw.source.unwrap_or_default(),
            datetime: raw.datetime.unwrap_or(0),
            url,
        }
    }
}

/// Provider id when present and non-zero/non-empty, else the URL,
/// else nothing.
fn derive_id(id: Option<&Value>, url: &str) -> Option<String> {
    let provider = match id {
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };
    provider.or_else(|| (!url.is_empty()).then(|| url.to_string()))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct FinnhubClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl FinnhubClient {
    /// Create a client. `base_url` defaults to the public API.
    pub fn new(api_key: SecretString, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("stock-news-bot/0.1.0")
            .build()
            .context("Failed to build HTTP client for Finnhub")?;

        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
        })
    }

    /// GET `{base}/{path_and_query}&token=...` and decode an article array.
    async fn get_articles(
        &self,
        feed: &str,
        path_and_query: &str,
    ) -> Result<Vec<Article>, NewsBotError> {
        debug!(feed, request = %path_and_query, "Fetching Finnhub news");

        let url = format!(
            "{}/{}&token={}",
            self.base_url,
            path_and_query,
            urlencoding::encode(self.api_key.expose_secret()),
        );

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| NewsBotError::fetch(feed, format!("request failed: {}", e.without_url())))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(NewsBotError::fetch(feed, format!("HTTP {status}: {body}")));
        }

        let raw: Vec<FinnhubArticle> = resp
            .json()
            .await
            .map_err(|e| NewsBotError::fetch(feed, format!("malformed payload: {}", e.without_url())))?;

        debug!(feed, count = raw.len(), "Finnhub articles received");
        Ok(raw.into_iter().map(Article::from).collect())
    }
}

#[async_trait]
impl NewsSource for FinnhubClient {
    async fn fetch_for_symbol(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Article>, NewsBotError> {
        let query = format!(
            "company-news?symbol={}&from={}&to={}",
            urlencoding::encode(symbol),
            from.format(DATE_FORMAT),
            to.format(DATE_FORMAT),
        );
        self.get_articles(symbol, &query).await
    }

    async fn fetch_general(&self, category: &str) -> Result<Vec<Article>, NewsBotError> {
        let query = format!("news?category={}", urlencoding::encode(category));
        self.get_articles(category, &query).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

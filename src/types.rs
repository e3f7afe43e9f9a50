//! Shared types for the news bot.
//!
//! The data model used by the fetcher, notifier, store and cycle
//! engine. Kept free of I/O so every module can depend on it.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// A news article as delivered by the provider, normalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Dedup identifier: provider id, or the article URL when the
    /// provider gave none. `None` means the article can never be sent.
    pub id: Option<String>,
    pub headline: String,
    pub summary: String,
    /// Publishing outlet, e.g. "Reuters".
    pub source: String,
    /// Publish time, unix epoch seconds.
    pub datetime: i64,
    pub url: String,
}

impl Article {
    /// Publish time as a UTC timestamp. Out-of-range values map to the epoch.
    pub fn published_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.datetime, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// The text the keyword filter searches: `headline + " " + summary`.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.headline, self.summary)
    }

    #[cfg(test)]
    pub fn sample(id: &str, headline: &str) -> Self {
        Article {
            id: Some(id.to_string()),
            headline: headline.to_string(),
            summary: String::new(),
            source: "Reuters".to_string(),
            datetime: 1_700_000_000,
            url: format!("https://example.com/{id}"),
        }
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.source,
            self.headline,
            self.id.as_deref().unwrap_or("no id"),
        )
    }
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

/// Which feed an article batch came from.
///
/// Watchlist articles carry their ticker as a label in outgoing messages
/// and bypass the keyword filter; general-feed articles do neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed<'a> {
    Symbol(&'a str),
    General,
}

impl Feed<'_> {
    /// The ticker label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Feed::Symbol(s) => Some(s),
            Feed::General => None,
        }
    }
}

impl fmt::Display for Feed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Symbol(s) => write!(f, "{s}"),
            Feed::General => write!(f, "general"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cycle report
// ---------------------------------------------------------------------------

/// Summary of one watchlist + general-feed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle_number: u64,
    /// Articles delivered this cycle and now recorded as seen.
    pub sent: usize,
    /// Articles returned by all fetches, before any filtering.
    pub fetched: usize,
    pub skipped_no_id: usize,
    pub skipped_seen: usize,
    pub skipped_irrelevant: usize,
    pub notify_failures: usize,
    pub fetch_failures: usize,
    /// Whether the seen set reached durable storage.
    pub persisted: bool,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle {}: {} sent / {} fetched (seen {}, irrelevant {}, no id {}, notify failed {}, fetch failed {})",
            self.cycle_number,
            self.sent,
            self.fetched,
            self.skipped_seen,
            self.skipped_irrelevant,
            self.skipped_no_id,
            self.notify_failures,
            self.fetch_failures,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors returned across collaborator boundaries.
#[derive(Debug, thiserror::Error)]
pub enum NewsBotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch error ({feed}): {message}")]
    Fetch { feed: String, message: String },

    #[error("Notify error ({channel}): {message}")]
    Notify { channel: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl NewsBotError {
    pub fn fetch(feed: impl fmt::Display, message: impl fmt::Display) -> Self {
        NewsBotError::Fetch {
            feed: feed.to_string(),
            message: message.to_string(),
        }
    }

    pub fn notify(channel: impl fmt::Display, message: impl fmt::Display) -> Self {
        NewsBotError::Notify {
            channel: channel.to_string(),
            message: message.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

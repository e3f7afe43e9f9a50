//! The poll → filter → dedup → notify cycle.
//!
//! One cycle walks the watchlist in order, fetching each symbol's
//! trailing news window, then fetches the general feed once. Every
//! article runs through the same skip / dedup / notify / mark sequence;
//! only general-feed articles are keyword-filtered. The seen set is
//! persisted once, at the end.
//!
//! Collaborator failures never abort a cycle: a failed fetch counts as an
//! empty result, a failed send leaves the article unmarked so a later
//! cycle retries it, and a failed persist keeps the in-memory view.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::runner::PollCycle;
use crate::filter::KeywordFilter;
use crate::news::NewsSource;
use crate::notify::format::format_article;
use crate::notify::Notifier;
use crate::storage::{SeenSet, SeenStore};
use crate::types::{Article, CycleReport, Feed};

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Fixed pauses that keep us under provider and chat rate limits.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// After each delivered message.
    pub message_delay: Duration,
    /// After each per-symbol fetch.
    pub fetch_delay: Duration,
}

impl Pacing {
    /// No pauses at all (tests, dry runs).
    pub fn none() -> Self {
        Self {
            message_delay: Duration::ZERO,
            fetch_delay: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            message_delay: Duration::from_secs(1),
            fetch_delay: Duration::from_secs(1),
        }
    }
}

/// Calendar-date window `[now - days, now]` for per-symbol fetches.
///
/// Dates, not timestamps: articles from early on the `from` day are
/// included, which is accepted.
pub fn fetch_window(now: DateTime<Utc>, days: u32) -> Result<(NaiveDate, NaiveDate)> {
    let from = now
        .checked_sub_signed(ChronoDuration::days(i64::from(days)))
        .context("Lookback window underflows the calendar")?;
    Ok((from.date_naive(), now.date_naive()))
}

// ---------------------------------------------------------------------------
// NewsCycle
// ---------------------------------------------------------------------------

/// Owns the seen set, the watchlist and the collaborators for the life
/// of the process.
pub struct NewsCycle {
    source: Box<dyn NewsSource>,
    notifier: Box<dyn Notifier>,
    store: SeenStore,
    seen: SeenSet,
    filter: KeywordFilter,
    watchlist: Vec<String>,
    category: String,
    lookback_days: u32,
    pacing: Pacing,
    cycle_count: u64,
}

impl NewsCycle {
    /// Build a cycle engine, restoring the seen set from `store`.
    pub fn new(
        source: Box<dyn NewsSource>,
        notifier: Box<dyn Notifier>,
        store: SeenStore,
        filter: KeywordFilter,
        watchlist: Vec<String>,
        category: impl Into<String>,
    ) -> Self {
        let seen = store.load();
        Self {
            source,
            notifier,
            store,
            seen,
            filter,
            watchlist,
            category: category.into(),
            lookback_days: 1,
            pacing: Pacing::default(),
            cycle_count: 0,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn watchlist(&self) -> &[String] {
        &self.watchlist
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Send a free-form message (startup banner). Failure is logged and
    /// reported as `false`, never propagated.
    pub async fn announce(&self, text: &str) -> bool {
        match self.notifier.send(text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to send announcement");
                false
            }
        }
    }

    /// Run one full cycle using the current time for the fetch window.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one full cycle with an explicit clock.
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> Result<CycleReport> {
        let (from, to) = fetch_window(now, self.lookback_days)?;
        self.cycle_count += 1;

        let mut report = CycleReport {
            cycle_number: self.cycle_count,
            ..Default::default()
        };
        info!(cycle = self.cycle_count, %from, %to, "Starting news check cycle");

        // 1. Watchlist, in order
        let watchlist = self.watchlist.clone();
        for symbol in &watchlist {
            info!(symbol = %symbol, "Checking news");
            let articles = match self.source.fetch_for_symbol(symbol, from, to).await {
                Ok(a) => a,
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Fetch failed, treating as empty");
                    report.fetch_failures += 1;
                    Vec::new()
                }
            };
            self.process_articles(&articles, Feed::Symbol(symbol), &mut report)
                .await;
            pause(self.pacing.fetch_delay).await;
        }

        // 2. General feed, keyword-filtered
        info!(category = %self.category, "Checking general news");
        let general = match self.source.fetch_general(&self.category).await {
            Ok(a) => a,
            Err(e) => {
                warn!(category = %self.category, error = %e, "General feed fetch failed, treating as empty");
                report.fetch_failures += 1;
                Vec::new()
            }
        };
        self.process_articles(&general, Feed::General, &mut report)
            .await;

        // 3. Persist once, then keep memory in line with the durable cap
        match self.store.persist(&self.seen) {
            Ok(()) => report.persisted = true,
            Err(e) => error!(error = %e, "Failed to persist seen set, keeping in-memory view"),
        }
        self.seen.truncate_to_recent(self.store.max_entries());

        debug!(cycle = report.cycle_number, sent = report.sent, "Cycle finished");
        Ok(report)
    }

    async fn process_articles(
        &mut self,
        articles: &[Article],
        feed: Feed<'_>,
        report: &mut CycleReport,
    ) {
        report.fetched += articles.len();

        for article in articles {
            let Some(id) = article.id.as_deref() else {
                debug!(feed = %feed, headline = %article.headline, "Skipping article without identifier");
                report.skipped_no_id += 1;
                continue;
            };

            if self.seen.contains(id) {
                report.skipped_seen += 1;
                continue;
            }

            if feed == Feed::General && !self.filter.is_relevant(article) {
                report.skipped_irrelevant += 1;
                continue;
            }

            let message = format_article(article, feed);
            match self.notifier.send(&message).await {
                Ok(()) => {
                    self.seen.add(id);
                    report.sent += 1;
                    let short: String = article.headline.chars().take(50).collect();
                    info!(feed = %feed, id, headline = %short, "Sent article");
                    pause(self.pacing.message_delay).await;
                }
                Err(e) => {
                    warn!(feed = %feed, id, error = %e, "Delivery failed, article left unmarked");
                    report.notify_failures += 1;
                }
            }
        }
    }
}

#[async_trait]
impl PollCycle for NewsCycle {
    async fn run_once(&mut self) -> Result<CycleReport> {
        self.run_cycle().await
    }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! In-memory collaborators for integration testing.
//!
//! `FakeSource` serves scripted articles per symbol and for the general
//! feed; `FakeNotifier` records every delivered message. Both hand out
//! shared handles so tests can inspect or re-script them after the
//! engine has taken ownership.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use stock_news_bot::filter::KeywordFilter;
use stock_news_bot::news::NewsSource;
use stock_news_bot::notify::Notifier;
use stock_news_bot::engine::{NewsCycle, Pacing};
use stock_news_bot::storage::SeenStore;
use stock_news_bot::types::{Article, NewsBotError};

pub fn article(id: &str, headline: &str) -> Article {
    Article {
        id: Some(id.to_string()),
        headline: headline.to_string(),
        summary: String::new(),
        source: "Reuters".to_string(),
        datetime: 1_700_000_000,
        url: format!("https://news.example.com/{id}"),
    }
}

pub fn temp_path() -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("newsbot_it_seen_{}.json", uuid::Uuid::new_v4()));
    p
}

// ---------------------------------------------------------------------------
// FakeSource
// ---------------------------------------------------------------------------

type Scripted = Result<Vec<Article>, String>;

#[derive(Clone, Default)]
pub struct FakeSource {
    symbols: Arc<Mutex<HashMap<String, Scripted>>>,
    general: Arc<Mutex<Option<Scripted>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_symbol(&self, symbol: &str, articles: Vec<Article>) {
        self.symbols
            .lock()
            .unwrap()
            .insert(symbol.to_string(), Ok(articles));
    }

    pub fn fail_symbol(&self, symbol: &str, msg: &str) {
        self.symbols
            .lock()
            .unwrap()
            .insert(symbol.to_string(), Err(msg.to_string()));
    }

    pub fn set_general(&self, articles: Vec<Article>) {
        *self.general.lock().unwrap() = Some(Ok(articles));
    }

    pub fn fail_general(&self, msg: &str) {
        *self.general.lock().unwrap() = Some(Err(msg.to_string()));
    }

    /// Fetch calls in order: symbols, then `general:<category>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSource for FakeSource {
    async fn fetch_for_symbol(
        &self,
        symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<Article>, NewsBotError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        match self.symbols.lock().unwrap().get(symbol) {
            Some(Ok(a)) => Ok(a.clone()),
            Some(Err(msg)) => Err(NewsBotError::fetch(symbol, msg)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_general(&self, category: &str) -> Result<Vec<Article>, NewsBotError> {
        self.calls.lock().unwrap().push(format!("general:{category}"));
        match self.general.lock().unwrap().as_ref() {
            Some(Ok(a)) => Ok(a.clone()),
            Some(Err(msg)) => Err(NewsBotError::fetch(category, msg)),
            None => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// FakeNotifier
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FakeNotifier {
    delivered: Arc<Mutex<Vec<String>>>,
    attempts: Arc<Mutex<usize>>,
    /// Messages containing any of these substrings are rejected.
    reject: Arc<Mutex<Vec<String>>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_containing(&self, needle: &str) {
        self.reject.lock().unwrap().push(needle.to_string());
    }

    pub fn accept_all(&self) {
        self.reject.lock().unwrap().clear();
    }

    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, text: &str) -> Result<(), NewsBotError> {
        *self.attempts.lock().unwrap() += 1;
        if self
            .reject
            .lock()
            .unwrap()
            .iter()
            .any(|n| text.contains(n.as_str()))
        {
            return Err(NewsBotError::notify("fake", "rejected"));
        }
        self.delivered.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Engine wired to fakes with no pauses.
pub fn engine(
    source: &FakeSource,
    notifier: &FakeNotifier,
    store: SeenStore,
    watchlist: &[&str],
    keywords: &[&str],
) -> NewsCycle {
    NewsCycle::new(
        Box::new(source.clone()),
        Box::new(notifier.clone()),
        store,
        KeywordFilter::new(keywords).unwrap(),
        watchlist.iter().map(|s| s.to_string()).collect(),
        "technology",
    )
    .with_pacing(Pacing::none())
}

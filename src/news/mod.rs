//! News retrieval.
//!
//! Defines the `NewsSource` trait the cycle engine depends on, and the
//! Finnhub implementation used in production.

pub mod finnhub;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{Article, NewsBotError};

/// Abstraction over a news provider.
///
/// Both calls return articles in provider order. Any failure (network,
/// non-2xx status, malformed payload) comes back as `NewsBotError::Fetch`;
/// callers decide how to recover.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Company news for one ticker between two calendar dates, inclusive.
    async fn fetch_for_symbol(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Article>, NewsBotError>;

    /// Topic feed, e.g. "technology".
    async fn fetch_general(&self, category: &str) -> Result<Vec<Article>, NewsBotError>;
}

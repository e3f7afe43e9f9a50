//! Keyword relevance filter for the general news feed.
//!
//! Case-insensitive substring match over `headline + " " + summary`.
//! Watchlist articles never pass through here.

use crate::types::{Article, NewsBotError};

/// Pre-lowercased keyword set.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Build a filter. Empty or whitespace-only keywords are rejected,
    /// since an empty pattern would match every article.
    pub fn new<I, S>(keywords: I) -> Result<Self, NewsBotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref();
            if kw.trim().is_empty() {
                return Err(NewsBotError::Config(
                    "keywords must not be empty".to_string(),
                ));
            }
            out.push(kw.to_lowercase());
        }
        Ok(Self { keywords: out })
    }

    pub fn is_relevant(&self, article: &Article) -> bool {
        let text = article.search_text().to_lowercase();
        self.keywords.iter().any(|kw| text.contains(kw.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// One-shot form of [`KeywordFilter::is_relevant`].
pub fn is_relevant<S: AsRef<str>>(article: &Article, keywords: &[S]) -> bool {
    let text = article.search_text().to_lowercase();
    keywords
        .iter()
        .any(|kw| text.contains(&kw.as_ref().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(headline: &str, summary: &str) -> Article {
        let mut a = Article::sample("1", headline);
        a.summary = summary.to_string();
        a
    }

    #[test]
    fn test_matches_headline() {
        let f = KeywordFilter::new(["AI"]).unwrap();
        assert!(f.is_relevant(&article("Company launches AI chip", "")));
    }

    #[test]
    fn test_no_match() {
        let f = KeywordFilter::new(["AI"]).unwrap();
        assert!(!f.is_relevant(&article("Quarterly earnings", "Revenue up 2%")));
    }

    #[test]
    fn test_matches_summary_case_insensitive() {
        let f = KeywordFilter::new(["Data Center"]).unwrap();
        assert!(f.is_relevant(&article("Capex update", "New DATA CENTER in Ohio")));
    }

    #[test]
    fn test_substring_match_inside_words() {
        // plain substring semantics: "ai" occurs in "said"
        let f = KeywordFilter::new(["ai"]).unwrap();
        assert!(f.is_relevant(&article("CEO said nothing", "")));
    }

    #[test]
    fn test_keyword_spanning_headline_and_summary() {
        let f = KeywordFilter::new(["chip maker"]).unwrap();
        assert!(f.is_relevant(&article("Shares of chip", "maker jump")));
    }

    #[test]
    fn test_order_independent() {
        let a = article("Rocket launch delayed", "");
        let f1 = KeywordFilter::new(["robot", "rocket"]).unwrap();
        let f2 = KeywordFilter::new(["rocket", "robot"]).unwrap();
        assert_eq!(f1.is_relevant(&a), f2.is_relevant(&a));
    }

    #[test]
    fn test_empty_text_never_matches() {
        let f = KeywordFilter::new(["gpu"]).unwrap();
        assert!(!f.is_relevant(&article("", "")));
    }

    #[test]
    fn test_rejects_empty_keyword() {
        assert!(KeywordFilter::new(["AI", ""]).is_err());
        assert!(KeywordFilter::new(["   "]).is_err());
    }

    #[test]
    fn test_empty_keyword_list_matches_nothing() {
        let f = KeywordFilter::new(Vec::<String>::new()).unwrap();
        assert!(f.is_empty());
        assert!(!f.is_relevant(&article("AI everywhere", "")));
    }

    #[test]
    fn test_free_function() {
        assert!(is_relevant(&article("Company launches AI chip", ""), &["AI"]));
        assert!(!is_relevant(&article("Quarterly earnings", "Revenue up 2%"), &["AI"]));
    }
}

//! Message formatting (Telegram HTML subset: `<b>` and `<a href>`).

use crate::types::{Article, Feed};

/// Summaries longer than this many characters are cut and get "...".
pub const SUMMARY_LIMIT: usize = 300;

/// Escape characters that are special inside Telegram HTML text and attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn truncate_summary(summary: &str) -> String {
    match summary.char_indices().nth(SUMMARY_LIMIT) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary.to_string(),
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Render an article as an outgoing chat message.
pub fn format_article(article: &Article, feed: Feed<'_>) -> String {
    let header = match feed.label() {
        Some(symbol) => format!("Stock: {}", escape_html(symbol)),
        None => "Market News".to_string(),
    };

    let mut msg = format!("🚨 <b>{header}</b>\n\n");
    msg.push_str(&format!(
        "<b>{}</b>\n\n",
        escape_html(or_default(&article.headline, "No headline"))
    ));

    if !article.summary.is_empty() {
        msg.push_str(&escape_html(&truncate_summary(&article.summary)));
        msg.push_str("\n\n");
    }

    msg.push_str(&format!(
        "📰 Source: {}\n",
        escape_html(or_default(&article.source, "Unknown"))
    ));
    msg.push_str(&format!(
        "🕐 {}\n\n",
        article.published_at().format("%Y-%m-%d %H:%M UTC")
    ));
    msg.push_str(&format!(
        "🔗 <a href=\"{}\">Read more</a>",
        escape_html(&article.url)
    ));
    msg
}

/// One-off announcement sent when the bot starts.
pub fn format_startup(symbols: &[String], keyword_summary: &str, interval_secs: u64) -> String {
    let mut msg = String::from("🤖 <b>Stock News Bot Started!</b>\n\n");
    msg.push_str(&format!("📊 Monitoring: {}\n", escape_html(&symbols.join(", "))));
    msg.push_str(&format!("🔍 Keywords: {}\n", escape_html(keyword_summary)));
    msg.push_str(&format!("⏱ Check interval: {}", format_interval(interval_secs)));
    msg
}

/// Short keyword preview: first `max` keywords, then a count of the rest.
pub fn keyword_summary(keywords: &[String], max: usize) -> String {
    if keywords.len() <= max {
        return keywords.join(", ");
    }
    format!(
        "{} (+{} more)",
        keywords[..max].join(", "),
        keywords.len() - max
    )
}

fn format_interval(secs: u64) -> String {
    if secs % 60 == 0 {
        let m = secs / 60;
        format!("{m} minute{}", if m == 1 { "" } else { "s" })
    } else {
        format!("{secs} seconds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_header() {
        let a = Article::sample("1", "ABC raises funding");
        let msg = format_article(&a, Feed::Symbol("ABC"));
        assert!(msg.starts_with("🚨 <b>Stock: ABC</b>"));
        assert!(msg.contains("<b>ABC raises funding</b>"));
        assert!(msg.contains("📰 Source: Reuters"));
        assert!(msg.contains("2023-11-14 22:13 UTC"));
        assert!(msg.ends_with("<a href=\"https://example.com/1\">Read more</a>"));
    }

    #[test]
    fn test_general_header() {
        let a = Article::sample("1", "x");
        assert!(format_article(&a, Feed::General).starts_with("🚨 <b>Market News</b>"));
    }

    #[test]
    fn test_empty_summary_omitted() {
        let a = Article::sample("1", "Headline");
        let msg = format_article(&a, Feed::General);
        assert!(msg.contains("<b>Headline</b>\n\n📰"));
    }

    #[test]
    fn test_long_summary_truncated() {
        let mut a = Article::sample("1", "h");
        a.summary = "é".repeat(SUMMARY_LIMIT + 5);
        let msg = format_article(&a, Feed::General);
        let expected = format!("{}...", "é".repeat(SUMMARY_LIMIT));
        assert!(msg.contains(&expected));
        assert!(!msg.contains(&"é".repeat(SUMMARY_LIMIT + 1)));
    }

    #[test]
    fn test_summary_at_limit_untouched() {
        let mut a = Article::sample("1", "h");
        a.summary = "x".repeat(SUMMARY_LIMIT);
        let msg = format_article(&a, Feed::General);
        assert!(!msg.contains("..."));
    }

    #[test]
    fn test_missing_fields_defaults() {
        let mut a = Article::sample("1", "");
        a.source.clear();
        let msg = format_article(&a, Feed::General);
        assert!(msg.contains("<b>No headline</b>"));
        assert!(msg.contains("Source: Unknown"));
    }

    #[test]
    fn test_html_escaped() {
        let mut a = Article::sample("1", "S&P <500> record");
        a.url = "https://x/?a=1&b=\"2\"".into();
        let msg = format_article(&a, Feed::General);
        assert!(msg.contains("<b>S&amp;P &lt;500&gt; record</b>"));
        assert!(msg.contains("href=\"https://x/?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_startup_message() {
        let msg = format_startup(&["MSFT".into(), "META".into()], "AI, chip", 300);
        assert!(msg.contains("Monitoring: MSFT, META"));
        assert!(msg.contains("Keywords: AI, chip"));
        assert!(msg.ends_with("Check interval: 5 minutes"));
    }

    #[test]
    fn test_interval_rendering() {
        assert_eq!(format_interval(60), "1 minute");
        assert_eq!(format_interval(90), "90 seconds");
    }

    #[test]
    fn test_keyword_summary() {
        let kws: Vec<String> = ["AI", "GPU", "rocket"].iter().map(|s| s.to_string()).collect();
        assert_eq!(keyword_summary(&kws, 5), "AI, GPU, rocket");
        assert_eq!(keyword_summary(&kws, 2), "AI, GPU (+1 more)");
    }
}

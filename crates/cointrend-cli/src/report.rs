//! `report` command handler.

use std::fmt::Write as _;

use cointrend_core::{ArticleRecord, ArticleStore, Sentiment, SentimentDistribution};
use cointrend_db::PgArticleStore;

const SEPARATOR_WIDTH: usize = 80;

/// Print the latest stored analyses for `coin` and its label distribution.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_report(pool: &sqlx::PgPool, coin: &str, limit: usize) -> anyhow::Result<()> {
    let store = PgArticleStore::new(pool.clone());
    let records = store.query(coin, limit).await?;
    let distribution = if records.is_empty() {
        SentimentDistribution::default()
    } else {
        store.aggregate(coin).await?
    };

    print!("{}", render_report(coin, &records, &distribution));
    Ok(())
}

fn marker(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Bullish => "\u{1f7e2}",
        Sentiment::Bearish => "\u{1f534}",
        Sentiment::Neutral => "\u{26aa}",
    }
}

/// Render the report text. Pure so it can be tested without a database.
pub(crate) fn render_report(
    coin: &str,
    records: &[ArticleRecord],
    distribution: &SentimentDistribution,
) -> String {
    let mut out = String::new();
    if records.is_empty() {
        let _ = writeln!(out, "No data found for {coin}.");
        return out;
    }

    let _ = writeln!(out, "\nLatest {coin} Sentiment Analysis:\n");
    let separator = "-".repeat(SEPARATOR_WIDTH);

    for record in records {
        let _ = writeln!(out, "{} {}", marker(record.sentiment), record.title);
        let _ = writeln!(out, "   URL: {}", record.url);
        let _ = writeln!(out, "   Date: {}", record.retrieval_date.format("%Y-%m-%d"));
        let _ = writeln!(
            out,
            "   Sentiment: {} (confidence: {:.2})",
            record.sentiment.title_case(),
            record.score
        );
        let _ = writeln!(out, "   Summary: {}", record.summary);
        let _ = writeln!(out, "\n{separator}\n");
    }

    if !distribution.is_empty() {
        let _ = writeln!(out, "Overall sentiment distribution for {coin}:");
        for (sentiment, count) in distribution.iter() {
            let _ = writeln!(
                out,
                "{} {}: {count} articles",
                marker(sentiment),
                sentiment.title_case()
            );
        }
    }
    out
}

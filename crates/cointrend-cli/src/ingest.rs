//! `ingest` command handler.

use std::time::Duration;

use cointrend_core::{ApiCredentials, AppConfig, ArticleStore};
use cointrend_db::{MemoryArticleStore, PgArticleStore};
use cointrend_scraper::ArticleFetcher;
use cointrend_search::BraveSearchClient;
use cointrend_sentiment::{
    AnthropicAnalyzer, CandidateOutcome, CandidateReport, FixedDelay, IngestPipeline, IngestReport,
    Progress,
};

/// Run one ingestion pass for `coin` against Postgres and print every
/// candidate's outcome.
///
/// # Errors
///
/// Returns an error if a client cannot be built, the search call fails, or
/// the database becomes unusable mid-run. Per-article failures are printed
/// and skipped.
pub(crate) async fn run_ingest(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    credentials: &ApiCredentials,
    coin: &str,
    count: usize,
) -> anyhow::Result<()> {
    let store = PgArticleStore::new(pool.clone());
    ingest_into(&store, config, credentials, coin, count).await
}

/// Same as [`run_ingest`] but results go to an in-memory store and are
/// discarded on exit.
///
/// # Errors
///
/// Returns an error if a client cannot be built or the search call fails.
pub(crate) async fn run_ingest_dry_run(
    config: &AppConfig,
    credentials: &ApiCredentials,
    coin: &str,
    count: usize,
) -> anyhow::Result<()> {
    let store = MemoryArticleStore::new();
    ingest_into(&store, config, credentials, coin, count).await?;
    println!("dry run: {} article(s) analysed, nothing written", store.len().await);
    Ok(())
}

async fn ingest_into(
    store: &dyn ArticleStore,
    config: &AppConfig,
    credentials: &ApiCredentials,
    coin: &str,
    count: usize,
) -> anyhow::Result<()> {
    let discovery = BraveSearchClient::new(&credentials.brave_api_key, config.search_timeout_secs)?;
    let extractor = ArticleFetcher::new(config.fetch_timeout_secs, &config.fetch_user_agent)?;
    let analyzer = AnthropicAnalyzer::new(
        &credentials.anthropic_api_key,
        &config.anthropic_model,
        config.anthropic_max_tokens,
        config.analyzer_timeout_secs,
    )?;
    let pacer = FixedDelay(Duration::from_millis(config.pacing_delay_ms));

    println!("Searching for latest {coin} news...");
    let pipeline = IngestPipeline::new(&discovery, &extractor, &analyzer, store, &pacer);
    let report = pipeline
        .run_with_progress(coin, count, &StdoutProgress)
        .await?;

    print!("{}", render_ingest_summary(&report));
    Ok(())
}

/// Prints each candidate's outcome as soon as the pipeline resolves it.
struct StdoutProgress;

impl Progress for StdoutProgress {
    fn discovered(&self, _coin: &str, count: usize) {
        if count > 0 {
            println!("Found {count} articles.");
        }
    }

    fn outcome(&self, entry: &CandidateReport) {
        println!("{}", outcome_line(entry));
    }
}

/// Closing lines printed once the run has finished.
pub(crate) fn render_ingest_summary(report: &IngestReport) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    if report.is_empty() {
        out.push_str("No results found.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "\nStored {} of {} ({} skipped, {} failed, {} duplicate).",
        report.stored_count(),
        report.discovered,
        report.skipped_count(),
        report.failed_count(),
        report.duplicate_count(),
    );
    if report.stored_count() == 0 && report.skipped_count() < report.discovered {
        out.push_str("No new articles could be stored this run.\n");
    }
    out
}

fn outcome_line(entry: &CandidateReport) -> String {
    let title = if entry.title.is_empty() {
        entry.url.as_str()
    } else {
        entry.title.as_str()
    };
    match &entry.outcome {
        CandidateOutcome::Skipped => format!("skip     {title} (already stored)"),
        CandidateOutcome::ExtractionFailed { reason }
        | CandidateOutcome::AnalysisFailed { reason } => format!("fail     {title}: {reason}"),
        CandidateOutcome::Duplicate => format!("warn     {title}: article already exists"),
        CandidateOutcome::Stored { sentiment, score, .. } => {
            format!("stored   {title}: {sentiment} ({score:.2})")
        }
    }
}

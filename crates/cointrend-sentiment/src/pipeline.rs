//! Ingestion pipeline orchestration.
//!
//! One run walks the discovered candidates strictly in order: dedup check,
//! extraction, analysis, insert, then a pacing wait once an insert was
//! attempted. Per-candidate failures are recorded in the [`IngestReport`] and
//! never stop the run; only a discovery failure or an unusable store is fatal.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use cointrend_core::{
    normalize_coin, ArticleStore, Candidate, ContentExtractor, DiscoveryError, DiscoverySource,
    NewArticle, Sentiment, SentimentAnalyzer, StoreError,
};
use thiserror::Error;

/// Wait inserted after every insert attempt, whether it stored the article
/// or hit a duplicate.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {}
}

/// Observer notified as the run progresses, so callers can report each
/// candidate before the whole run finishes.
pub trait Progress: Send + Sync {
    fn discovered(&self, _coin: &str, _count: usize) {}
    fn outcome(&self, _entry: &CandidateReport) {}
}

/// Ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Store(StoreError),
}

/// What happened to a single candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    /// Already stored before this run looked at it.
    Skipped,
    ExtractionFailed { reason: String },
    AnalysisFailed { reason: String },
    /// Another writer stored the URL between the dedup check and the insert.
    Duplicate,
    Stored {
        id: i64,
        sentiment: Sentiment,
        score: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateReport {
    pub url: String,
    pub title: String,
    pub outcome: CandidateOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Normalised topic the run targeted.
    pub coin: String,
    /// Number of candidates the discovery source returned.
    pub discovered: usize,
    pub outcomes: Vec<CandidateReport>,
}

impl IngestReport {
    /// `true` when discovery returned nothing, as opposed to every candidate failing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.discovered == 0
    }

    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.count(|o| matches!(o, CandidateOutcome::Stored { .. }))
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, CandidateOutcome::Skipped))
    }

    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.count(|o| matches!(o, CandidateOutcome::Duplicate))
    }

    /// Extraction plus analysis failures.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                CandidateOutcome::ExtractionFailed { .. } | CandidateOutcome::AnalysisFailed { .. }
            )
        })
    }

    fn count(&self, pred: impl Fn(&CandidateOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Sequential search → dedup → extract → analyze → persist run.
///
/// Collaborators are borrowed trait objects so callers can mix real clients
/// with test doubles.
pub struct IngestPipeline<'a> {
    discovery: &'a dyn DiscoverySource,
    extractor: &'a dyn ContentExtractor,
    analyzer: &'a dyn SentimentAnalyzer,
    store: &'a dyn ArticleStore,
    pacer: &'a dyn Pacer,
}

impl<'a> IngestPipeline<'a> {
    #[must_use]
    pub fn new(
        discovery: &'a dyn DiscoverySource,
        extractor: &'a dyn ContentExtractor,
        analyzer: &'a dyn SentimentAnalyzer,
        store: &'a dyn ArticleStore,
        pacer: &'a dyn Pacer,
    ) -> Self {
        Self {
            discovery,
            extractor,
            analyzer,
            store,
            pacer,
        }
    }

    /// Ingest up to `count` fresh articles about `topic`.
    ///
    /// Discovery is queried on every run, even when earlier runs already
    /// stored everything it returns.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Discovery`] if the search call fails.
    /// - [`PipelineError::Store`] if the store cannot answer a dedup check or
    ///   is unavailable for an insert.
    pub async fn run(&self, topic: &str, count: usize) -> Result<IngestReport, PipelineError> {
        self.run_with_progress(topic, count, &NoProgress).await
    }

    /// Same as [`run`](Self::run), reporting each candidate to `progress` as
    /// soon as it is resolved.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn run_with_progress(
        &self,
        topic: &str,
        count: usize,
        progress: &dyn Progress,
    ) -> Result<IngestReport, PipelineError> {
        let coin = normalize_coin(topic);
        let candidates = self.discovery.search(&coin, count).await?;
        progress.discovered(&coin, candidates.len());

        let mut report = IngestReport {
            coin: coin.clone(),
            discovered: candidates.len(),
            outcomes: Vec::with_capacity(candidates.len()),
        };

        if candidates.is_empty() {
            tracing::info!(coin = %coin, "no candidates discovered");
            return Ok(report);
        }

        for candidate in candidates {
            let skipped = self
                .store
                .exists(&candidate.url)
                .await
                .map_err(PipelineError::Store)?;
            let entry = if skipped {
                tracing::info!(url = %candidate.url, "already stored, skipping");
                CandidateReport {
                    url: candidate.url,
                    title: candidate.title,
                    outcome: CandidateOutcome::Skipped,
                }
            } else {
                self.process(&coin, candidate).await?
            };

            progress.outcome(&entry);
            let insert_attempted = matches!(
                entry.outcome,
                CandidateOutcome::Stored { .. } | CandidateOutcome::Duplicate
            );
            report.outcomes.push(entry);
            if insert_attempted {
                self.pacer.pause().await;
            }
        }

        tracing::info!(
            coin = %coin,
            discovered = report.discovered,
            stored = report.stored_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            duplicates = report.duplicate_count(),
            "ingest run complete"
        );
        Ok(report)
    }

    /// Extract, analyze, and persist one candidate that is not yet stored.
    async fn process(
        &self,
        coin: &str,
        candidate: Candidate,
    ) -> Result<CandidateReport, PipelineError> {
        let Candidate {
            url,
            title,
            published_at,
        } = candidate;

        let article = match self.extractor.extract(&url).await {
            Ok(article) if article.content.trim().is_empty() => {
                tracing::warn!(url = %url, "extractor returned an empty body");
                return Ok(CandidateReport {
                    outcome: CandidateOutcome::ExtractionFailed {
                        reason: format!("no article content found at {url}"),
                    },
                    url,
                    title,
                });
            }
            Ok(article) => article,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "extraction failed");
                return Ok(CandidateReport {
                    url,
                    title,
                    outcome: CandidateOutcome::ExtractionFailed {
                        reason: e.to_string(),
                    },
                });
            }
        };

        let analysis = match self.analyzer.analyze(&article.content, coin).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "analysis failed");
                return Ok(CandidateReport {
                    url,
                    title: article.title,
                    outcome: CandidateOutcome::AnalysisFailed {
                        reason: e.to_string(),
                    },
                });
            }
        };

        let record = NewArticle {
            coin: coin.to_string(),
            url,
            title: article.title,
            publication_date: article.published_at.or(published_at),
            retrieval_date: Utc::now(),
            content: article.content,
            summary: analysis.summary,
            sentiment: analysis.sentiment,
            score: analysis.score,
        };
        if let Err(reason) = record.validate() {
            tracing::warn!(url = %record.url, %reason, "analysis produced an invalid record");
            return Ok(CandidateReport {
                url: record.url,
                title: record.title,
                outcome: CandidateOutcome::AnalysisFailed { reason },
            });
        }

        let outcome = match self.store.insert(&record).await {
            Ok(id) => {
                tracing::info!(
                    url = %record.url,
                    id,
                    sentiment = %analysis.sentiment,
                    score = analysis.score,
                    "article stored"
                );
                CandidateOutcome::Stored {
                    id,
                    sentiment: analysis.sentiment,
                    score: analysis.score,
                }
            }
            Err(StoreError::Duplicate { .. }) => {
                tracing::warn!(url = %record.url, "article stored concurrently by another run");
                CandidateOutcome::Duplicate
            }
            Err(StoreError::Invalid(reason)) => {
                tracing::warn!(url = %record.url, %reason, "store rejected article");
                CandidateOutcome::AnalysisFailed { reason }
            }
            Err(e) => return Err(PipelineError::Store(e)),
        };

        Ok(CandidateReport {
            url: record.url,
            title: record.title,
            outcome,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

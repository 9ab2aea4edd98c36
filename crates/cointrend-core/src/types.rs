use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest confidence score an analysis may carry.
pub const MIN_SCORE: f64 = 0.0;
/// Highest confidence score an analysis may carry.
pub const MAX_SCORE: f64 = 1.0;

/// Normalise a caller-supplied topic into the form stored in `coin`.
///
/// Trims surrounding whitespace and lowercases, so `" BTC "` and `"btc"`
/// address the same records.
#[must_use]
pub fn normalize_coin(coin: &str) -> String {
    coin.trim().to_lowercase()
}

/// Closed set of market-tone labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// All labels, in display order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Bullish, Sentiment::Bearish, Sentiment::Neutral];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Label with its first letter uppercased, e.g. `Bullish`.
    #[must_use]
    pub fn title_case(self) -> &'static str {
        match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Bearish => "Bearish",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid sentiment label: {0:?}")]
pub struct ParseSentimentError(pub String);

impl FromStr for Sentiment {
    type Err = ParseSentimentError;

    /// Accepts the three labels case-insensitively, ignoring surrounding
    /// whitespace. Anything else (`"very bullish"`, `""`) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bullish" => Ok(Sentiment::Bullish),
            "bearish" => Ok(Sentiment::Bearish),
            "neutral" => Ok(Sentiment::Neutral),
            _ => Err(ParseSentimentError(s.to_string())),
        }
    }
}

/// A ranked search hit that has not been fetched or analysed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    pub title: String,
    /// Provider-reported publication time, when it could be parsed.
    pub published_at: Option<DateTime<Utc>>,
}

/// Title and cleaned body text pulled from an article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: String,
    /// Never empty: extractors report empty bodies as an error instead.
    pub content: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Validated output of the sentiment analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub sentiment: Sentiment,
    /// Confidence in `[MIN_SCORE, MAX_SCORE]`.
    pub score: f64,
}

/// A fully derived article ready to be inserted into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub coin: String,
    pub url: String,
    pub title: String,
    pub publication_date: Option<DateTime<Utc>>,
    pub retrieval_date: DateTime<Utc>,
    pub content: String,
    pub summary: String,
    pub sentiment: Sentiment,
    pub score: f64,
}

impl NewArticle {
    /// Check the invariants every stored record must satisfy.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when `content` is empty, `url` is
    /// empty, or `score` falls outside `[MIN_SCORE, MAX_SCORE]`.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("url is empty".to_string());
        }
        if self.content.trim().is_empty() {
            return Err(format!("content is empty for {}", self.url));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Err(format!(
                "score {} out of range for {}",
                self.score, self.url
            ));
        }
        Ok(())
    }
}

/// A persisted article as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub coin: String,
    pub url: String,
    pub title: String,
    pub publication_date: Option<DateTime<Utc>>,
    pub retrieval_date: DateTime<Utc>,
    pub content: String,
    pub summary: String,
    pub sentiment: Sentiment,
    pub score: f64,
}

/// Per-label article counts for one coin.
///
/// Only labels with at least one article are present. Entries are ordered by
/// descending count; equal counts fall back to bullish, bearish, neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    counts: Vec<(Sentiment, u64)>,
}

impl SentimentDistribution {
    #[must_use]
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (Sentiment, u64)>,
    {
        let mut merged: Vec<(Sentiment, u64)> = Vec::new();
        for (label, n) in counts {
            if n == 0 {
                continue;
            }
            match merged.iter_mut().find(|(l, _)| *l == label) {
                Some((_, existing)) => *existing += n,
                None => merged.push((label, n)),
            }
        }
        merged.sort_by(|(la, ca), (lb, cb)| cb.cmp(ca).then(la.cmp(lb)));
        Self { counts: merged }
    }

    #[must_use]
    pub fn count(&self, label: Sentiment) -> u64 {
        self.counts
            .iter()
            .find(|(l, _)| *l == label)
            .map_or(0, |(_, n)| *n)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sentiment, u64)> + '_ {
        self.counts.iter().copied()
    }
}

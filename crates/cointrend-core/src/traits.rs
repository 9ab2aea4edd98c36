//! Collaborator seams for the ingestion pipeline.
//!
//! Each trait is object-safe so the CLI can hold `Box<dyn ...>` and tests can
//! swap in doubles without touching the pipeline.

use async_trait::async_trait;

use crate::error::{AnalysisError, DiscoveryError, ExtractionError, StoreError};
use crate::types::{
    Analysis, ArticleRecord, Candidate, ExtractedArticle, NewArticle, SentimentDistribution,
};

#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Return at most `limit` candidates for `topic`, best first.
    async fn search(&self, topic: &str, limit: usize) -> Result<Vec<Candidate>, DiscoveryError>;
}

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch `url` and derive its title and non-empty body text.
    async fn extract(&self, url: &str) -> Result<ExtractedArticle, ExtractionError>;
}

#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    /// Summarise `content` and classify its tone toward `topic`.
    async fn analyze(&self, content: &str, topic: &str) -> Result<Analysis, AnalysisError>;
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn exists(&self, url: &str) -> Result<bool, StoreError>;

    /// Insert a new record and return its id.
    ///
    /// A URL that is already stored yields [`StoreError::Duplicate`].
    async fn insert(&self, article: &NewArticle) -> Result<i64, StoreError>;

    /// Most recent records for `coin` by `retrieval_date`, at most `limit`.
    async fn query(&self, coin: &str, limit: usize) -> Result<Vec<ArticleRecord>, StoreError>;

    async fn aggregate(&self, coin: &str) -> Result<SentimentDistribution, StoreError>;
}

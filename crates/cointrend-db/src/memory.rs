//! In-process [`ArticleStore`] with the same invariants as the Postgres table.

use std::sync::Arc;

use async_trait::async_trait;
use cointrend_core::{
    normalize_coin, ArticleRecord, ArticleStore, NewArticle, SentimentDistribution, StoreError,
};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<ArticleRecord>,
    next_id: i64,
}

/// Cloning shares the underlying records.
#[derive(Debug, Clone, Default)]
pub struct MemoryArticleStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryArticleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all coins.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of every stored record in insertion order.
    pub async fn records(&self) -> Vec<ArticleRecord> {
        self.state.read().await.records.clone()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn exists(&self, url: &str) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        Ok(state.records.iter().any(|r| r.url == url))
    }

    async fn insert(&self, article: &NewArticle) -> Result<i64, StoreError> {
        article.validate().map_err(StoreError::Invalid)?;

        // Check and push under one write lock so the unique-url check is atomic.
        let mut state = self.state.write().await;
        if state.records.iter().any(|r| r.url == article.url) {
            return Err(StoreError::Duplicate {
                url: article.url.clone(),
            });
        }

        state.next_id += 1;
        let id = state.next_id;
        state.records.push(ArticleRecord {
            id,
            coin: normalize_coin(&article.coin),
            url: article.url.clone(),
            title: article.title.clone(),
            publication_date: article.publication_date,
            retrieval_date: article.retrieval_date,
            content: article.content.clone(),
            summary: article.summary.clone(),
            sentiment: article.sentiment,
            score: article.score,
        });
        Ok(id)
    }

    async fn query(&self, coin: &str, limit: usize) -> Result<Vec<ArticleRecord>, StoreError> {
        let coin = normalize_coin(coin);
        let state = self.state.read().await;
        let mut matching: Vec<ArticleRecord> = state
            .records
            .iter()
            .filter(|r| r.coin == coin)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.retrieval_date
                .cmp(&a.retrieval_date)
                .then(b.id.cmp(&a.id))
        });
        matching.truncate(limit);
        Ok(matching)
    }

    async fn aggregate(&self, coin: &str) -> Result<SentimentDistribution, StoreError> {
        let coin = normalize_coin(coin);
        let state = self.state.read().await;
        Ok(SentimentDistribution::from_counts(
            state
                .records
                .iter()
                .filter(|r| r.coin == coin)
                .map(|r| (r.sentiment, 1)),
        ))
    }
}

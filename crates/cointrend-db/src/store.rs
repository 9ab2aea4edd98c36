//! Postgres-backed [`ArticleStore`].

use async_trait::async_trait;
use cointrend_core::{
    ArticleRecord, ArticleStore, NewArticle, Sentiment, SentimentDistribution, StoreError,
};
use sqlx::PgPool;

use crate::articles::{
    article_exists, insert_article, list_articles_by_coin, sentiment_counts_by_coin,
};
use crate::DbError;

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate { url } => StoreError::Duplicate { url },
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn exists(&self, url: &str) -> Result<bool, StoreError> {
        Ok(article_exists(&self.pool, url).await?)
    }

    async fn insert(&self, article: &NewArticle) -> Result<i64, StoreError> {
        article.validate().map_err(StoreError::Invalid)?;
        Ok(insert_article(&self.pool, article).await?)
    }

    async fn query(&self, coin: &str, limit: usize) -> Result<Vec<ArticleRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = list_articles_by_coin(&self.pool, coin, limit).await?;
        let records = rows
            .into_iter()
            .map(ArticleRecord::try_from)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(records)
    }

    async fn aggregate(&self, coin: &str) -> Result<SentimentDistribution, StoreError> {
        let rows = sentiment_counts_by_coin(&self.pool, coin).await?;
        let mut counts = Vec::with_capacity(rows.len());
        for (label, count) in rows {
            let sentiment = label.parse::<Sentiment>().map_err(|e| {
                StoreError::Unavailable(DbError::InvalidRow(e.to_string()).to_string())
            })?;
            counts.push((sentiment, u64::try_from(count).unwrap_or(0)));
        }
        Ok(SentimentDistribution::from_counts(counts))
    }
}

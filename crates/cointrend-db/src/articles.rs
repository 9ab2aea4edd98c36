//! Database operations for the `articles` table.

use chrono::{DateTime, Utc};
use cointrend_core::{normalize_coin, ArticleRecord, NewArticle, Sentiment};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `articles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub coin: String,
    pub url: String,
    pub title: String,
    pub publication_date: Option<DateTime<Utc>>,
    pub retrieval_date: DateTime<Utc>,
    pub content: String,
    pub summary: String,
    pub sentiment: String,
    pub score: f64,
}

impl TryFrom<ArticleRow> for ArticleRecord {
    type Error = DbError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let sentiment = row
            .sentiment
            .parse::<Sentiment>()
            .map_err(|e| DbError::InvalidRow(format!("article {}: {e}", row.id)))?;

        Ok(ArticleRecord {
            id: row.id,
            coin: row.coin,
            url: row.url,
            title: row.title,
            publication_date: row.publication_date,
            retrieval_date: row.retrieval_date,
            content: row.content,
            summary: row.summary,
            sentiment,
            score: row.score,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Return `true` if an article with this URL is already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn article_exists(pool: &PgPool, url: &str) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles WHERE url = $1)")
        .bind(url)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// Insert a new article and return its generated id.
///
/// Uses `ON CONFLICT (url) DO NOTHING` so two runs racing on the same URL
/// cannot both succeed; the loser gets [`DbError::Duplicate`]. `coin` is
/// lowercased before it is written.
///
/// # Errors
///
/// Returns [`DbError::Duplicate`] if the URL is already stored, or
/// [`DbError::Sqlx`] if the insert fails (including CHECK violations).
pub async fn insert_article(pool: &PgPool, article: &NewArticle) -> Result<i64, DbError> {
    let id: Option<i64> = sqlx::query_scalar(
        "INSERT INTO articles \
             (coin, url, title, publication_date, retrieval_date, content, summary, sentiment, score) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (url) DO NOTHING \
         RETURNING id",
    )
    .bind(normalize_coin(&article.coin))
    .bind(&article.url)
    .bind(&article.title)
    .bind(article.publication_date)
    .bind(article.retrieval_date)
    .bind(&article.content)
    .bind(&article.summary)
    .bind(article.sentiment.as_str())
    .bind(article.score)
    .fetch_optional(pool)
    .await?;

    id.ok_or_else(|| {
        tracing::debug!(url = %article.url, "insert skipped: url already stored");
        DbError::Duplicate {
            url: article.url.clone(),
        }
    })
}

/// List the most recent articles for a coin.
///
/// Results are ordered by `retrieval_date DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_articles_by_coin(
    pool: &PgPool,
    coin: &str,
    limit: i64,
) -> Result<Vec<ArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, ArticleRow>(
        "SELECT id, coin, url, title, publication_date, retrieval_date, \
                content, summary, sentiment, score \
         FROM articles \
         WHERE coin = $1 \
         ORDER BY retrieval_date DESC, id DESC \
         LIMIT $2",
    )
    .bind(normalize_coin(coin))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count stored articles per sentiment label for a coin.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sentiment_counts_by_coin(
    pool: &PgPool,
    coin: &str,
) -> Result<Vec<(String, i64)>, DbError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT sentiment, COUNT(*) AS count \
         FROM articles \
         WHERE coin = $1 \
         GROUP BY sentiment \
         ORDER BY count DESC",
    )
    .bind(normalize_coin(coin))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

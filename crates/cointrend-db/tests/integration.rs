//! Offline unit tests for cointrend-db pool configuration and row conversion.
//! These tests do not require a live database connection.

use chrono::Utc;
use cointrend_core::{AppConfig, ArticleRecord, Sentiment};
use cointrend_db::{ArticleRow, DbError, PoolConfig};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        log_level: "info".to_string(),
        brave_api_key: None,
        anthropic_api_key: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        search_timeout_secs: 15,
        fetch_timeout_secs: 10,
        fetch_user_agent: "ua".to_string(),
        pacing_delay_ms: 1000,
        anthropic_model: "model".to_string(),
        anthropic_max_tokens: 1000,
        analyzer_timeout_secs: 60,
    }
}

fn row(sentiment: &str) -> ArticleRow {
    ArticleRow {
        id: 1,
        coin: "btc".to_string(),
        url: "https://news.example/1".to_string(),
        title: "Bitcoin climbs".to_string(),
        publication_date: None,
        retrieval_date: Utc::now(),
        content: "Bitcoin climbed past its previous high on strong inflows.".to_string(),
        summary: "Bitcoin is up.".to_string(),
        sentiment: sentiment.to_string(),
        score: 0.8,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn article_row_converts_to_record() {
    let record = ArticleRecord::try_from(row("bullish")).expect("valid row");
    assert_eq!(record.sentiment, Sentiment::Bullish);
    assert_eq!(record.coin, "btc");
    assert!((record.score - 0.8).abs() < f64::EPSILON);
}

#[test]
fn article_row_with_unknown_label_is_invalid() {
    let result = ArticleRecord::try_from(row("sideways"));
    assert!(
        matches!(result, Err(DbError::InvalidRow(_))),
        "expected InvalidRow, got {result:?}"
    );
}

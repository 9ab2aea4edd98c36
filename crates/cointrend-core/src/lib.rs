//! Shared domain types, collaborator traits, and configuration for cointrend.
//!
//! Every other crate in the workspace depends on this one. The traits in
//! [`traits`] are the seams the ingestion pipeline is built against; the
//! HTTP clients and stores in the sibling crates implement them.

pub mod app_config;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use app_config::{ApiCredentials, AppConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{AnalysisError, ConfigError, DiscoveryError, ExtractionError, StoreError};
pub use traits::{ArticleStore, ContentExtractor, DiscoverySource, SentimentAnalyzer};
pub use types::{
    normalize_coin, Analysis, ArticleRecord, Candidate, ExtractedArticle, NewArticle,
    ParseSentimentError, Sentiment, SentimentDistribution, MAX_SCORE, MIN_SCORE,
};

use std::time::Duration;

use async_trait::async_trait;
use cointrend_core::{ContentExtractor, ExtractedArticle, ExtractionError};
use reqwest::Client;

use crate::extract::extract_from_html;

/// Browser-like identification sent with every article fetch.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fetches article pages and hands the markup to [`extract_from_html`].
///
/// One GET per call, bounded by the configured timeout. Any network failure,
/// non-2xx status, or empty extraction becomes an [`ExtractionError`].
pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    /// # Errors
    ///
    /// Returns [`ExtractionError::Request`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()
            .map_err(|e| ExtractionError::Request {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &str) -> Result<String, ExtractionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| map_reqwest_error(url, &e))
    }
}

fn map_reqwest_error(url: &str, err: &reqwest::Error) -> ExtractionError {
    if err.is_timeout() {
        ExtractionError::Timeout {
            url: url.to_string(),
        }
    } else {
        ExtractionError::Request {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl ContentExtractor for ArticleFetcher {
    async fn extract(&self, url: &str) -> Result<ExtractedArticle, ExtractionError> {
        let html = self.fetch_html(url).await?;
        let article = extract_from_html(&html).ok_or_else(|| ExtractionError::NoContent {
            url: url.to_string(),
        })?;

        tracing::debug!(
            url,
            title = %article.title,
            chars = article.content.chars().count(),
            "extracted article"
        );
        Ok(article)
    }
}

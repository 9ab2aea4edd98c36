//! HTTP client for the Brave web search API.
//!
//! Wraps `reqwest` with the subscription-token header, query construction,
//! and typed decoding. Any non-2xx status is surfaced as
//! [`DiscoveryError::Status`]; there is no retry at this layer.

use std::time::Duration;

use async_trait::async_trait;
use cointrend_core::{Candidate, DiscoveryError, DiscoverySource};
use reqwest::{Client, Url};

use crate::types::BraveSearchResponse;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/";
const SEARCH_PATH: &str = "res/v1/web/search";

/// Largest `count` the web search endpoint accepts.
pub const MAX_COUNT: usize = 20;

/// Longest slice of an error body kept in [`DiscoveryError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Client for the Brave web search endpoint.
///
/// Use [`BraveSearchClient::new`] for production or
/// [`BraveSearchClient::with_base_url`] to point at a mock server in tests.
pub struct BraveSearchClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl BraveSearchClient {
    /// Creates a client pointed at the production Brave API.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Request`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, DiscoveryError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Request`] if the `reqwest::Client` cannot be
    /// constructed or `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DiscoveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("cointrend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DiscoveryError::Request(e.to_string()))?;

        // Exactly one trailing slash so `join` appends the search path instead
        // of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            DiscoveryError::Request(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Search for recent news about `coin`.
    ///
    /// Sends `"{coin} cryptocurrency news"` restricted to English results from
    /// the past day. `count` is clamped to [`MAX_COUNT`], and anything the
    /// provider returns beyond `count` is dropped.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::Request`] on network failure or timeout.
    /// - [`DiscoveryError::Status`] on any non-2xx status, carrying the body.
    /// - [`DiscoveryError::Decode`] if the body is not the expected JSON.
    pub async fn search_news(
        &self,
        coin: &str,
        count: usize,
    ) -> Result<Vec<Candidate>, DiscoveryError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let requested = count.min(MAX_COUNT);
        if requested < count {
            tracing::warn!(count, max = MAX_COUNT, "search count clamped to provider maximum");
        }

        let url = self.build_url(coin, requested)?;
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await
            .map_err(|e| DiscoveryError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DiscoveryError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(DiscoveryError::Status {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: BraveSearchResponse =
            serde_json::from_str(&body).map_err(|e| DiscoveryError::Decode(e.to_string()))?;

        let mut candidates = parsed.into_candidates();
        candidates.truncate(requested);

        tracing::debug!(coin, count = candidates.len(), "search returned candidates");
        Ok(candidates)
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, coin: &str, count: usize) -> Result<Url, DiscoveryError> {
        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|e| DiscoveryError::Request(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &format!("{coin} cryptocurrency news"));
            pairs.append_pair("count", &count.to_string());
            pairs.append_pair("search_lang", "en");
            pairs.append_pair("freshness", "pd");
        }
        Ok(url)
    }
}

#[async_trait]
impl DiscoverySource for BraveSearchClient {
    async fn search(&self, topic: &str, limit: usize) -> Result<Vec<Candidate>, DiscoveryError> {
        self.search_news(topic, limit).await
    }
}

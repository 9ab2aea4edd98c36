//! Anthropic Messages API client that summarises and classifies an article.

use std::time::Duration;

use async_trait::async_trait;
use cointrend_core::{Analysis, AnalysisError, SentimentAnalyzer};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::parse::parse_analysis;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/";
const MESSAGES_PATH: &str = "v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_ERROR_BODY_CHARS: usize = 500;

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

const SYSTEM_PROMPT: &str = "You are a cryptocurrency market analyst. \
     You write concise, factual article summaries and classify market sentiment.";

fn build_prompt(content: &str, topic: &str) -> String {
    format!(
        "Read the following news article about {topic} and respond with:\n\
         1. A 3-4 sentence summary focused on market sentiment, price predictions, \
         and notable events.\n\
         2. The overall sentiment toward {topic}: exactly one of bullish, bearish, or neutral.\n\
         3. A confidence score between 0.0 and 1.0 for that sentiment.\n\n\
         Respond with a single JSON object and nothing else, using this shape:\n\
         {{\"summary\": \"...\", \"sentiment\": \"bullish|bearish|neutral\", \"score\": 0.0}}\n\n\
         Article:\n{content}"
    )
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<RequestMessage>,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text of all `text` blocks.
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}

/// [`SentimentAnalyzer`] backed by the Anthropic Messages API.
///
/// Requests run at temperature 0. The reply is handed to [`parse_analysis`];
/// a reply that does not validate is an error, never a guessed result.
pub struct AnthropicAnalyzer {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: Url,
}

impl std::fmt::Debug for AnthropicAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicAnalyzer")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl AnthropicAnalyzer {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Request`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        model: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, AnalysisError> {
        Self::with_base_url(api_key, model, max_tokens, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Same as [`AnthropicAnalyzer::new`] but against `base_url` (wiremock in tests).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Request`] if the HTTP client cannot be built
    /// or `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        max_tokens: u32,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| AnalysisError::Request(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            max_tokens,
            base_url,
        })
    }

    /// Send one Messages request and return the concatenated reply text.
    async fn complete(&self, prompt: String) -> Result<String, AnalysisError> {
        let url = self
            .base_url
            .join(MESSAGES_PATH)
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: 0.0,
            system: SYSTEM_PROMPT,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                message: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(map_reqwest_error)?;
        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(text)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> AnalysisError {
    if err.is_timeout() {
        AnalysisError::Timeout
    } else {
        AnalysisError::Request(err.to_string())
    }
}

#[async_trait]
impl SentimentAnalyzer for AnthropicAnalyzer {
    async fn analyze(&self, content: &str, topic: &str) -> Result<Analysis, AnalysisError> {
        let raw = self.complete(build_prompt(content, topic)).await?;

        let analysis = parse_analysis(&raw).inspect_err(|e| {
            tracing::debug!(error = %e, response = %raw, "model response rejected");
        })?;

        tracing::debug!(
            topic,
            sentiment = %analysis.sentiment,
            score = analysis.score,
            "article analysed"
        );
        Ok(analysis)
    }
}

use thiserror::Error;

/// The search provider could not produce a candidate list.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Network or TLS failure before a response arrived.
    #[error("search request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("search provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The body could not be decoded into search results.
    #[error("search response could not be decoded: {0}")]
    Decode(String),
}

/// An article page could not be turned into title + body text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("error fetching {url}: {reason}")]
    Request { url: String, reason: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("no content extracted from {url}")]
    NoContent { url: String },
}

/// The language model call failed or its output was unusable.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analyzer request failed: {0}")]
    Request(String),

    #[error("analyzer request timed out")]
    Timeout,

    #[error("analyzer returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("analyzer returned no text content")]
    EmptyResponse,

    /// Neither a JSON span nor the whole response decoded.
    #[error("could not parse response")]
    Unparseable,

    /// A payload decoded but failed validation.
    #[error("invalid analysis payload: {0}")]
    Invalid(String),
}

/// Result store failures.
///
/// [`StoreError::Duplicate`] is expected and benign: it means another insert
/// already claimed the URL. [`StoreError::Invalid`] rejects one record only.
/// [`StoreError::Unavailable`] means the store itself is unusable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("article already stored: {url}")]
    Duplicate { url: String },

    #[error("article rejected by store: {0}")]
    Invalid(String),

    #[error("result store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

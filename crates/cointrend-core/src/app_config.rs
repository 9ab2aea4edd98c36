use crate::ConfigError;

pub const BRAVE_API_KEY_VAR: &str = "BRAVE_API_KEY";
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub brave_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub pacing_delay_ms: u64,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub analyzer_timeout_secs: u64,
}

impl AppConfig {
    /// Return both external API credentials, or fail on the first missing one.
    ///
    /// Ingestion calls this before constructing any client so a missing key is
    /// reported at startup rather than as a per-article failure.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming `BRAVE_API_KEY` or
    /// `ANTHROPIC_API_KEY` when either is unset or blank.
    pub fn require_credentials(&self) -> Result<ApiCredentials, ConfigError> {
        let brave_api_key = non_blank(self.brave_api_key.as_deref())
            .ok_or_else(|| ConfigError::MissingEnvVar(BRAVE_API_KEY_VAR.to_string()))?;
        let anthropic_api_key = non_blank(self.anthropic_api_key.as_deref())
            .ok_or_else(|| ConfigError::MissingEnvVar(ANTHROPIC_API_KEY_VAR.to_string()))?;

        Ok(ApiCredentials {
            brave_api_key: brave_api_key.to_string(),
            anthropic_api_key: anthropic_api_key.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field(
                "brave_api_key",
                &self.brave_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("pacing_delay_ms", &self.pacing_delay_ms)
            .field("anthropic_model", &self.anthropic_model)
            .field("anthropic_max_tokens", &self.anthropic_max_tokens)
            .field("analyzer_timeout_secs", &self.analyzer_timeout_secs)
            .finish()
    }
}

/// The two external credentials ingestion needs.
#[derive(Clone)]
pub struct ApiCredentials {
    pub brave_api_key: String,
    pub anthropic_api_key: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("brave_api_key", &"[redacted]")
            .field("anthropic_api_key", &"[redacted]")
            .finish()
    }
}

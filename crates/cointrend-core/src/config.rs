use crate::app_config::{AppConfig, ANTHROPIC_API_KEY_VAR, BRAVE_API_KEY_VAR};
use crate::ConfigError;

const DEFAULT_FETCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_timeout = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let secs = parse_u64(var, default)?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(secs)
    };

    let database_url = require("DATABASE_URL")?;
    let log_level = or_default("COINTREND_LOG_LEVEL", "info");

    let brave_api_key = lookup(BRAVE_API_KEY_VAR).ok();
    let anthropic_api_key = lookup(ANTHROPIC_API_KEY_VAR).ok();

    let db_max_connections = parse_u32("COINTREND_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("COINTREND_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("COINTREND_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let search_timeout_secs = parse_timeout("COINTREND_SEARCH_TIMEOUT_SECS", "15")?;
    let fetch_timeout_secs = parse_timeout("COINTREND_FETCH_TIMEOUT_SECS", "10")?;
    let fetch_user_agent = or_default("COINTREND_FETCH_USER_AGENT", DEFAULT_FETCH_USER_AGENT);
    let pacing_delay_ms = parse_u64("COINTREND_PACING_DELAY_MS", "1000")?;

    let anthropic_model = or_default("COINTREND_ANTHROPIC_MODEL", DEFAULT_ANTHROPIC_MODEL);
    let anthropic_max_tokens = parse_u32("COINTREND_ANTHROPIC_MAX_TOKENS", "1000")?;
    let analyzer_timeout_secs = parse_u64("COINTREND_ANALYZER_TIMEOUT_SECS", "60")?;

    Ok(AppConfig {
        database_url,
        log_level,
        brave_api_key,
        anthropic_api_key,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        search_timeout_secs,
        fetch_timeout_secs,
        fetch_user_agent,
        pacing_delay_ms,
        anthropic_model,
        anthropic_max_tokens,
        analyzer_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Startup aborts if the completion service credentials are missing or invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: Url,
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    pub llm_retry_backoff: Duration,
    pub cover_letter_path: Option<PathBuf>,
    pub resume_path: Option<PathBuf>,
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = require(&lookup, "OPENAI_API_KEY")?;

        let raw_base_url = lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let openai_base_url = Url::parse(raw_base_url.trim())
            .with_context(|| format!("OPENAI_BASE_URL '{raw_base_url}' is not a valid URL"))?;
        if !matches!(openai_base_url.scheme(), "http" | "https") {
            bail!("OPENAI_BASE_URL must use http or https");
        }

        let timeout_secs: u64 = parse_or(&lookup, "LLM_TIMEOUT_SECS", 60)?;
        if timeout_secs == 0 {
            bail!("LLM_TIMEOUT_SECS must be greater than zero");
        }

        let ttl_minutes: u64 = parse_or(&lookup, "SESSION_TTL_MINUTES", 120)?;
        let Some(ttl_secs) = ttl_minutes.checked_mul(60) else {
            bail!("SESSION_TTL_MINUTES is too large");
        };

        Ok(Config {
            openai_api_key,
            openai_base_url,
            llm_timeout: Duration::from_secs(timeout_secs),
            llm_max_retries: parse_or(&lookup, "LLM_MAX_RETRIES", 2)?,
            llm_retry_backoff: Duration::from_millis(parse_or(&lookup, "LLM_RETRY_BACKOFF_MS", 1000)?),
            cover_letter_path: optional_path(&lookup, "COVER_LETTER_PATH"),
            resume_path: optional_path(&lookup, "RESUME_PATH"),
            session_ttl: Duration::from_secs(ttl_secs),
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Some(_) => bail!("Required environment variable '{key}' is empty"),
        None => bail!("Required environment variable '{key}' is not set"),
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn optional_path<F>(lookup: &F, key: &str) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map(|v| PathBuf::from(v.trim()))
}

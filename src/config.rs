use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown log format `{other}` (expected `text` or `json`)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_port: u16,
    pub bybit_base_url: String,
    pub upstream_timeout_secs: u64,
    /// Skips TLS certificate validation toward Bybit. Only for interception proxies.
    pub accept_invalid_certs: bool,
    pub max_catalog_pages: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_port: 3000,
            bybit_base_url: "https://api.bybit.com".to_string(),
            upstream_timeout_secs: 10,
            accept_invalid_certs: false,
            max_catalog_pages: 100,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let bybit_base_url = env::var("BYBIT_API_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.bybit_base_url);

        Ok(Self {
            api_port: env_or("API_PORT", defaults.api_port)?,
            bybit_base_url,
            upstream_timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout_secs)?,
            accept_invalid_certs: env_flag("UPSTREAM_ACCEPT_INVALID_CERTS")?,
            max_catalog_pages: env_or("MAX_CATALOG_PAGES", defaults.max_catalog_pages)?,
            log_format: env_or("LOG_FORMAT", defaults.log_format)?,
        })
    }
}

/// Reads and parses `key`, falling back to `default` when it is unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value: `{raw}`")),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str) -> Result<bool> {
    match env::var(key) {
        Ok(raw) => parse_flag(&raw).with_context(|| format!("{key} must be true or false")),
        Err(_) => Ok(false),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("not a boolean: `{other}`"),
    }
}

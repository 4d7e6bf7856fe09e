use std::time::Duration;

use anyhow::{Context, Result};
use storage::services::aggregation::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub trending_interval: Duration,
    pub retry_policy: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = RetryPolicy::default();

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            trending_interval: Duration::from_secs(optional_number(
                "TRENDING_INTERVAL_SECS",
                3600,
            )?),
            retry_policy: RetryPolicy {
                attempt_timeout: Duration::from_millis(optional_number(
                    "RECOMPUTE_TIMEOUT_MS",
                    defaults.attempt_timeout.as_millis() as u64,
                )?),
                max_retries: optional_number("RECOMPUTE_MAX_RETRIES", defaults.max_retries)?,
                base_delay: Duration::from_millis(optional_number(
                    "RECOMPUTE_RETRY_BASE_MS",
                    defaults.base_delay.as_millis() as u64,
                )?),
            },
        })
    }
}

fn optional_number<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number")),
        Err(_) => Ok(default),
    }
}

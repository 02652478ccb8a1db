use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    pub timeout_ms: u64,
    /// Answer `[]` instead of an error when the model cannot produce a forecast.
    pub empty_on_unavailable: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub host: String,
    pub port: u16,
    pub forecast: ForecastConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://fitness_tracker.db".into());
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));
        let forecast = ForecastConfig {
            timeout_ms: parse_var("FORECAST_TIMEOUT_MS", 5_000)?,
            empty_on_unavailable: parse_var("FORECAST_EMPTY_ON_UNAVAILABLE", false)?,
        };
        Ok(Self {
            database_url,
            upload_dir,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 16 * 1024 * 1024)?,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("APP_PORT", 5000)?,
            forecast,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {v:?}")),
        Err(_) => Ok(default),
    }
}

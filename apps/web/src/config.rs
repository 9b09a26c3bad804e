use std::time::Duration;

use anyhow::{Context, Result};

use crate::api_client::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
/// Every setting has a default, so an empty environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub state_path: String,
    pub api_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: std::env::var("COMPASS_API_URL")
                .unwrap_or_else(|_| build_time_api_url().to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            state_path: std::env::var("COMPASS_STATE_PATH")
                .unwrap_or_else(|_| "compass_state.json".to_string()),
            api_timeout: parse_timeout(std::env::var("COMPASS_API_TIMEOUT_SECS").ok())?,
        })
    }
}

/// Upstream URL baked in at compile time, if any.
fn build_time_api_url() -> &'static str {
    option_env!("COMPASS_API_URL").unwrap_or(DEFAULT_API_URL)
}

fn parse_timeout(raw: Option<String>) -> Result<Option<Duration>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(secs) => {
            let secs = secs
                .parse::<u64>()
                .context("COMPASS_API_TIMEOUT_SECS must be a whole number of seconds")?;
            Ok((secs > 0).then(|| Duration::from_secs(secs)))
        }
    }
}

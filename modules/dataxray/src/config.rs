use std::env;
use std::time::Duration;

use ai_client::gemini::GEMINI_API_URL;
use ai_client::Gemini;
use anyhow::{anyhow, Context, Result};
use tracing::info;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key: &str| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("GEMINI_API_KEY environment variable is required"))?;

        let request_timeout = match lookup("DATAXRAY_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .context("DATAXRAY_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key,
            model: lookup("DATAXRAY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_API_URL.to_string()),
            request_timeout,
        })
    }

    pub fn gemini(&self) -> Gemini {
        Gemini::new(&self.api_key, &self.model)
            .with_base_url(&self.base_url)
            .with_timeout(self.request_timeout)
    }

    pub fn log_redacted(&self) {
        info!(
            model = self.model.as_str(),
            base_url = self.base_url.as_str(),
            timeout_secs = self.request_timeout.as_secs(),
            api_key = redact(&self.api_key).as_str(),
            "Configuration loaded"
        );
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}***")
}

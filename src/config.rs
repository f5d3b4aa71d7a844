//! TOML configuration parsing.
//!
//! ```toml
//! [api]
//! url = "http://localhost:8000"
//! timeout_secs = 30
//! page_size = 100
//!
//! [display]
//! timestamp_format = "%B %-d, %Y, %H:%M"
//! utc = false
//! ```
//!
//! Every key is optional. The `API_URL` environment variable, when set,
//! overrides `api.url`.

use anyhow::{bail, Context, Result};
use archscope_core::format::{DisplayZone, TimestampFormat, DEFAULT_TIMESTAMP_PATTERN};
use serde::Deserialize;
use std::path::Path;

/// Environment variable overriding `api.url`.
pub const API_URL_ENV: &str = "API_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_page_size() -> u32 {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Render timestamps in UTC instead of local time.
    #[serde(default)]
    pub utc: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            utc: false,
        }
    }
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_PATTERN.to_string()
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// The timestamp format for cards and detail views.
    pub fn timestamp_format(&self) -> Result<TimestampFormat> {
        let zone = if self.display.utc {
            DisplayZone::Utc
        } else {
            DisplayZone::Local
        };
        TimestampFormat::new(self.display.timestamp_format.clone(), zone)
    }

    /// Replace `api.url` with `override_url` when it is set and non-empty.
    pub fn apply_api_url_override(&mut self, override_url: Option<String>) {
        if let Some(url) = override_url.filter(|u| !u.trim().is_empty()) {
            self.api.url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api.url)
            .with_context(|| format!("api.url is not a valid URL: '{}'", self.api.url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api.url must use http or https, got '{}'", url.scheme());
        }

        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be > 0");
        }

        if self.api.page_size == 0 {
            bail!("api.page_size must be >= 1");
        }

        self.timestamp_format()
            .with_context(|| "display.timestamp_format is invalid")?;

        Ok(())
    }
}

/// Parse and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
    config.validate()?;

    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!("no config at {}, using defaults", path.display());
    let mut config = Config::minimal();
    config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
    config.validate()?;
    Ok(config)
}

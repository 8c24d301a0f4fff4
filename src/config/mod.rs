//! Configuration management for Donor Core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// MySQL adapters; `None` when the embedder brings its own stores
    pub database: Option<DatabaseConfig>,
    pub telemetry: TelemetryConfig,
    pub avatar: AvatarConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "pretty" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            metrics_enabled: false,
        }
    }
}

/// Settings for the default gravatar renderer
#[derive(Debug, Clone)]
pub struct AvatarConfig {
    pub base_url: String,
    /// Image served when the email has no gravatar (e.g. "mp", "identicon")
    pub default_image: String,
    pub default_size: u32,
    pub rating: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.gravatar.com/avatar".to_string(),
            default_image: "mp".to_string(),
            default_size: 100,
            rating: "g".to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and then read the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = AvatarConfig::default();

        Ok(Self {
            database: match env::var("DATABASE_URL") {
                Ok(url) if !url.trim().is_empty() => Some(DatabaseConfig {
                    url,
                    max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                        .unwrap_or_else(|_| "10".to_string())
                        .parse()
                        .context("Invalid DATABASE_MAX_CONNECTIONS")?,
                    min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                        .unwrap_or_else(|_| "2".to_string())
                        .parse()
                        .context("Invalid DATABASE_MIN_CONNECTIONS")?,
                }),
                _ => None,
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
            },
            avatar: AvatarConfig {
                base_url: env::var("AVATAR_BASE_URL").unwrap_or(defaults.base_url),
                default_image: env::var("AVATAR_DEFAULT_IMAGE").unwrap_or(defaults.default_image),
                default_size: env::var("AVATAR_DEFAULT_SIZE")
                    .map(|s| s.parse::<u32>().context("Invalid AVATAR_DEFAULT_SIZE"))
                    .unwrap_or(Ok(defaults.default_size))?,
                rating: env::var("AVATAR_RATING").unwrap_or(defaults.rating),
            },
        })
    }
}

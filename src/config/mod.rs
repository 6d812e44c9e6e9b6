//! Configuration loading and validation for the order-system client.
//!
//! Uses serde_yaml to load YAML configuration files with support for
//! environment variable overrides for the stored access token.

mod api;
mod app;
mod duration;
mod error;

pub use api::ApiConfig;
pub use app::AppConfig;
pub use error::ConfigError;

use serde::Deserialize;
use std::{env, fs, time::Duration};

/// Default per-request timeout when the config omits one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Root configuration structure.
///
/// Required sections: app, api.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Backend API endpoint settings.
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// First loads environment variables from `.env` (if present), then the
    /// YAML config, then the stored access token from `ACCESS_TOKEN`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.load_credentials_from_env();
        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Load the stored access token from the environment.
    fn load_credentials_from_env(&mut self) {
        self.api.access_token = env::var("ACCESS_TOKEN").ok().filter(|t| !t.is_empty());
    }

    fn normalize(&mut self) {
        while self.api.base_url.ends_with('/') {
            self.api.base_url.pop();
        }
        if self.api.timeout.is_zero() {
            self.api.timeout = DEFAULT_TIMEOUT;
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Invalid("app.name is required".into()));
        }

        if self.api.base_url.is_empty() {
            return Err(ConfigError::Invalid("api.base_url is required".into()));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be an http(s) URL, got {}",
                self.api.base_url
            )));
        }

        Ok(())
    }
}

//! Remote API configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Settings for the order-management API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. "http://localhost:8080".
    pub base_url: String,
    /// Per-request timeout.
    #[serde(default, with = "duration")]
    pub timeout: Duration,
    /// Stored access token (loaded from the ACCESS_TOKEN environment
    /// variable, never from the config file).
    #[serde(skip)]
    pub access_token: Option<String>,
}

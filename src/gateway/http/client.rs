//! Raw HTTP client for the order-management API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::gateway::{ApiError, GatewayError, Result};
use crate::session::Session;

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for creating a new Client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// HTTP client for the order-management API.
///
/// Attaches the session's bearer token to every request and converts error
/// responses into structured [`GatewayError`]s. A 403 revokes the session
/// (forced logout) before surfacing [`GatewayError::Forbidden`].
pub struct Client {
    config: ClientConfig,
    http_client: HttpClient,
    session: Arc<Session>,
}

impl Client {
    /// Creates a new API client bound to a session.
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Self {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build http client");

        Self {
            config,
            http_client,
            session,
        }
    }

    /// Sends a request to the API.
    ///
    /// `body` is serialized as JSON when present; `query` is appended to the
    /// URL. Returns the raw response bytes on any 2xx status.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        let mut request = self.http_client.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = self.session.access_token() {
            let value = format!("Bearer {}", token);
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        request = request.headers(headers);

        debug!(method = %method, endpoint = %endpoint, "sending request");

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status == StatusCode::FORBIDDEN {
            warn!(endpoint = %endpoint, "access forbidden, revoking session");
            self.session.revoke();
            return Err(GatewayError::Forbidden);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(self.parse_error_response(status, &bytes));
        }

        Ok(bytes.to_vec())
    }

    /// Builds a GatewayError from an error response body.
    fn parse_error_response(&self, status: StatusCode, body: &[u8]) -> GatewayError {
        #[derive(Deserialize)]
        struct ErrorResponse {
            code: Option<String>,
            message: Option<String>,
        }

        let api_err = match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(resp) => ApiError {
                code: resp.code.unwrap_or_else(|| status.as_u16().to_string()),
                message: resp
                    .message
                    .unwrap_or_else(|| String::from_utf8_lossy(body).to_string()),
            },
            Err(_) => ApiError {
                code: status.as_u16().to_string(),
                message: String::from_utf8_lossy(body).to_string(),
            },
        };

        warn!(code = %api_err.code, message = %api_err.message, "api error");

        GatewayError::Api(api_err)
    }
}

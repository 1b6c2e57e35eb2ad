//! Usage monitor API client
//!
//! Performs single-attempt, authenticated GET requests. The token is sent
//! verbatim in the `Authorization` header (no `Bearer` prefix).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use super::credentials::Credentials;
use super::platform::{base_domain, classify};
use super::provider::{ApiError, Endpoint, UsageSource};
use super::types::Platform;

/// HTTP request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the usage monitor endpoints
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a client with the default 30 second timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Create a client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// GET `url` and parse the body as JSON
    pub async fn request(
        &self,
        url: &str,
        auth_token: &str,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        log::debug!("[glm:client] GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header(AUTHORIZATION, auth_token)
            .header(CONTENT_TYPE, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        log::debug!("[glm:client] Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[glm:client] API error: HTTP {} - {}", status.as_u16(), body);
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            log::warn!("[glm:client] Failed to parse response from {}: {}", url, e);
            ApiError::from(e)
        })?;

        Ok(value)
    }

    /// Like [`ApiClient::request`], but folds failures into an `{error, message}` payload
    pub async fn request_json(
        &self,
        url: &str,
        auth_token: &str,
        query: &[(String, String)],
    ) -> Value {
        match self.request(url, auth_token, query).await {
            Ok(value) => value,
            Err(e) => e.into_payload(),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GlmUsageProvider
// ============================================================================

/// Usage source backed by the live monitor API
pub struct GlmUsageProvider {
    client: ApiClient,
    credentials: Credentials,
    platform: Platform,
    base_domain: String,
}

impl GlmUsageProvider {
    /// Create a provider for resolved credentials
    pub fn new(client: ApiClient, credentials: Credentials) -> Self {
        let platform = classify(&credentials.base_url);
        let base_domain = base_domain(&credentials.base_url);
        log::debug!(
            "[glm:client] Platform {} with base domain {}",
            platform,
            base_domain
        );

        Self {
            client,
            credentials,
            platform,
            base_domain,
        }
    }

    /// Scheme and host the endpoints are called under
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }
}

#[async_trait]
impl UsageSource for GlmUsageProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let url = endpoint.url(&self.base_domain);
        self.client
            .request(&url, &self.credentials.auth_token, query)
            .await
    }
}

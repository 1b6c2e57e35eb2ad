//! Usage source trait and error types
//!
//! Defines the interface the report collector fetches through, and the
//! errors an upstream call can end in.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use super::types::Platform;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when calling the usage monitor API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Upstream answered with a non-success status
    #[error("HTTP {status}")]
    Http { status: u16, body: String },

    /// DNS, connect, timeout or any other transport failure
    #[error("{0}")]
    Transport(String),

    /// Response body was not valid JSON
    #[error("Invalid JSON response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Value of the `error` field in the JSON error payload
    pub fn label(&self) -> String {
        match self {
            ApiError::Http { status, .. } => format!("HTTP {}", status),
            ApiError::Transport(_) | ApiError::Decode(_) => "Error".to_string(),
        }
    }

    /// Value of the `message` field in the JSON error payload
    pub fn message(&self) -> String {
        match self {
            ApiError::Http { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// Convert into the `{error, message}` payload handed to presenters
    pub fn into_payload(self) -> Value {
        json!({
            "error": self.label(),
            "message": self.message(),
        })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport(format!("Request timed out: {}", err))
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Error payload fields of an upstream response, if it is one
pub fn error_of(payload: &Value) -> Option<(String, String)> {
    let error = payload.get("error")?;
    let label = match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let message = payload
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();
    Some((label, message))
}

// ============================================================================
// Endpoints
// ============================================================================

/// The three usage monitor endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ModelUsage,
    ToolUsage,
    QuotaLimit,
}

impl Endpoint {
    /// Path under the base domain
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ModelUsage => "/api/monitor/usage/model-usage",
            Endpoint::ToolUsage => "/api/monitor/usage/tool-usage",
            Endpoint::QuotaLimit => "/api/monitor/usage/quota/limit",
        }
    }

    /// Full URL for a base domain
    pub fn url(&self, base_domain: &str) -> String {
        format!("{}{}", base_domain, self.path())
    }

    /// Whether the endpoint takes the `startTime`/`endTime` window
    pub fn takes_time_window(&self) -> bool {
        !matches!(self, Endpoint::QuotaLimit)
    }

    /// Map a viewer proxy path onto an endpoint by substring
    pub fn from_proxy_path(path: &str) -> Option<Self> {
        if path.contains("/model-usage") {
            Some(Endpoint::ModelUsage)
        } else if path.contains("/tool-usage") {
            Some(Endpoint::ToolUsage)
        } else if path.contains("/quota-limit") {
            Some(Endpoint::QuotaLimit)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::ModelUsage => write!(f, "model-usage"),
            Endpoint::ToolUsage => write!(f, "tool-usage"),
            Endpoint::QuotaLimit => write!(f, "quota-limit"),
        }
    }
}

// ============================================================================
// Source Trait
// ============================================================================

/// Something the report can be collected from
///
/// The production implementation is [`super::GlmUsageProvider`]; tests
/// substitute canned payloads.
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Platform the source talks to
    fn platform(&self) -> Platform;

    /// Fetch one endpoint, passing `query` as URL parameters when non-empty
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &[(String, String)],
    ) -> Result<Value, ApiError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_payload() {
        let err = ApiError::Http {
            status: 500,
            body: "internal boom".to_string(),
        };
        assert_eq!(
            err.into_payload(),
            json!({"error": "HTTP 500", "message": "internal boom"})
        );
    }

    #[test]
    fn test_transport_error_payload() {
        let err = ApiError::Transport("dns error".to_string());
        let payload = err.into_payload();
        assert_eq!(payload["error"], "Error");
        assert_eq!(payload["message"], "dns error");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let json_err = serde_json::from_str::<Value>("<html>").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.label(), "Error");
    }

    #[test]
    fn test_error_of() {
        let payload = json!({"error": "HTTP 401", "message": "token expired"});
        assert_eq!(
            error_of(&payload),
            Some(("HTTP 401".to_string(), "token expired".to_string()))
        );
        assert_eq!(error_of(&json!({"totalUsage": {}})), None);
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(
            Endpoint::QuotaLimit.url("https://api.z.ai"),
            "https://api.z.ai/api/monitor/usage/quota/limit"
        );
        assert!(Endpoint::ModelUsage.takes_time_window());
        assert!(!Endpoint::QuotaLimit.takes_time_window());
    }

    #[test]
    fn test_endpoint_from_proxy_path() {
        assert_eq!(
            Endpoint::from_proxy_path("/api/proxy/model-usage"),
            Some(Endpoint::ModelUsage)
        );
        assert_eq!(
            Endpoint::from_proxy_path("/api/proxy/v2/model-usage?startTime=x"),
            Some(Endpoint::ModelUsage)
        );
        assert_eq!(
            Endpoint::from_proxy_path("/api/proxy/tool-usage"),
            Some(Endpoint::ToolUsage)
        );
        assert_eq!(
            Endpoint::from_proxy_path("/api/proxy/quota-limit"),
            Some(Endpoint::QuotaLimit)
        );
        assert_eq!(Endpoint::from_proxy_path("/api/proxy/unknown"), None);
    }
}

//! Report collection
//!
//! Calls the three endpoints one after another and assembles everything a
//! presenter needs. Upstream failures never abort collection; they are
//! kept as `{error, message}` payloads in the bundle.

use serde::Serialize;
use serde_json::Value;

use super::normalize::{normalize_quota_limits, unwrap_data};
use super::provider::{error_of, Endpoint, UsageSource};
use super::types::{Platform, QuotaLimitRecord, UsageQuery, QUERY_TIME_FORMAT};
use super::usage::{ModelUsageSummary, ToolUsageSummary};

/// Everything fetched for one terminal report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBundle {
    pub platform: Platform,
    pub query: UsageQuery,
    pub queried_at: String,
    pub model_usage: Value,
    pub tool_usage: Value,
    pub quota_limits: Vec<QuotaLimitRecord>,
    /// Error payload of the quota call, if it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_error: Option<Value>,
}

impl ReportBundle {
    /// Summary view of the model-usage payload
    pub fn model_summary(&self) -> ModelUsageSummary {
        ModelUsageSummary::from_payload(&self.model_usage)
    }

    /// Summary view of the tool-usage payload
    pub fn tool_summary(&self) -> ToolUsageSummary {
        ToolUsageSummary::from_payload(&self.tool_usage)
    }

    /// `(error, message)` of the model-usage call, if it failed
    pub fn model_error(&self) -> Option<(String, String)> {
        error_of(&self.model_usage)
    }

    /// `(error, message)` of the tool-usage call, if it failed
    pub fn tool_error(&self) -> Option<(String, String)> {
        error_of(&self.tool_usage)
    }

    /// `(error, message)` of the quota call, if it failed
    pub fn quota_error(&self) -> Option<(String, String)> {
        self.quota_error.as_ref().and_then(error_of)
    }
}

/// Fetch one endpoint, folding errors into a payload and unwrapping `data`
pub async fn fetch_payload(
    source: &dyn UsageSource,
    endpoint: Endpoint,
    query: &UsageQuery,
) -> Value {
    let params = if endpoint.takes_time_window() {
        query.to_params()
    } else {
        Vec::new()
    };

    match source.fetch(endpoint, &params).await {
        Ok(value) => unwrap_data(value),
        Err(e) => {
            log::warn!("[glm:report] {} request failed: {}", endpoint, e);
            e.into_payload()
        }
    }
}

/// Collect a full report, calling `on_progress` before each endpoint
pub async fn collect_report<F>(
    source: &dyn UsageSource,
    query: UsageQuery,
    mut on_progress: F,
) -> ReportBundle
where
    F: FnMut(Endpoint),
{
    on_progress(Endpoint::ModelUsage);
    let model_usage = fetch_payload(source, Endpoint::ModelUsage, &query).await;

    on_progress(Endpoint::ToolUsage);
    let tool_usage = fetch_payload(source, Endpoint::ToolUsage, &query).await;

    on_progress(Endpoint::QuotaLimit);
    let quota_raw = fetch_payload(source, Endpoint::QuotaLimit, &query).await;
    let quota_error = error_of(&quota_raw).map(|_| quota_raw.clone());
    let quota_limits = normalize_quota_limits(&quota_raw);

    ReportBundle {
        platform: source.platform(),
        query,
        queried_at: chrono::Local::now().format(QUERY_TIME_FORMAT).to_string(),
        model_usage,
        tool_usage,
        quota_limits,
        quota_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quota::provider::ApiError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Canned responses keyed by endpoint
    struct FakeSource {
        calls: Mutex<Vec<(Endpoint, usize)>>,
    }

    #[async_trait]
    impl UsageSource for FakeSource {
        fn platform(&self) -> Platform {
            Platform::Zhipu
        }

        async fn fetch(
            &self,
            endpoint: Endpoint,
            query: &[(String, String)],
        ) -> Result<Value, ApiError> {
            self.calls.lock().unwrap().push((endpoint, query.len()));
            match endpoint {
                Endpoint::ModelUsage => Ok(json!({
                    "code": 200,
                    "data": {"totalUsage": {"totalModelCallCount": 7, "totalTokensUsage": 900}}
                })),
                Endpoint::ToolUsage => Err(ApiError::Http {
                    status: 500,
                    body: "tool backend down".to_string(),
                }),
                Endpoint::QuotaLimit => Ok(json!({
                    "data": {"limits": [{"type": "TOKENS_LIMIT", "percentage": 42}]}
                })),
            }
        }
    }

    #[tokio::test]
    async fn test_collect_report_sequence_and_shapes() {
        let source = FakeSource {
            calls: Mutex::new(Vec::new()),
        };
        let mut progress = Vec::new();
        let query = UsageQuery {
            start_time: "2026-01-01 10:00:00".to_string(),
            end_time: "2026-01-02 10:59:59".to_string(),
        };

        let bundle = collect_report(&source, query, |e| progress.push(e)).await;

        assert_eq!(
            progress,
            vec![Endpoint::ModelUsage, Endpoint::ToolUsage, Endpoint::QuotaLimit]
        );
        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(calls[0], (Endpoint::ModelUsage, 2));
        assert_eq!(calls[2], (Endpoint::QuotaLimit, 0));

        assert_eq!(bundle.platform, Platform::Zhipu);
        assert_eq!(bundle.model_summary().total_calls, 7);
        assert!(bundle.model_error().is_none());
        assert_eq!(
            bundle.tool_error(),
            Some(("HTTP 500".to_string(), "tool backend down".to_string()))
        );
        assert_eq!(bundle.tool_summary().total, 0);
        assert_eq!(bundle.quota_limits.len(), 1);
        assert!(bundle.quota_error().is_none());
    }
}

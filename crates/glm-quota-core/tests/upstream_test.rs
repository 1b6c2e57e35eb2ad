//! Tests against a local mock of the usage monitor API

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use glm_quota_core::{
    collect_report, ApiClient, Credentials, Endpoint, GlmUsageProvider, Platform, UsageQuery,
    UsageSource,
};

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route(
            "/api/monitor/usage/model-usage",
            get(
                |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let content_type = headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({
                        "code": 200,
                        "data": {
                            "auth": auth,
                            "contentType": content_type,
                            "startTime": q.get("startTime"),
                            "endTime": q.get("endTime"),
                            "totalUsage": {"totalModelCallCount": 12, "totalTokensUsage": 3400},
                            "x_time": ["2026-01-01 10:00", "2026-01-01 11:00", "2026-01-01 12:00"],
                            "modelCallCount": [5, 0, 7]
                        }
                    }))
                },
            ),
        )
        .route(
            "/api/monitor/usage/tool-usage",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "tool stats unavailable") }),
        )
        .route(
            "/api/monitor/usage/quota/limit",
            get(|| async {
                Json(json!({
                    "data": {"limits": [
                        {"type": "TOKENS_LIMIT", "percentage": 55},
                        {"type": "TIME_LIMIT", "percentage": 10, "currentValue": 3, "usage": 30}
                    ]}
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}:{}/api/anthropic", addr.ip(), addr.port())
}

fn provider_for(base_url: String) -> GlmUsageProvider {
    GlmUsageProvider::new(
        ApiClient::new(),
        Credentials {
            base_url,
            auth_token: "raw-token-123".to_string(),
        },
    )
}

#[tokio::test]
async fn test_token_sent_verbatim_with_query_window() {
    let provider = provider_for(spawn_upstream().await);
    let query = UsageQuery {
        start_time: "2026-01-01 10:00:00".to_string(),
        end_time: "2026-01-02 10:59:59".to_string(),
    };

    let value = provider
        .fetch(Endpoint::ModelUsage, &query.to_params())
        .await
        .unwrap();

    assert_eq!(value["data"]["auth"], "raw-token-123");
    assert_eq!(value["data"]["contentType"], "application/json");
    assert_eq!(value["data"]["startTime"], "2026-01-01 10:00:00");
    assert_eq!(value["data"]["endTime"], "2026-01-02 10:59:59");
}

#[tokio::test]
async fn test_http_500_becomes_error_payload() {
    let base = spawn_upstream().await;
    let domain = base.trim_end_matches("/api/anthropic").to_string();

    let payload = ApiClient::new()
        .request_json(&Endpoint::ToolUsage.url(&domain), "tok", &[])
        .await;

    assert_eq!(
        payload,
        json!({"error": "HTTP 500", "message": "tool stats unavailable"})
    );
}

#[tokio::test]
async fn test_collect_report_end_to_end() {
    let provider = provider_for(spawn_upstream().await);
    assert_eq!(provider.platform(), Platform::Unknown);

    let bundle = collect_report(&provider, UsageQuery::current(), |_| {}).await;

    let model = bundle.model_summary();
    assert_eq!(model.total_calls, 12);
    assert_eq!(model.peak().unwrap().count, 7);
    assert_eq!(model.trough().unwrap().label, "2026-01-01 11:00");

    assert_eq!(bundle.tool_error().unwrap().0, "HTTP 500");

    assert_eq!(bundle.quota_limits.len(), 2);
    assert_eq!(bundle.quota_limits[0].percent(), 55.0);
    assert_eq!(bundle.quota_limits[1].current, Some(3.into()));
    assert_eq!(bundle.quota_limits[1].total, Some(30.into()));
}

#[tokio::test]
async fn test_unreachable_upstream_never_panics() {
    let provider = provider_for("http://127.0.0.1:9/api/anthropic".to_string());
    let bundle = collect_report(&provider, UsageQuery::current(), |_| {}).await;

    assert_eq!(bundle.model_error().unwrap().0, "Error");
    assert!(bundle.quota_limits.is_empty());
    assert!(bundle.quota_error().is_some());
    let _: Value = serde_json::to_value(&bundle).unwrap();
}

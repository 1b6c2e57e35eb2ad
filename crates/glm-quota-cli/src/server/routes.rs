//! Viewer server handlers

use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use glm_quota_core::{base_domain, relabel_quota_limits, unwrap_data, ApiError, Endpoint};

use super::{SharedState, MAX_ERROR_MESSAGE_CHARS};

/// `GET /` - the viewer page
pub async fn index(State(state): State<SharedState>) -> Response {
    match tokio::fs::read(&state.asset_path).await {
        Ok(bytes) => (
            [(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            log::warn!(
                "[glm:server] Viewer page {:?} not readable: {}",
                state.asset_path,
                e
            );
            (StatusCode::NOT_FOUND, "HTML file not found").into_response()
        }
    }
}

/// `GET /api/config` - configuration status for the page
///
/// The platform here is coarser than `classify`: anything without
/// `bigmodel` in the base URL is reported as `ZAI`.
pub async fn config(State(state): State<SharedState>) -> Response {
    let resolved = state.resolver.lookup();
    let base_url = resolved.base_url.as_deref().unwrap_or_default();
    let platform = if base_url.contains("bigmodel") { "ZHIPU" } else { "ZAI" };

    Json(json!({
        "hasConfig": resolved.is_complete(),
        "platform": platform,
    }))
    .into_response()
}

/// Anything unrouted
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// `GET /api/proxy/*` - forward to the upstream endpoint named in the path
pub async fn proxy(
    State(state): State<SharedState>,
    uri: Uri,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let path = uri.path();
    let params = first_values(params);

    let Some(credentials) = state.resolver.resolve() else {
        log::debug!("[glm:server] {} rejected: no auth token", path);
        return error_json(StatusCode::UNAUTHORIZED, "Unauthorized", "No auth token found");
    };

    let Some(endpoint) = Endpoint::from_proxy_path(path) else {
        return error_json(StatusCode::BAD_REQUEST, "Bad Request", "Unknown API endpoint");
    };

    let url = endpoint.url(&base_domain(&credentials.base_url));
    log::debug!("[glm:server] Proxy {} -> {}", path, url);

    let body = match state
        .client
        .request(&url, &credentials.auth_token, &params)
        .await
    {
        Ok(value) => {
            let mut data = unwrap_data(value);
            if endpoint == Endpoint::QuotaLimit {
                relabel_quota_limits(&mut data);
            }
            data
        }
        Err(ApiError::Http { status, body }) => json!({
            "error": format!("HTTP {}", status),
            "message": truncate_chars(&body, MAX_ERROR_MESSAGE_CHARS),
        }),
        Err(e) => {
            log::warn!("[glm:server] Proxy {} failed: {}", endpoint, e);
            e.into_payload()
        }
    };

    // Upstream failures are still a 200 so the page can always parse JSON.
    Json(body).into_response()
}

fn error_json(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(json!({"error": error, "message": message}))).into_response()
}

/// Keep the first value of each query key, in order of appearance
pub fn first_values(params: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::with_capacity(params.len());
    for (key, value) in params {
        if !out.iter().any(|(k, _)| *k == key) {
            out.push((key, value));
        }
    }
    out
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

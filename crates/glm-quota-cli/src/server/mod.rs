//! Local viewer server
//!
//! Serves the viewer page and proxies its API calls to the usage monitor
//! endpoints, so the page never needs the token or cross-origin access.
//!
//! Routes:
//! - `GET /` - the viewer page, byte for byte (404 when missing)
//! - `GET /api/config` - whether credentials are configured, and for which platform
//! - `GET /api/proxy/*` - forwards to the matching upstream endpoint
//!
//! Only the proxy routes carry the permissive CORS header. Credentials are
//! resolved again on every request.

mod routes;


use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

use glm_quota_core::{ApiClient, CredentialResolver};

/// First port tried when starting the server
pub const DEFAULT_PORT: u16 = 8848;

/// How many consecutive ports are probed
pub const PORT_PROBE_SPAN: u16 = 100;

/// Longest upstream error body passed on to the page
pub const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// State shared by all handlers
pub struct ProxyState {
    pub resolver: CredentialResolver,
    pub client: ApiClient,
    pub asset_path: PathBuf,
}

pub type SharedState = Arc<ProxyState>;

/// Build the viewer router
pub fn build_router(state: ProxyState) -> Router {
    let proxy = Router::new()
        .route("/api/proxy", get(routes::proxy))
        .route("/api/proxy/*rest", get(routes::proxy))
        .layer(CorsLayer::new().allow_origin(Any));

    Router::new()
        .route("/", get(routes::index))
        .route("/api/config", get(routes::config))
        .merge(proxy)
        .fallback(routes::not_found)
        .with_state(Arc::new(state))
        .layer(CatchPanicLayer::new())
}

/// First port in `start..start + span` that can be bound on loopback
///
/// Falls back to `start` when none can; the real bind then reports the error.
pub fn find_free_port(start: u16, span: u16) -> u16 {
    let end = start.saturating_add(span);
    for port in start..end {
        if std::net::TcpListener::bind(("127.0.0.1", port)).is_ok() {
            return port;
        }
        log::debug!("[glm:server] Port {} unavailable", port);
    }
    log::warn!(
        "[glm:server] No free port in {}..{}, trying {} anyway",
        start,
        end,
        start
    );
    start
}

//! Usage and quota reporting
//!
//! Everything between the credential sources and the two presenters
//! (terminal report and viewer proxy).
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐   ┌──────────────┐
//! │ CredentialResolver │──▶│ classify /   │
//! │  env → settings    │   │ base_domain  │
//! └────────────────────┘   └──────────────┘
//!            │
//!            ▼
//! ┌─────────────────────────────────────────┐
//! │ trait UsageSource                       │
//! │   GlmUsageProvider → ApiClient (GET)    │
//! └─────────────────────────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────────────────────────┐
//! │ collect_report → ReportBundle           │
//! │   normalize_quota_limits                │
//! │   ModelUsageSummary / ToolUsageSummary  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use glm_quota_core::{
//!     collect_report, ApiClient, CredentialResolver, GlmUsageProvider, UsageQuery,
//! };
//!
//! let credentials = CredentialResolver::new().resolve().expect("no token configured");
//! let provider = GlmUsageProvider::new(ApiClient::new(), credentials);
//! let bundle = collect_report(&provider, UsageQuery::current(), |_| {}).await;
//! for limit in &bundle.quota_limits {
//!     println!("{}: {}%", limit.display_type, limit.percentage);
//! }
//! ```

pub mod types;
pub mod credentials;
pub mod platform;
pub mod provider;
pub mod client;
pub mod normalize;
pub mod usage;
pub mod report;

// Re-export main types
pub use types::{
    AlertLevel,
    Platform,
    QuotaLimitRecord,
    UsageQuery,
    CRITICAL_THRESHOLD,
    WARNING_THRESHOLD,
};

pub use credentials::{
    CredentialResolver,
    Credentials,
    ResolvedSettings,
    AUTH_TOKEN_ENV,
    BASE_URL_ENV,
    DEFAULT_BASE_URL,
};

pub use platform::{base_domain, classify};

// Re-export source trait and error
pub use provider::{error_of, ApiError, Endpoint, UsageSource};

pub use client::{ApiClient, GlmUsageProvider, REQUEST_TIMEOUT_SECS};

pub use normalize::{normalize_quota_limits, relabel_quota_limits, unwrap_data};

pub use usage::{
    tool_display_name, ModelUsageSummary, SeriesPoint, ToolUsageEntry, ToolUsageSummary,
};

pub use report::{collect_report, fetch_payload, ReportBundle};

//! # glm-quota-core
//!
//! Core logic for glm-quota, shared by the terminal report and the local viewer proxy.
//!
//! This crate provides:
//! - Credential discovery (`services::quota::credentials`)
//! - Platform detection (`services::quota::platform`)
//! - The usage monitor API client (`services::quota::client`)
//! - Quota and usage normalization (`services::quota::normalize`, `services::quota::usage`)
//! - Unified error handling (`error` module)

pub mod error;
pub mod services;

pub use error::{Error, Result};

pub use services::quota::{
    base_domain, classify, collect_report, normalize_quota_limits, relabel_quota_limits,
    unwrap_data, AlertLevel, ApiClient, ApiError, CredentialResolver, Credentials, Endpoint,
    GlmUsageProvider, ModelUsageSummary, Platform, QuotaLimitRecord, ReportBundle,
    ResolvedSettings, ToolUsageEntry, ToolUsageSummary, UsageQuery, UsageSource, AUTH_TOKEN_ENV,
    BASE_URL_ENV, DEFAULT_BASE_URL,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_constants_at_crate_root() {
        assert_eq!(BASE_URL_ENV, "ANTHROPIC_BASE_URL");
        assert_eq!(AUTH_TOKEN_ENV, "ANTHROPIC_AUTH_TOKEN");
        assert!(DEFAULT_BASE_URL.starts_with("https://open.bigmodel.cn"));
    }
}

//! Platform detection
//!
//! Maps a configured base URL onto a known platform and onto the
//! scheme+host the usage monitor endpoints live under.

use super::types::Platform;

/// Host of the Z.ai international API
const ZAI_HOST: &str = "api.z.ai";

/// Hosts of the Zhipu open platform
const ZHIPU_HOSTS: [&str; 2] = ["open.bigmodel.cn", "dev.bigmodel.cn"];

/// Classify a base URL by substring match (case-sensitive, first match wins)
pub fn classify(base_url: &str) -> Platform {
    if base_url.contains(ZAI_HOST) {
        Platform::Zai
    } else if ZHIPU_HOSTS.iter().any(|host| base_url.contains(host)) {
        Platform::Zhipu
    } else {
        Platform::Unknown
    }
}

/// Derive the upstream base domain (scheme + host) from a base URL
///
/// Known hosts always map to their https origin; anything else keeps the
/// part before the first `/api/`.
pub fn base_domain(base_url: &str) -> String {
    if base_url.contains(ZAI_HOST) {
        return format!("https://{}", ZAI_HOST);
    }
    for host in ZHIPU_HOSTS {
        if base_url.contains(host) {
            return format!("https://{}", host);
        }
    }
    base_url
        .split("/api/")
        .next()
        .unwrap_or(base_url)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_hosts() {
        assert_eq!(classify("https://api.z.ai/api/anthropic"), Platform::Zai);
        assert_eq!(classify("https://open.bigmodel.cn/api/anthropic"), Platform::Zhipu);
        assert_eq!(classify("https://dev.bigmodel.cn/api/anthropic"), Platform::Zhipu);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("https://example.com"), Platform::Unknown);
        assert_eq!(classify(""), Platform::Unknown);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(classify("https://API.Z.AI/api"), Platform::Unknown);
    }

    #[test]
    fn test_base_domain_known_hosts() {
        assert_eq!(base_domain("https://api.z.ai/api/anthropic"), "https://api.z.ai");
        assert_eq!(
            base_domain("https://open.bigmodel.cn/api/anthropic"),
            "https://open.bigmodel.cn"
        );
        assert_eq!(
            base_domain("http://dev.bigmodel.cn/api/paas/v4"),
            "https://dev.bigmodel.cn"
        );
    }

    #[test]
    fn test_base_domain_splits_on_api() {
        assert_eq!(
            base_domain("http://127.0.0.1:9000/api/anthropic"),
            "http://127.0.0.1:9000"
        );
        assert_eq!(base_domain("https://proxy.example.com"), "https://proxy.example.com");
    }
}

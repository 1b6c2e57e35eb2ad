//! Quota reporting types
//!
//! Types shared by the terminal report and the viewer proxy.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Number;

// ============================================================================
// Platform
// ============================================================================

/// Upstream platform serving the coding plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    /// Z.ai international endpoint (`api.z.ai`)
    Zai,
    /// Zhipu mainland endpoints (`open.bigmodel.cn`, `dev.bigmodel.cn`)
    Zhipu,
    /// Anything else
    Unknown,
}

impl Platform {
    /// Label shown in the terminal info panel
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Zai => "ZAI",
            Platform::Zhipu => "ZHIPU (智谱)",
            Platform::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Zai => write!(f, "ZAI"),
            Platform::Zhipu => write!(f, "ZHIPU"),
            Platform::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ============================================================================
// Query Window
// ============================================================================

/// Timestamp format accepted by the usage endpoints
pub const QUERY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time range sent to the model-usage and tool-usage endpoints
///
/// Covers yesterday at the current hour (minute 0) up to today at the
/// current hour, second 59.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageQuery {
    pub start_time: String,
    pub end_time: String,
}

impl UsageQuery {
    /// Build the rolling window ending at the hour containing `now`
    pub fn rolling_window(now: NaiveDateTime) -> Self {
        let hour_start = now
            .date()
            .and_hms_opt(now.hour(), 0, 0)
            .unwrap_or(now);

        let start = hour_start - Duration::days(1);
        let end = hour_start + Duration::minutes(59) + Duration::seconds(59);

        Self {
            start_time: start.format(QUERY_TIME_FORMAT).to_string(),
            end_time: end.format(QUERY_TIME_FORMAT).to_string(),
        }
    }

    /// Rolling window for the current local time
    pub fn current() -> Self {
        Self::rolling_window(chrono::Local::now().naive_local())
    }

    /// Query parameters in the order the upstream expects them
    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            ("startTime".to_string(), self.start_time.clone()),
            ("endTime".to_string(), self.end_time.clone()),
        ]
    }
}

// ============================================================================
// Quota Limits
// ============================================================================

/// A quota limit ready for display
///
/// Numbers are kept exactly as the upstream reported them, so `42` stays
/// `42` and out-of-range or fractional values survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaLimitRecord {
    pub display_type: String,
    pub period: String,
    pub percentage: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Number>,
}

impl QuotaLimitRecord {
    /// Create a record without usage counters
    pub fn new(
        display_type: impl Into<String>,
        period: impl Into<String>,
        percentage: impl Into<Number>,
    ) -> Self {
        Self {
            display_type: display_type.into(),
            period: period.into(),
            percentage: percentage.into(),
            current: None,
            total: None,
        }
    }

    /// Attach `current / total` counters
    pub fn with_usage(mut self, current: impl Into<Number>, total: impl Into<Number>) -> Self {
        self.current = Some(current.into());
        self.total = Some(total.into());
        self
    }

    /// Percentage as a float, for severity and bar arithmetic
    pub fn percent(&self) -> f64 {
        self.percentage.as_f64().unwrap_or(0.0)
    }

    /// Severity of this limit's usage
    pub fn alert_level(&self) -> AlertLevel {
        AlertLevel::from_percentage(self.percent())
    }
}

// ============================================================================
// Alert Level
// ============================================================================

/// Usage percentage at which a limit is shown as a warning
pub const WARNING_THRESHOLD: f64 = 70.0;

/// Usage percentage at which a limit is shown as critical
pub const CRITICAL_THRESHOLD: f64 = 90.0;

/// Alert level for quota usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Normal usage, no alert
    Normal,
    /// Usage is approaching limit
    Warning,
    /// Usage is at or near limit
    Critical,
}

impl AlertLevel {
    /// Determine alert level based on usage percentage and thresholds
    pub fn from_usage(used_percent: f64, warning_threshold: f64, critical_threshold: f64) -> Self {
        if used_percent >= critical_threshold {
            AlertLevel::Critical
        } else if used_percent >= warning_threshold {
            AlertLevel::Warning
        } else {
            AlertLevel::Normal
        }
    }

    /// Alert level using the default 70% / 90% thresholds
    pub fn from_percentage(used_percent: f64) -> Self {
        Self::from_usage(used_percent, WARNING_THRESHOLD, CRITICAL_THRESHOLD)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::Zai.to_string(), "ZAI");
        assert_eq!(Platform::Zhipu.to_string(), "ZHIPU");
        assert_eq!(Platform::Unknown.to_string(), "UNKNOWN");
        assert_eq!(Platform::Zhipu.display_name(), "ZHIPU (智谱)");
    }

    #[test]
    fn test_platform_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Platform::Zhipu).unwrap(), "\"ZHIPU\"");
    }

    #[test]
    fn test_rolling_window() {
        let q = UsageQuery::rolling_window(at(2026, 3, 15, 14, 37, 12));
        assert_eq!(q.start_time, "2026-03-14 14:00:00");
        assert_eq!(q.end_time, "2026-03-15 14:59:59");
    }

    #[test]
    fn test_rolling_window_crosses_month_boundary() {
        let q = UsageQuery::rolling_window(at(2026, 3, 1, 0, 5, 0));
        assert_eq!(q.start_time, "2026-02-28 00:00:00");
        assert_eq!(q.end_time, "2026-03-01 00:59:59");
    }

    #[test]
    fn test_query_params() {
        let q = UsageQuery::rolling_window(at(2026, 1, 2, 9, 0, 0));
        let params = q.to_params();
        assert_eq!(params[0].0, "startTime");
        assert_eq!(params[1], ("endTime".to_string(), "2026-01-02 09:59:59".to_string()));
    }

    #[test]
    fn test_alert_level_boundaries() {
        assert_eq!(AlertLevel::from_percentage(69.9), AlertLevel::Normal);
        assert_eq!(AlertLevel::from_percentage(70.0), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_percentage(89.0), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_percentage(90.0), AlertLevel::Critical);
        assert_eq!(AlertLevel::from_percentage(120.0), AlertLevel::Critical);
    }

    #[test]
    fn test_quota_record_serialization_skips_missing_usage() {
        let record = QuotaLimitRecord::new("Token使用(5 Hour)", "5小时窗口", 42);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["displayType"], "Token使用(5 Hour)");
        assert!(json.get("current").is_none());

        let monthly = QuotaLimitRecord::new("MCP使用(1 Month)", "1个月", 10).with_usage(3, 30);
        let json = serde_json::to_value(&monthly).unwrap();
        assert_eq!(json["current"], 3);
        assert_eq!(json["total"], 30);
    }

    #[test]
    fn test_quota_record_keeps_integer_percentage() {
        let record = QuotaLimitRecord::new("Token使用(5 Hour)", "5小时窗口", 42);
        let text = serde_json::to_string(&record).unwrap();
        assert!(text.contains("\"percentage\":42,"), "{}", text);
        assert_eq!(record.percent(), 42.0);
        assert_eq!(record.alert_level(), AlertLevel::Normal);
    }
}

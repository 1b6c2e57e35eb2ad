//! Model and tool usage summaries
//!
//! Read-side views over the raw model-usage and tool-usage payloads. Every
//! field access defaults on absence, so an error payload yields an empty
//! summary.

use serde::Serialize;
use serde_json::Value;

use super::normalize::as_count;

// ============================================================================
// Model Usage
// ============================================================================

/// Model call totals plus the hourly call-count series
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsageSummary {
    pub total_calls: u64,
    pub total_tokens: u64,
    pub time_labels: Vec<String>,
    /// `None` where the upstream reported `null` for an hour
    pub call_counts: Vec<Option<u64>>,
}

/// A labelled point of the call-count series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub label: String,
    pub count: u64,
}

impl ModelUsageSummary {
    /// Build from a (data-unwrapped) model-usage payload
    pub fn from_payload(payload: &Value) -> Self {
        let total_usage = payload.get("totalUsage");

        let time_labels = payload
            .get("x_time")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let call_counts = payload
            .get("modelCallCount")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| if item.is_null() { None } else { Some(as_count(Some(item))) })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            total_calls: as_count(total_usage.and_then(|t| t.get("totalModelCallCount"))),
            total_tokens: as_count(total_usage.and_then(|t| t.get("totalTokensUsage"))),
            time_labels,
            call_counts,
        }
    }

    /// Both series are non-empty, so peak and trough can be shown
    pub fn has_series(&self) -> bool {
        !self.time_labels.is_empty() && !self.call_counts.is_empty()
    }

    /// Index of the highest call count; missing hours count as 0, first wins on ties
    pub fn peak_index(&self) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (i, count) in self.call_counts.iter().enumerate() {
            let value = count.unwrap_or(0);
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((i, value));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the lowest call count; missing hours are skipped, first wins on ties
    pub fn trough_index(&self) -> Option<usize> {
        if self.call_counts.is_empty() {
            return None;
        }
        let mut best = (0, u64::MAX);
        for (i, count) in self.call_counts.iter().enumerate() {
            let value = count.unwrap_or(u64::MAX);
            if value < best.1 {
                best = (i, value);
            }
        }
        Some(best.0)
    }

    fn point(&self, index: usize) -> SeriesPoint {
        SeriesPoint {
            label: self
                .time_labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| "-".to_string()),
            count: self.call_counts.get(index).copied().flatten().unwrap_or(0),
        }
    }

    /// Busiest hour, when the series is present
    pub fn peak(&self) -> Option<SeriesPoint> {
        if !self.has_series() {
            return None;
        }
        self.peak_index().map(|i| self.point(i))
    }

    /// Quietest hour, when the series is present
    pub fn trough(&self) -> Option<SeriesPoint> {
        if !self.has_series() {
            return None;
        }
        self.trough_index().map(|i| self.point(i))
    }
}

// ============================================================================
// Tool Usage
// ============================================================================

/// Display name of a tool id; unknown ids are shown verbatim
pub fn tool_display_name(tool_id: &str) -> &str {
    match tool_id {
        "search-prime" => "网络搜索",
        "web-reader" => "网页阅读",
        "zread" => "ZRead",
        other => other,
    }
}

/// Usage count of a single tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsageEntry {
    pub tool_id: String,
    pub count: u64,
}

impl ToolUsageEntry {
    /// Localized name for display
    pub fn display_name(&self) -> &str {
        tool_display_name(&self.tool_id)
    }
}

/// Per-tool call counts plus the overall total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsageSummary {
    pub tools: Vec<ToolUsageEntry>,
    pub total: u64,
}

impl ToolUsageSummary {
    /// Build from a (data-unwrapped) tool-usage payload
    pub fn from_payload(payload: &Value) -> Self {
        let total_usage = payload.get("totalUsage");

        let tools = total_usage
            .and_then(|t| t.get("toolDetails"))
            .and_then(|d| d.as_array())
            .map(|details| {
                details
                    .iter()
                    .map(|tool| ToolUsageEntry {
                        tool_id: tool
                            .get("modelName")
                            .and_then(|n| n.as_str())
                            .unwrap_or("unknown")
                            .to_string(),
                        count: as_count(tool.get("totalUsageCount")),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            tools,
            total: as_count(total_usage.and_then(|t| t.get("totalSearchMcpCount"))),
        }
    }
}

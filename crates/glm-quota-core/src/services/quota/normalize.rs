//! Quota limit normalization
//!
//! Turns the raw `quota/limit` payload into display records for the
//! terminal, and relabels it in place for the browser viewer. Both paths
//! recognize the same two limit kinds and tolerate missing fields.

use serde_json::{Map, Number, Value};

use super::types::QuotaLimitRecord;

/// Upstream kind of the 5-hour token limit
pub const TOKENS_LIMIT: &str = "TOKENS_LIMIT";

/// Upstream kind of the monthly MCP call limit
pub const TIME_LIMIT: &str = "TIME_LIMIT";

/// Display label of the 5-hour token limit
pub const TOKENS_LIMIT_LABEL: &str = "Token使用(5 Hour)";

/// Display label of the monthly MCP limit
pub const TIME_LIMIT_LABEL: &str = "MCP使用(1 Month)";

const TOKENS_LIMIT_PERIOD: &str = "5小时窗口";
const TIME_LIMIT_PERIOD: &str = "1个月";

/// Take the `data` envelope out of a response, if it has one
pub fn unwrap_data(mut value: Value) -> Value {
    match value.as_object_mut().and_then(|obj| obj.remove("data")) {
        Some(data) => data,
        None => value,
    }
}

/// Read a JSON number as `u64`, defaulting to 0
pub fn as_count(value: Option<&Value>) -> u64 {
    match value {
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        None => 0,
    }
}

/// Take a JSON number as received, defaulting to 0
pub fn as_number(value: Option<&Value>) -> Number {
    match value {
        Some(Value::Number(n)) => n.clone(),
        _ => Number::from(0),
    }
}

fn limits_of(payload: &Value) -> &[Value] {
    payload
        .get("limits")
        .and_then(|l| l.as_array())
        .map(|l| l.as_slice())
        .unwrap_or_default()
}

/// Normalize a quota payload into display records
///
/// Order follows the upstream `limits` array. Unknown kinds are dropped;
/// non-object payloads give an empty list.
pub fn normalize_quota_limits(payload: &Value) -> Vec<QuotaLimitRecord> {
    if !payload.is_object() {
        return Vec::new();
    }

    limits_of(payload)
        .iter()
        .filter_map(|item| {
            let percentage = as_number(item.get("percentage"));
            match item.get("type").and_then(|t| t.as_str()) {
                Some(TOKENS_LIMIT) => Some(QuotaLimitRecord::new(
                    TOKENS_LIMIT_LABEL,
                    TOKENS_LIMIT_PERIOD,
                    percentage,
                )),
                Some(TIME_LIMIT) => Some(
                    QuotaLimitRecord::new(TIME_LIMIT_LABEL, TIME_LIMIT_PERIOD, percentage)
                        .with_usage(
                            as_number(item.get("currentValue")),
                            as_number(item.get("usage")),
                        ),
                ),
                other => {
                    log::debug!("[glm:normalize] Skipping quota limit of type {:?}", other);
                    None
                }
            }
        })
        .collect()
}

/// Relabel `limits[].type` in place for the browser viewer
///
/// The monthly kind also gets `currentUsage` (from `currentValue`) and
/// `totol` (from `usage`), the field names the viewer page reads. `total`
/// is written alongside with the same value.
pub fn relabel_quota_limits(payload: &mut Value) {
    let Some(limits) = payload.get_mut("limits").and_then(|l| l.as_array_mut()) else {
        return;
    };

    for limit in limits.iter_mut().filter_map(|l| l.as_object_mut()) {
        let kind = limit.get("type").and_then(|t| t.as_str()).map(str::to_owned);
        match kind.as_deref() {
            Some(TOKENS_LIMIT) => {
                limit.insert("type".to_string(), Value::from(TOKENS_LIMIT_LABEL));
            }
            Some(TIME_LIMIT) => {
                limit.insert("type".to_string(), Value::from(TIME_LIMIT_LABEL));
                let current = field_or_zero(limit, "currentValue");
                let usage = field_or_zero(limit, "usage");
                limit.insert("currentUsage".to_string(), current);
                limit.insert("totol".to_string(), usage.clone());
                limit.insert("total".to_string(), usage);
            }
            _ => {}
        }
    }
}

fn field_or_zero(obj: &Map<String, Value>, key: &str) -> Value {
    obj.get(key).cloned().unwrap_or_else(|| Value::from(0))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One BMI measurement from a patient health record.
///
/// `bmi` is computed upstream; it is not re-derived from weight and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiSample {
    pub bmi: f64,
    pub weight: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl BmiSample {
    pub fn new(bmi: f64, weight: f64, height: f64) -> Self {
        Self {
            bmi,
            weight,
            height,
            recorded_at: None,
        }
    }
}

/// One patient's vaccination history, flattened for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationSample {
    pub age: f64,
    pub gender: String,
    pub vaccines: Vec<String>,
}

/// Read a numeric column that may arrive as a JSON number or a numeric
/// string. Null, blank and unparsable values yield `None`.
pub fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Read a string-array column. Non-string entries are skipped; a missing
/// or non-array column yields an empty list.
pub fn json_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse an RFC 3339 timestamp column.
pub fn json_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

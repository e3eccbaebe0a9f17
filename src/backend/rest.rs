use serde_json::Value;

use super::{BackendError, Query, RecordStore};
use crate::config::BackendConfig;

/// HTTP client for the hosted backend's REST interface.
///
/// Holds only connection settings; a blocking client is built per call so
/// no client outlives the worker thread that used it.
pub struct RestStore {
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.base_url, &config.api_key, config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn client(&self) -> Result<reqwest::blocking::Client, BackendError> {
        reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| BackendError::HttpClient(e.to_string()))
    }
}

impl RecordStore for RestStore {
    fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let url = self.table_url(&query.table);
        let params = query.to_params();

        tracing::debug!(table = %query.table, filters = query.filters.len(), "Backend select");

        let response = self
            .client()?
            .get(&url)
            .query(&params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    BackendError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    BackendError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    BackendError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .map_err(|e| BackendError::ResponseParsing(e.to_string()))?;

        Ok(rows_from_body(&query.table, body))
    }
}

/// A select must answer with an array of rows. Anything else is treated as
/// malformed upstream data and reads as an empty table.
fn rows_from_body(table: &str, body: Value) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows,
        other => {
            tracing::warn!(
                table,
                kind = json_kind(&other),
                "Backend select returned a non-array body, treating as empty"
            );
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructor_trims_trailing_slash() {
        let store = RestStore::new("https://db.example.org/", "key", 10);
        assert_eq!(store.base_url(), "https://db.example.org");
        assert_eq!(
            store.table_url("regions"),
            "https://db.example.org/rest/v1/regions"
        );
    }

    #[test]
    fn from_config_copies_settings() {
        let config = BackendConfig {
            base_url: "https://db.example.org".into(),
            api_key: "anon".into(),
            timeout_secs: 12,
        };
        let store = RestStore::from_config(&config);
        assert_eq!(store.base_url(), "https://db.example.org");
        assert_eq!(store.api_key, "anon");
        assert_eq!(store.timeout_secs, 12);
    }

    #[test]
    fn array_body_passes_through() {
        let rows = rows_from_body("regions", json!([{"region_id": "R1"}, {"region_id": "R2"}]));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn non_array_body_reads_as_empty() {
        assert!(rows_from_body("regions", json!({"message": "oops"})).is_empty());
        assert!(rows_from_body("regions", json!(null)).is_empty());
    }

    #[test]
    fn unreachable_backend_is_connection_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let store = RestStore::new("http://127.0.0.1:9", "key", 2);
        let err = store.select(&Query::table("regions")).unwrap_err();
        assert!(
            matches!(err, BackendError::Connection(_) | BackendError::HttpClient(_)),
            "unexpected error: {err}"
        );
    }
}

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use serde_json::{Map, Value};

use super::{BackendError, Filter, Query, RecordStore};

/// In-process table store that evaluates `Query` filters the way the
/// hosted backend does. Used by tests and local demos.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    failures: RwLock<HashMap<String, String>>,
    region_delays: RwLock<HashMap<String, Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style table insert.
    pub fn with_table(self, table: &str, rows: Vec<Value>) -> Self {
        self.insert_rows(table, rows);
        self
    }

    pub fn insert_rows(&self, table: &str, rows: Vec<Value>) {
        if let Ok(mut tables) = self.tables.write() {
            tables.entry(table.to_string()).or_default().extend(rows);
        }
    }

    /// Make every select on `table` fail with a backend status error.
    pub fn fail_table(&self, table: &str, message: &str) {
        if let Ok(mut failures) = self.failures.write() {
            failures.insert(table.to_string(), message.to_string());
        }
    }

    /// Delay every select scoped to `region_id` (by an `eq` filter on
    /// `region_id`) before answering.
    pub fn delay_region(&self, region_id: &str, delay: Duration) {
        if let Ok(mut delays) = self.region_delays.write() {
            delays.insert(region_id.to_string(), delay);
        }
    }

    fn delay_for(&self, query: &Query) -> Option<Duration> {
        let delays = self.region_delays.read().ok()?;
        query.filters.iter().find_map(|filter| match filter {
            Filter::Eq { column, value } if column == "region_id" => delays.get(value).copied(),
            _ => None,
        })
    }
}

impl RecordStore for MemoryStore {
    fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        if let Some(delay) = self.delay_for(query) {
            std::thread::sleep(delay);
        }

        if let Some(message) = self
            .failures
            .read()
            .ok()
            .and_then(|failures| failures.get(&query.table).cloned())
        {
            return Err(BackendError::Status {
                status: 500,
                body: message,
            });
        }

        let tables = self
            .tables
            .read()
            .map_err(|_| BackendError::HttpClient("memory store lock poisoned".into()))?;

        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches_filter(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(column) = &query.order {
            rows.sort_by(|a, b| compare_values(a.get(column), b.get(column)));
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        if !query.columns.is_empty() {
            rows = rows.into_iter().map(|row| project(&row, &query.columns)).collect();
        }

        Ok(rows)
    }
}

/// Text form of a scalar cell, as it appears in a query string.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn matches_filter(row: &Value, filter: &Filter) -> bool {
    let cell = row.get(filter.column());
    match filter {
        Filter::Eq { value, .. } => cell.and_then(cell_text).as_deref() == Some(value.as_str()),
        Filter::In { values, .. } => cell
            .and_then(cell_text)
            .is_some_and(|text| values.iter().any(|v| *v == text)),
        Filter::NotNull { .. } => cell.is_some_and(|v| !v.is_null()),
    }
}

/// Nulls sort last in ascending order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let (a, b) = (cell_text(a), cell_text(b));
            let numeric = |t: &Option<String>| t.as_deref().and_then(|s| s.parse::<f64>().ok());
            match (numeric(&a), numeric(&b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => a.cmp(&b),
            }
        }
    }
}

fn project(row: &Value, columns: &[String]) -> Value {
    let mut out = Map::new();
    for column in columns {
        out.insert(column.clone(), row.get(column).cloned().unwrap_or(Value::Null));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new().with_table(
            "appointments",
            vec![
                json!({"id": "p1", "region_id": "R1", "age": 34}),
                json!({"id": "p2", "region_id": "R1", "age": null}),
                json!({"id": "p3", "region_id": "R2", "age": 71}),
                json!({"id": "p4", "region_id": "R1", "age": "8"}),
            ],
        )
    }

    #[test]
    fn eq_filter_scopes_rows() {
        let rows = store()
            .select(&Query::table("appointments").eq("region_id", "R1"))
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn select_projects_columns() {
        let rows = store()
            .select(&Query::table("appointments").select(&["age"]).eq("region_id", "R2"))
            .unwrap();
        assert_eq!(rows, vec![json!({"age": 71})]);
    }

    #[test]
    fn in_and_not_null_filters() {
        let rows = store()
            .select(
                &Query::table("appointments")
                    .is_in("id", ["p1", "p2", "p3"])
                    .not_null("age"),
            )
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn order_and_limit() {
        let rows = store()
            .select(
                &Query::table("appointments")
                    .order("age")
                    .limit(3),
            )
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        // Numeric strings compare as numbers; nulls sort last.
        assert_eq!(ids, vec!["p4", "p1", "p3"]);
    }

    #[test]
    fn unknown_table_is_empty() {
        assert!(store().select(&Query::table("regions")).unwrap().is_empty());
    }

    #[test]
    fn failing_table_returns_status_error() {
        let store = store();
        store.fail_table("appointments", "boom");
        let err = store.select(&Query::table("appointments")).unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 500, .. }));
    }
}

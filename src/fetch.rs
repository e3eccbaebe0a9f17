//! Region-scoped data fetchers.
//!
//! Each fetcher issues one (or, for vaccinations, two) backend selects and
//! turns the raw rows into samples. Rows with missing or non-numeric values
//! are skipped, never raised. Fetchers block; async callers run them on
//! `spawn_blocking`.

use std::collections::HashMap;

use serde_json::Value;

use crate::backend::{Query, RecordStore};
use crate::error::FetchError;
use crate::models::{
    json_number, json_string_list, json_timestamp, BmiSample, ChronicDiseaseAnalysis, Region,
    RegionAnalysisRow, StoredPatientAnalysis, VaccinationSample,
};

pub const REGIONS: &str = "regions";
pub const APPOINTMENTS: &str = "appointments";
pub const HEALTH_RECORDS: &str = "patient_health_records";
pub const REGION_ANALYSIS: &str = "region_analysis";
pub const PATIENT_ANALYSIS: &str = "patient_analysis";

/// Vaccine list columns, concatenated in this order.
const VACCINE_COLUMNS: [&str; 4] = [
    "childhood_vaccines",
    "older_vaccines",
    "recent_vaccines",
    "vaccination_history",
];

const UNKNOWN_GENDER: &str = "unknown";

fn require_id<'a>(what: &str, id: &'a str) -> Result<&'a str, FetchError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(FetchError::validation(format!("{what} must not be empty")));
    }
    Ok(id)
}

pub fn fetch_regions(store: &dyn RecordStore) -> Result<Vec<Region>, FetchError> {
    let rows = store.select(
        &Query::table(REGIONS)
            .select(&["region_id", "name"])
            .order("name"),
    )?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<Region>(row) {
            Ok(region) => Some(region),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed region row");
                None
            }
        })
        .collect())
}

/// Ages of every appointment in the region.
pub fn fetch_ages(store: &dyn RecordStore, region_id: &str) -> Result<Vec<f64>, FetchError> {
    let region_id = require_id("Region id", region_id)?;
    let rows = store.select(
        &Query::table(APPOINTMENTS)
            .select(&["age"])
            .eq("region_id", region_id),
    )?;

    let ages: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.get("age").and_then(json_number))
        .collect();

    tracing::debug!(region_id, rows = rows.len(), ages = ages.len(), "Fetched ages");
    Ok(ages)
}

pub fn fetch_income_levels(
    store: &dyn RecordStore,
    region_id: &str,
) -> Result<Vec<String>, FetchError> {
    let region_id = require_id("Region id", region_id)?;
    let rows = store.select(
        &Query::table(HEALTH_RECORDS)
            .select(&["income_level"])
            .eq("region_id", region_id)
            .not_null("income_level"),
    )?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get("income_level").and_then(Value::as_str))
        .filter(|level| !level.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn fetch_bmi_samples(
    store: &dyn RecordStore,
    region_id: &str,
) -> Result<Vec<BmiSample>, FetchError> {
    let region_id = require_id("Region id", region_id)?;
    let rows = store.select(
        &Query::table(HEALTH_RECORDS)
            .select(&["bmi", "weight", "height", "created_at", "patient_id"])
            .eq("region_id", region_id)
            .not_null("bmi"),
    )?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let number = |col: &str| row.get(col).and_then(json_number);
            Some(BmiSample {
                bmi: number("bmi")?,
                weight: number("weight")?,
                height: number("height")?,
                recorded_at: json_timestamp(row.get("created_at")),
            })
        })
        .collect())
}

/// Health records joined with appointment ages.
///
/// Patients without an appointment age get age 0; records without a
/// gender are keyed `unknown`.
pub fn fetch_vaccination_samples(
    store: &dyn RecordStore,
    region_id: &str,
) -> Result<Vec<VaccinationSample>, FetchError> {
    let region_id = require_id("Region id", region_id)?;
    let mut columns = vec!["patient_id", "gender"];
    columns.extend(VACCINE_COLUMNS);
    let records = store.select(
        &Query::table(HEALTH_RECORDS)
            .select(&columns)
            .eq("region_id", region_id),
    )?;

    if records.is_empty() {
        return Ok(Vec::new());
    }

    let patient_ids: Vec<String> = records
        .iter()
        .filter_map(|row| row.get("patient_id"))
        .filter_map(cell_id)
        .collect();

    let ages: HashMap<String, f64> = if patient_ids.is_empty() {
        HashMap::new()
    } else {
        store
            .select(
                &Query::table(APPOINTMENTS)
                    .select(&["id", "age"])
                    .is_in("id", patient_ids),
            )?
            .iter()
            .filter_map(|row| {
                let id = row.get("id").and_then(cell_id)?;
                let age = row.get("age").and_then(json_number)?;
                Some((id, age))
            })
            .collect()
    };

    Ok(records
        .iter()
        .map(|row| {
            let age = row
                .get("patient_id")
                .and_then(cell_id)
                .and_then(|id| ages.get(&id).copied())
                .unwrap_or(0.0);
            let gender = row
                .get("gender")
                .and_then(Value::as_str)
                .filter(|g| !g.is_empty())
                .unwrap_or(UNKNOWN_GENDER)
                .to_string();
            let vaccines = VACCINE_COLUMNS
                .iter()
                .flat_map(|col| json_string_list(row.get(*col)))
                .collect();
            VaccinationSample {
                age,
                gender,
                vaccines,
            }
        })
        .collect())
}

/// Persisted chronic disease analysis for the region, if any.
///
/// A record whose `key_features` cannot be decoded is treated as absent.
pub fn fetch_existing_analysis(
    store: &dyn RecordStore,
    region_id: &str,
) -> Result<Option<ChronicDiseaseAnalysis>, FetchError> {
    let region_id = require_id("Region id", region_id)?;
    let rows = store.select(
        &Query::table(REGION_ANALYSIS)
            .select(&[
                "region_id",
                "health_metrics_analysis",
                "health_patterns_identified",
                "healthcare_recommendations",
                "health_indicators_relationships",
                "total_records",
                "key_features",
            ])
            .eq("region_id", region_id)
            .limit(1),
    )?;

    let Some(row) = rows.into_iter().next() else {
        return Ok(None);
    };

    let row: RegionAnalysisRow = match serde_json::from_value(row) {
        Ok(row) => row,
        Err(e) => {
            tracing::warn!(region_id, error = %e, "Unreadable region analysis row");
            return Ok(None);
        }
    };

    match ChronicDiseaseAnalysis::try_from(row) {
        Ok(analysis) => Ok(Some(analysis)),
        Err(e) => {
            tracing::warn!(region_id, error = %e, "Malformed key_features in region analysis");
            Ok(None)
        }
    }
}

/// Persisted analysis for one patient visit, passed through untouched.
pub fn fetch_patient_analysis(
    store: &dyn RecordStore,
    visit_patient_id: &str,
) -> Result<Option<Value>, FetchError> {
    let visit_patient_id = require_id("Patient id", visit_patient_id)?;
    let rows = store.select(
        &Query::table(PATIENT_ANALYSIS)
            .select(&["analysis"])
            .eq("visit_patient_id", visit_patient_id)
            .limit(1),
    )?;

    let Some(row) = rows.into_iter().next() else {
        return Ok(None);
    };

    match serde_json::from_value::<StoredPatientAnalysis>(row) {
        Ok(stored) if stored.analysis.is_null() => Ok(None),
        Ok(stored) => Ok(Some(stored.analysis)),
        Err(e) => {
            tracing::warn!(visit_patient_id, error = %e, "Unreadable patient analysis row");
            Ok(None)
        }
    }
}

/// Id cell as text; ids arrive as strings or integers.
fn cell_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

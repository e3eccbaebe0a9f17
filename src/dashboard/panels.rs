//! Per-metric panel loaders: fetch, aggregate, chart.
//!
//! Loaders block on the backend. An error is returned as-is so the caller
//! decides whether it becomes an inline panel error or an HTTP status.

use crate::analytics::{aggregate_ages, aggregate_bmi, aggregate_income, aggregate_vaccinations};
use crate::backend::RecordStore;
use crate::charts;
use crate::error::FetchError;
use crate::fetch;
use crate::models::Metric;

use super::state::{AgePanel, BmiPanel, IncomePanel, PanelState, PanelView, VaccinationPanel};

pub const NO_BMI_DATA: &str = "No BMI Data Available";
pub const NO_VACCINATION_DATA: &str = "No Vaccination Data Available";
pub const NO_CHRONIC_ANALYSIS: &str = "No chronic disease analysis available for this region";

pub fn age_panel(store: &dyn RecordStore, region_id: &str) -> Result<PanelState, FetchError> {
    let distribution = aggregate_ages(&fetch::fetch_ages(store, region_id)?);
    Ok(PanelState::success(PanelView::Age(AgePanel {
        summary: distribution.summary.rounded(),
        probability_chart: charts::age_probability_chart(&distribution),
        frequency_chart: charts::age_frequency_chart(&distribution),
        distribution,
    })))
}

pub fn income_panel(store: &dyn RecordStore, region_id: &str) -> Result<PanelState, FetchError> {
    let distribution = aggregate_income(&fetch::fetch_income_levels(store, region_id)?);
    if distribution.unclassified > 0 {
        tracing::debug!(
            region_id,
            unclassified = distribution.unclassified,
            "Income values outside known brackets"
        );
    }
    Ok(PanelState::success(PanelView::Income(IncomePanel {
        chart: charts::income_pie(&distribution),
        distribution,
    })))
}

pub fn bmi_panel(store: &dyn RecordStore, region_id: &str) -> Result<PanelState, FetchError> {
    let samples = fetch::fetch_bmi_samples(store, region_id)?;
    let Some(analysis) = aggregate_bmi(&samples) else {
        return Ok(PanelState::empty(NO_BMI_DATA));
    };
    Ok(PanelState::success(PanelView::Bmi(BmiPanel {
        histogram: charts::bmi_histogram(&analysis),
        scatter: charts::bmi_scatter(&analysis),
        pie: charts::bmi_pie(&analysis),
        analysis,
    })))
}

pub fn vaccination_panel(store: &dyn RecordStore, region_id: &str) -> Result<PanelState, FetchError> {
    let samples = fetch::fetch_vaccination_samples(store, region_id)?;
    let Some(analysis) = aggregate_vaccinations(&samples) else {
        return Ok(PanelState::empty(NO_VACCINATION_DATA));
    };
    Ok(PanelState::success(PanelView::Vaccination(VaccinationPanel {
        age_chart: charts::vaccination_age_chart(&analysis),
        vaccine_chart: charts::vaccine_type_chart(&analysis),
        gender_chart: charts::vaccination_gender_pie(&analysis),
        analysis,
    })))
}

/// Persisted chronic disease report; never triggers generation.
pub fn chronic_panel(store: &dyn RecordStore, region_id: &str) -> Result<PanelState, FetchError> {
    Ok(match fetch::fetch_existing_analysis(store, region_id)? {
        Some(analysis) => PanelState::success(PanelView::ChronicDisease(analysis)),
        None => PanelState::empty(NO_CHRONIC_ANALYSIS),
    })
}

pub fn load_panel(
    store: &dyn RecordStore,
    metric: Metric,
    region_id: &str,
) -> Result<PanelState, FetchError> {
    match metric {
        Metric::Age => age_panel(store, region_id),
        Metric::Income => income_panel(store, region_id),
        Metric::Bmi => bmi_panel(store, region_id),
        Metric::Vaccination => vaccination_panel(store, region_id),
        Metric::ChronicDisease => chronic_panel(store, region_id),
    }
}

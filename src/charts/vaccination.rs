use serde_json::{json, Value};

use super::{axis, ChartConfig, ChartKind, Colors, Dataset, Series};
use crate::analytics::{Tally, VaccinationAnalysis};

const PRIMARY: &str = "#4BC0C0";
const PALETTE: [&str; 6] = ["#4BC0C0", "#FF6384", "#FFCE56", "#CCCCCC", "#36A2EB", "#9966FF"];

fn percents(tallies: &[Tally]) -> Series {
    Series::Values(tallies.iter().map(|t| t.percent).collect())
}

fn counts(tallies: &[Tally]) -> Vec<u64> {
    tallies.iter().map(|t| t.count).collect()
}

fn tally_labels(tallies: &[Tally]) -> Vec<String> {
    tallies.iter().map(|t| t.label.clone()).collect()
}

fn palette(n: usize) -> Colors {
    Colors::each((0..n).map(|i| PALETTE[i % PALETTE.len()]))
}

fn percent_scales(x_title: &str) -> Value {
    json!({
        "x": axis(x_title),
        "y": { "min": 0, "max": 100, "title": { "display": true, "text": "Percentage of Vaccinations" } }
    })
}

/// Share of patients per age band, in percent.
pub fn vaccination_age_chart(analysis: &VaccinationAnalysis) -> ChartConfig {
    let dataset = Dataset::new(percents(&analysis.age_bands), Colors::one(&format!("{PRIMARY}40")))
        .label("Vaccination Rates by Age")
        .border(Colors::one(PRIMARY), 3)
        .area()
        .raw_counts(counts(&analysis.age_bands));

    ChartConfig::new(
        ChartKind::Line,
        "Age-Specific Vaccination Trends",
        tally_labels(&analysis.age_bands),
        vec![dataset],
    )
    .with_options(json!({ "scales": percent_scales("Age Groups") }))
}

/// Share of recognized doses per vaccine type, in percent.
pub fn vaccine_type_chart(analysis: &VaccinationAnalysis) -> ChartConfig {
    let dataset = Dataset::new(
        percents(&analysis.vaccine_types),
        palette(analysis.vaccine_types.len()),
    )
    .label("Vaccination Distribution")
    .border(Colors::one("#fff"), 1)
    .raw_counts(counts(&analysis.vaccine_types));

    ChartConfig::new(
        ChartKind::Bar,
        "Vaccine Type Distribution",
        tally_labels(&analysis.vaccine_types),
        vec![dataset],
    )
    .with_options(json!({
        "plugins": { "legend": { "display": false } },
        "scales": percent_scales("Vaccine Types")
    }))
}

/// Patients per gender, in raw counts.
pub fn vaccination_gender_pie(analysis: &VaccinationAnalysis) -> ChartConfig {
    let data = analysis.genders.iter().map(|t| t.count as f64).collect();
    let dataset = Dataset::new(Series::Values(data), palette(analysis.genders.len()))
        .border(Colors::one("#fff"), 1)
        .raw_counts(counts(&analysis.genders));

    ChartConfig::new(
        ChartKind::Pie,
        "Gender Distribution",
        tally_labels(&analysis.genders),
        vec![dataset],
    )
    .with_options(json!({
        "plugins": { "legend": { "position": "bottom" } }
    }))
}

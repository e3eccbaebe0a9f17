use serde_json::json;

use super::{ChartConfig, ChartKind, Colors, Dataset, Series};
use crate::analytics::IncomeDistribution;
use crate::models::IncomeBracket;

const FILLS: [&str; 3] = [
    "rgba(255, 99, 132, 0.6)",
    "rgba(54, 162, 235, 0.6)",
    "rgba(75, 192, 192, 0.6)",
];
const BORDERS: [&str; 3] = [
    "rgba(255, 99, 132, 1)",
    "rgba(54, 162, 235, 1)",
    "rgba(75, 192, 192, 1)",
];

/// Low/middle/high pie. Unclassified values are not plotted.
pub fn income_pie(dist: &IncomeDistribution) -> ChartConfig {
    let counts = dist.counts();
    let dataset = Dataset::new(
        Series::Values(counts.iter().map(|&c| c as f64).collect()),
        Colors::each(FILLS),
    )
    .border(Colors::each(BORDERS), 1)
    .raw_counts(counts.to_vec());

    ChartConfig::new(
        ChartKind::Pie,
        "Income Distribution",
        IncomeBracket::ALL.iter().map(|b| b.label().to_string()).collect(),
        vec![dataset],
    )
    .with_options(json!({
        "plugins": { "legend": { "position": "bottom", "labels": { "padding": 20 } } }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate_income;

    #[test]
    fn pie_has_three_labelled_slices() {
        let chart = income_pie(&aggregate_income(&["low", "HIGH", "high", "other"]));
        assert_eq!(chart.kind, ChartKind::Pie);
        assert_eq!(chart.data.labels, vec!["Low Income", "Middle Income", "High Income"]);
        let ds = chart.dataset(0).unwrap();
        assert_eq!(ds.data.values().unwrap(), &[1.0, 0.0, 2.0]);
        assert_eq!(
            ds.background_color,
            Colors::each(["rgba(255, 99, 132, 0.6)", "rgba(54, 162, 235, 0.6)", "rgba(75, 192, 192, 0.6)"])
        );
    }
}

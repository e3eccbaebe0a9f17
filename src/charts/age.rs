use serde_json::json;

use super::{axis, labels, ChartConfig, ChartKind, Colors, Dataset, Series};
use crate::analytics::{AgeDistribution, AGE_DECILE_LABELS};

const LINE: &str = "rgba(75, 192, 192, 1)";
const FILL: &str = "rgba(75, 192, 192, 0.2)";

/// Decade probabilities as a filled line; y is fixed to `[0, 1]`.
pub fn age_probability_chart(dist: &AgeDistribution) -> ChartConfig {
    let dataset = Dataset::new(Series::Values(dist.deciles.to_vec()), Colors::one(FILL))
        .label("Probability Distribution")
        .border(Colors::one(LINE), 2)
        .area()
        .raw_counts(dist.decile_counts.to_vec());

    ChartConfig::new(
        ChartKind::Line,
        "Age Distribution",
        labels(AGE_DECILE_LABELS),
        vec![dataset],
    )
    .with_options(json!({
        "plugins": { "legend": { "display": false } },
        "scales": {
            "x": axis("Age Groups"),
            "y": { "min": 0, "max": 1, "beginAtZero": true, "title": { "display": true, "text": "Probability" } }
        }
    }))
}

/// Patients per integer age 0..=100.
pub fn age_frequency_chart(dist: &AgeDistribution) -> ChartConfig {
    let data: Vec<f64> = dist.frequency.iter().map(|&c| c as f64).collect();
    let dataset = Dataset::new(Series::Values(data), Colors::one(FILL))
        .label("Patients")
        .border(Colors::one(LINE), 1)
        .area();

    ChartConfig::new(
        ChartKind::Line,
        "Age Frequency",
        (0..dist.frequency.len()).map(|age| age.to_string()).collect(),
        vec![dataset],
    )
    .with_options(json!({
        "plugins": { "legend": { "display": false } },
        "scales": {
            "x": axis("Age"),
            "y": { "beginAtZero": true, "title": { "display": true, "text": "Patients" } }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate_ages;

    #[test]
    fn probability_chart_has_ten_points_and_unit_axis() {
        let chart = age_probability_chart(&aggregate_ages(&[5.0, 15.0, 25.0, 95.0, 95.0]));
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.data.labels.len(), 10);
        assert_eq!(chart.data.labels[9], "90+");
        let values = chart.dataset(0).unwrap().data.values().unwrap();
        assert_eq!(values[9], 0.4);
        assert_eq!(chart.options["scales"]["y"]["max"], 1);
        assert_eq!(chart.options["scales"]["x"]["title"]["text"], "Age Groups");
        assert_eq!(chart.options["scales"]["y"]["title"]["text"], "Probability");
        assert_eq!(chart.dataset(0).unwrap().raw_counts.as_deref(), Some(&[1, 1, 1, 0, 0, 0, 0, 0, 0, 2][..]));
    }

    #[test]
    fn empty_distribution_charts_zeros() {
        let chart = age_probability_chart(&aggregate_ages(&[]));
        let values = chart.dataset(0).unwrap().data.values().unwrap();
        assert!(values.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn frequency_chart_spans_zero_to_hundred() {
        let chart = age_frequency_chart(&aggregate_ages(&[42.0, 42.9]));
        assert_eq!(chart.data.labels.len(), 101);
        assert_eq!(chart.data.labels[100], "100");
        assert_eq!(chart.dataset(0).unwrap().data.values().unwrap()[42], 2.0);
    }
}

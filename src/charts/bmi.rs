use serde_json::json;

use super::{axis, ChartConfig, ChartKind, Colors, Dataset, Point, Series};
use crate::analytics::BmiAnalysis;
use crate::models::BmiCategory;

fn category_colors() -> Colors {
    Colors::each(BmiCategory::ALL.iter().map(|c| c.color()))
}

fn count_series(analysis: &BmiAnalysis) -> Series {
    Series::Values(analysis.counts.as_array().iter().map(|&c| c as f64).collect())
}

pub fn bmi_histogram(analysis: &BmiAnalysis) -> ChartConfig {
    let dataset = Dataset::new(count_series(analysis), category_colors())
        .label("Number of Patients")
        .border(Colors::one("#fff"), 1);

    ChartConfig::new(
        ChartKind::Bar,
        "BMI Distribution",
        BmiCategory::ALL.iter().map(|c| c.range_label().to_string()).collect(),
        vec![dataset],
    )
    .with_options(json!({
        "plugins": { "legend": { "display": false } },
        "scales": {
            "x": axis("BMI Category"),
            "y": { "beginAtZero": true, "title": { "display": true, "text": "Number of Patients" } }
        }
    }))
}

/// Height against weight, one colour per point by category. Uses the
/// already downsampled points from the analysis.
pub fn bmi_scatter(analysis: &BmiAnalysis) -> ChartConfig {
    let points = analysis
        .scatter
        .iter()
        .map(|p| Point {
            x: p.x,
            y: p.y,
            bmi: Some(p.bmi),
        })
        .collect();
    let colors = Colors::each(analysis.scatter.iter().map(|p| p.category.color()));
    let dataset = Dataset::new(Series::Points(points), colors).label("Patients");

    ChartConfig::new(ChartKind::Scatter, "Weight vs Height", Vec::new(), vec![dataset]).with_options(
        json!({
            "elements": { "point": { "radius": 3, "hoverRadius": 5 } },
            "scales": { "x": axis("Height"), "y": axis("Weight") }
        }),
    )
}

pub fn bmi_pie(analysis: &BmiAnalysis) -> ChartConfig {
    let dataset = Dataset::new(count_series(analysis), category_colors())
        .border(Colors::one("#fff"), 2)
        .raw_counts(analysis.counts.as_array().to_vec());

    ChartConfig::new(
        ChartKind::Pie,
        "BMI Categories",
        BmiCategory::ALL.iter().map(|c| c.label().to_string()).collect(),
        vec![dataset],
    )
    .with_options(json!({
        "plugins": { "legend": { "position": "bottom" } }
    }))
}

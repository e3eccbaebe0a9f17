//! Chart adapters: aggregated distributions in, Chart.js-shaped JSON out.
//!
//! A `ChartConfig` serializes as `{type, title, data: {labels, datasets},
//! options}` so the dashboard can hand it to the chart library untouched.

pub mod age;
pub mod bmi;
pub mod income;
pub mod vaccination;

pub use age::{age_frequency_chart, age_probability_chart};
pub use bmi::{bmi_histogram, bmi_pie, bmi_scatter};
pub use income::income_pie;
pub use vaccination::{vaccination_age_chart, vaccination_gender_pie, vaccine_type_chart};

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Scatter,
}

/// One colour for the whole dataset, or one per data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Colors {
    One(String),
    Each(Vec<String>),
}

impl Colors {
    pub fn one(color: &str) -> Self {
        Self::One(color.to_string())
    }

    pub fn each<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Each(colors.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    Values(Vec<f64>),
    Points(Vec<Point>),
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Points(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Self::Values(v) => Some(v),
            Self::Points(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Series,
    pub background_color: Colors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Colors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    /// Counts behind percentage data, for tooltips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_counts: Option<Vec<u64>>,
}

impl Dataset {
    pub fn new(data: Series, background_color: Colors) -> Self {
        Self {
            label: None,
            data,
            background_color,
            border_color: None,
            border_width: None,
            fill: None,
            tension: None,
            raw_counts: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn border(mut self, color: Colors, width: u32) -> Self {
        self.border_color = Some(color);
        self.border_width = Some(width);
        self
    }

    /// Filled, smoothed line.
    pub fn area(mut self) -> Self {
        self.fill = Some(true);
        self.tension = Some(0.4);
        self
    }

    pub fn raw_counts(mut self, counts: Vec<u64>) -> Self {
        self.raw_counts = Some(counts);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub data: ChartData,
    pub options: Value,
}

impl ChartConfig {
    pub fn new(kind: ChartKind, title: &str, labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            data: ChartData { labels, datasets },
            options: base_options(),
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        merge(&mut self.options, options);
        self
    }

    pub fn dataset(&self, index: usize) -> Option<&Dataset> {
        self.data.datasets.get(index)
    }
}

fn base_options() -> Value {
    serde_json::json!({
        "responsive": true,
        "maintainAspectRatio": false,
    })
}

/// Deep-merge `patch` into `target`; objects merge key by key, everything
/// else is replaced.
fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(t), Value::Object(p)) => {
            for (k, v) in p {
                merge(t.entry(k).or_insert(Value::Null), v);
            }
        }
        (t, p) => *t = p,
    }
}

/// Titled linear axis helper used by the line and bar adapters.
pub(crate) fn axis(title: &str) -> Value {
    serde_json::json!({
        "title": { "display": true, "text": title }
    })
}

pub(crate) fn labels<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_chartjs_shape() {
        let chart = ChartConfig::new(
            ChartKind::Pie,
            "Income",
            labels(["A", "B"]),
            vec![Dataset::new(Series::Values(vec![1.0, 2.0]), Colors::each(["#000", "#fff"]))
                .raw_counts(vec![1, 2])],
        );
        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["type"], "pie");
        assert_eq!(value["data"]["labels"], json!(["A", "B"]));
        assert_eq!(value["data"]["datasets"][0]["data"], json!([1.0, 2.0]));
        assert_eq!(value["data"]["datasets"][0]["backgroundColor"], json!(["#000", "#fff"]));
        assert_eq!(value["data"]["datasets"][0]["rawCounts"], json!([1, 2]));
        assert!(value["data"]["datasets"][0].get("tension").is_none());
        assert_eq!(value["options"]["responsive"], true);
    }

    #[test]
    fn options_merge_deeply() {
        let chart = ChartConfig::new(ChartKind::Bar, "t", vec![], vec![])
            .with_options(json!({"plugins": {"legend": {"display": false}}}))
            .with_options(json!({"plugins": {"title": {"text": "x"}}, "responsive": false}));
        assert_eq!(chart.options["plugins"]["legend"]["display"], false);
        assert_eq!(chart.options["plugins"]["title"]["text"], "x");
        assert_eq!(chart.options["responsive"], false);
        assert_eq!(chart.options["maintainAspectRatio"], false);
    }

    #[test]
    fn points_serialize_without_missing_bmi() {
        let series = Series::Points(vec![Point { x: 1.7, y: 60.0, bmi: None }]);
        assert_eq!(serde_json::to_value(&series).unwrap(), json!([{"x": 1.7, "y": 60.0}]));
        assert!(series.values().is_none());
        assert_eq!(series.len(), 1);
    }
}

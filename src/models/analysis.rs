use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const METRICS_TITLE: &str = "Health Metrics Analysis";
pub const RELATIONSHIPS_TITLE: &str = "Health Indicators Relationships";
pub const PATTERNS_TITLE: &str = "Health Patterns Identified";
pub const RECOMMENDATIONS_TITLE: &str = "Healthcare Recommendations";

/// One free-text section of a chronic disease report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl AnalysisSection {
    pub fn new(title: &str, content: Option<String>) -> Self {
        Self {
            title: title.to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub metrics: AnalysisSection,
    pub relationships: AnalysisSection,
    pub patterns: AnalysisSection,
    pub recommendations: AnalysisSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStatistics {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub features: Vec<Value>,
    #[serde(default)]
    pub risk_scores: Value,
}

/// Externally generated regional report. Rendered as-is, never computed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronicDiseaseAnalysis {
    pub analysis_sections: AnalysisSections,
    pub statistics: AnalysisStatistics,
}

/// Persisted form of a regional report (`region_analysis` table).
#[derive(Debug, Clone, Deserialize)]
pub struct RegionAnalysisRow {
    pub region_id: String,
    #[serde(default)]
    pub health_metrics_analysis: Option<String>,
    #[serde(default)]
    pub health_patterns_identified: Option<String>,
    #[serde(default)]
    pub healthcare_recommendations: Option<String>,
    #[serde(default)]
    pub health_indicators_relationships: Option<String>,
    #[serde(default)]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub key_features: Option<String>,
}

impl TryFrom<RegionAnalysisRow> for ChronicDiseaseAnalysis {
    type Error = serde_json::Error;

    /// `key_features` is stored as a JSON-encoded list; a missing value is
    /// an empty list, a malformed one is an error.
    fn try_from(row: RegionAnalysisRow) -> Result<Self, Self::Error> {
        let features: Vec<Value> = match row.key_features.as_deref() {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)?,
            _ => Vec::new(),
        };

        Ok(Self {
            analysis_sections: AnalysisSections {
                metrics: AnalysisSection::new(METRICS_TITLE, row.health_metrics_analysis),
                relationships: AnalysisSection::new(
                    RELATIONSHIPS_TITLE,
                    row.health_indicators_relationships,
                ),
                patterns: AnalysisSection::new(PATTERNS_TITLE, row.health_patterns_identified),
                recommendations: AnalysisSection::new(
                    RECOMMENDATIONS_TITLE,
                    row.healthcare_recommendations,
                ),
            },
            statistics: AnalysisStatistics {
                total_records: row.total_records.unwrap_or(0),
                features,
                risk_scores: Value::Object(Default::default()),
            },
        })
    }
}

/// Per-patient report returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAnalysis {
    #[serde(default)]
    pub initial_analysis: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
}

/// Persisted per-patient report (`patient_analysis` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPatientAnalysis {
    #[serde(default)]
    pub analysis: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(key_features: Option<&str>) -> RegionAnalysisRow {
        RegionAnalysisRow {
            region_id: "R1".into(),
            health_metrics_analysis: Some("metrics".into()),
            health_patterns_identified: Some("patterns".into()),
            healthcare_recommendations: Some("recs".into()),
            health_indicators_relationships: None,
            total_records: Some(120),
            key_features: key_features.map(str::to_string),
        }
    }

    #[test]
    fn row_maps_to_four_titled_sections() {
        let analysis = ChronicDiseaseAnalysis::try_from(row(Some(r#"["bmi","systolic_bp"]"#))).unwrap();
        let sections = &analysis.analysis_sections;
        assert_eq!(sections.metrics.title, METRICS_TITLE);
        assert_eq!(sections.metrics.content.as_deref(), Some("metrics"));
        assert_eq!(sections.relationships.title, RELATIONSHIPS_TITLE);
        assert!(sections.relationships.content.is_none());
        assert_eq!(sections.patterns.content.as_deref(), Some("patterns"));
        assert_eq!(sections.recommendations.content.as_deref(), Some("recs"));
        assert_eq!(analysis.statistics.total_records, 120);
        assert_eq!(analysis.statistics.features, vec![json!("bmi"), json!("systolic_bp")]);
        assert_eq!(analysis.statistics.risk_scores, json!({}));
    }

    #[test]
    fn missing_features_is_empty_list() {
        let analysis = ChronicDiseaseAnalysis::try_from(row(None)).unwrap();
        assert!(analysis.statistics.features.is_empty());
    }

    #[test]
    fn malformed_features_is_error() {
        assert!(ChronicDiseaseAnalysis::try_from(row(Some("[bmi"))).is_err());
    }

    #[test]
    fn service_payload_deserializes() {
        let payload = json!({
            "analysis_sections": {
                "metrics": {"title": METRICS_TITLE, "content": "a"},
                "relationships": {"title": RELATIONSHIPS_TITLE, "content": "b"},
                "patterns": {"title": PATTERNS_TITLE, "content": "c"},
                "recommendations": {"title": RECOMMENDATIONS_TITLE, "content": null}
            },
            "statistics": {
                "total_records": 42,
                "features": ["age"],
                "risk_scores": {"cardiovascular": {"mean": 0.1}}
            }
        });
        let analysis: ChronicDiseaseAnalysis = serde_json::from_value(payload).unwrap();
        assert_eq!(analysis.statistics.total_records, 42);
        assert!(analysis.analysis_sections.recommendations.content.is_none());
        assert_eq!(analysis.statistics.risk_scores["cardiovascular"]["mean"], 0.1);
    }
}

use serde::Serialize;

use crate::models::{BmiCategory, BmiSample};

/// Scatter plots above this size are downsampled.
pub const MAX_SCATTER_POINTS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BmiCounts {
    pub underweight: u64,
    pub normal: u64,
    pub overweight: u64,
    pub obese: u64,
}

impl BmiCounts {
    /// Counts in `BmiCategory::ALL` order.
    pub fn as_array(&self) -> [u64; 4] {
        [self.underweight, self.normal, self.overweight, self.obese]
    }

    pub fn get(&self, category: BmiCategory) -> u64 {
        self.as_array()[category.index()]
    }

    fn add(&mut self, category: BmiCategory) {
        match category {
            BmiCategory::Underweight => self.underweight += 1,
            BmiCategory::Normal => self.normal += 1,
            BmiCategory::Overweight => self.overweight += 1,
            BmiCategory::Obese => self.obese += 1,
        }
    }
}

/// Height (x) against weight (y) for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub bmi: f64,
    pub category: BmiCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiAnalysis {
    pub total: u64,
    /// Counts over the full, unsampled input.
    pub counts: BmiCounts,
    pub scatter: Vec<ScatterPoint>,
    /// Every `sample_stride`-th record is plotted; 1 means all of them.
    pub sample_stride: usize,
}

/// Stride for deterministic downsampling: `ceil(n / 5000)` above the cap.
pub fn scatter_stride(len: usize) -> usize {
    if len > MAX_SCATTER_POINTS {
        len.div_ceil(MAX_SCATTER_POINTS)
    } else {
        1
    }
}

/// Classify every sample and build the scatter dataset.
///
/// Returns `None` for an empty input so callers render an explicit empty
/// state instead of zeroed charts.
pub fn aggregate_bmi(samples: &[BmiSample]) -> Option<BmiAnalysis> {
    if samples.is_empty() {
        return None;
    }

    let mut counts = BmiCounts::default();
    for sample in samples {
        counts.add(BmiCategory::classify(sample.bmi));
    }

    let stride = scatter_stride(samples.len());
    let scatter: Vec<ScatterPoint> = samples
        .iter()
        .step_by(stride)
        .map(|s| ScatterPoint {
            x: s.height,
            y: s.weight,
            bmi: s.bmi,
            category: BmiCategory::classify(s.bmi),
        })
        .collect();

    if stride > 1 {
        tracing::debug!(
            records = samples.len(),
            stride,
            points = scatter.len(),
            "Downsampled BMI scatter"
        );
    }

    Some(BmiAnalysis {
        total: samples.len() as u64,
        counts,
        scatter,
        sample_stride: stride,
    })
}

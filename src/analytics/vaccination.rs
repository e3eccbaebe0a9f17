use std::collections::BTreeMap;

use serde::Serialize;

use super::percent;
use crate::models::{VaccinationAgeBand, VaccinationSample, VaccineType};

/// One bucket of a categorical breakdown: raw count plus its share of the
/// breakdown's own total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tally {
    pub key: String,
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaccinationAnalysis {
    pub patients: u64,
    /// Vaccine doses per canonical type, in `VaccineType::ALL` order.
    pub vaccine_types: Vec<Tally>,
    /// Vaccine strings that matched no canonical type.
    pub unclassified_vaccines: u64,
    /// Patients per age band, in `VaccinationAgeBand::ALL` order.
    pub age_bands: Vec<Tally>,
    /// Patients per lower-cased gender, sorted by key.
    pub genders: Vec<Tally>,
}

impl VaccinationAnalysis {
    pub fn vaccine_total(&self) -> u64 {
        self.vaccine_types.iter().map(|t| t.count).sum()
    }

    pub fn vaccine_count(&self, vaccine: VaccineType) -> u64 {
        self.vaccine_types
            .iter()
            .find(|t| t.key == vaccine.as_str())
            .map(|t| t.count)
            .unwrap_or(0)
    }

    pub fn age_band_count(&self, band: VaccinationAgeBand) -> u64 {
        self.age_bands
            .iter()
            .find(|t| t.key == band.as_str())
            .map(|t| t.count)
            .unwrap_or(0)
    }
}

fn tallies<I>(entries: I) -> Vec<Tally>
where
    I: IntoIterator<Item = (String, String, u64)>,
{
    let entries: Vec<(String, String, u64)> = entries.into_iter().collect();
    let total: u64 = entries.iter().map(|(_, _, c)| c).sum();
    entries
        .into_iter()
        .map(|(key, label, count)| Tally {
            key,
            label,
            count,
            percent: percent(count, total),
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Break vaccination records down by vaccine type, age band and gender.
///
/// Returns `None` for an empty input so callers render an explicit empty
/// state.
pub fn aggregate_vaccinations(samples: &[VaccinationSample]) -> Option<VaccinationAnalysis> {
    if samples.is_empty() {
        return None;
    }

    let mut vaccine_counts = [0u64; 5];
    let mut unclassified = 0u64;
    let mut band_counts = [0u64; 4];
    let mut genders: BTreeMap<String, u64> = BTreeMap::new();

    for sample in samples {
        for raw in &sample.vaccines {
            match VaccineType::canonicalize(raw) {
                Some(vaccine) => {
                    if let Some(i) = VaccineType::ALL.iter().position(|v| *v == vaccine) {
                        vaccine_counts[i] += 1;
                    }
                }
                None => unclassified += 1,
            }
        }

        let band = VaccinationAgeBand::of(sample.age);
        if let Some(i) = VaccinationAgeBand::ALL.iter().position(|b| *b == band) {
            band_counts[i] += 1;
        }

        *genders.entry(sample.gender.to_lowercase()).or_insert(0) += 1;
    }

    Some(VaccinationAnalysis {
        patients: samples.len() as u64,
        vaccine_types: tallies(VaccineType::ALL.iter().zip(vaccine_counts).map(|(v, c)| {
            (v.as_str().to_string(), v.label().to_string(), c)
        })),
        unclassified_vaccines: unclassified,
        age_bands: tallies(VaccinationAgeBand::ALL.iter().zip(band_counts).map(|(b, c)| {
            (b.as_str().to_string(), b.as_str().to_string(), c)
        })),
        genders: tallies(genders.into_iter().map(|(g, c)| {
            let label = capitalize(&g);
            (g, label, c)
        })),
    })
}

//! Pure aggregation functions: raw region-scoped samples in, categorical
//! distributions out. Nothing here performs I/O or keeps state between
//! calls; every distribution is recomputed from the full input.

pub mod age;
pub mod bmi;
pub mod income;
pub mod vaccination;

pub use age::{aggregate_ages, AgeDistribution, AgeSummary, AGE_DECILE_LABELS};
pub use bmi::{aggregate_bmi, scatter_stride, BmiAnalysis, BmiCounts, ScatterPoint, MAX_SCATTER_POINTS};
pub use income::{aggregate_income, IncomeDistribution};
pub use vaccination::{aggregate_vaccinations, Tally, VaccinationAnalysis};

/// `count / total`, or 0 when `total` is 0.
pub(crate) fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// `count / total * 100`, or 0 when `total` is 0.
pub(crate) fn percent(count: u64, total: u64) -> f64 {
    ratio(count, total) * 100.0
}

/// Round to one decimal place for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero_total() {
        assert_eq!(ratio(3, 0), 0.0);
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn round1_rounds_half_away_from_zero() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.66), 66.7);
        assert_eq!(round1(0.05), 0.1);
    }
}

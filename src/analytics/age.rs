use serde::Serialize;

use super::{percent, ratio, round1};

/// Decade labels for the ten age buckets; the last bucket is open-ended.
pub const AGE_DECILE_LABELS: [&str; 10] = [
    "0-9", "10-19", "20-29", "30-39", "40-49", "50-59", "60-69", "70-79", "80-89", "90+",
];

/// Highest integer age tracked by the frequency histogram.
pub const FREQUENCY_MAX_AGE: usize = 100;

const OPEN_DECILE_FROM: f64 = 90.0;
const WORKING_AGE_FROM: f64 = 15.0;
const ELDERLY_FROM: f64 = 65.0;

/// Share of the population per life stage, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AgeSummary {
    /// age < 15
    pub children: f64,
    /// 15 <= age < 65
    pub working_age: f64,
    /// age >= 65
    pub elderly: f64,
}

impl AgeSummary {
    /// One-decimal rendering of the three percentages.
    pub fn rounded(&self) -> Self {
        Self {
            children: round1(self.children),
            working_age: round1(self.working_age),
            elderly: round1(self.elderly),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeDistribution {
    /// Valid samples (finite and non-negative).
    pub total: u64,
    /// Samples excluded as invalid.
    pub rejected: u64,
    pub decile_counts: [u64; 10],
    /// Probability per decade bucket; sums to 1 when `total > 0`.
    pub deciles: [f64; 10],
    /// Count per integer age 0..=100. Older ages are not tracked here.
    pub frequency: Vec<u64>,
    pub summary: AgeSummary,
}

impl AgeDistribution {
    fn empty() -> Self {
        Self {
            total: 0,
            rejected: 0,
            decile_counts: [0; 10],
            deciles: [0.0; 10],
            frequency: vec![0; FREQUENCY_MAX_AGE + 1],
            summary: AgeSummary::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Bucket index for a valid age. Ages of 90 and above always land in the
/// last bucket regardless of magnitude.
pub fn decile_index(age: f64) -> usize {
    if age >= OPEN_DECILE_FROM {
        AGE_DECILE_LABELS.len() - 1
    } else {
        (age / 10.0).floor() as usize
    }
}

/// Aggregate a region's ages into decade probabilities, a per-year
/// frequency histogram and life-stage percentages.
///
/// Negative and non-finite values are not ages; they are counted in
/// `rejected` and take no part in any bucket or denominator.
pub fn aggregate_ages(ages: &[f64]) -> AgeDistribution {
    let mut dist = AgeDistribution::empty();
    let (mut children, mut working, mut elderly) = (0u64, 0u64, 0u64);

    for &age in ages {
        if !age.is_finite() || age < 0.0 {
            dist.rejected += 1;
            continue;
        }
        dist.total += 1;
        dist.decile_counts[decile_index(age)] += 1;

        let year = age.floor() as usize;
        if year <= FREQUENCY_MAX_AGE {
            dist.frequency[year] += 1;
        }

        if age < WORKING_AGE_FROM {
            children += 1;
        } else if age < ELDERLY_FROM {
            working += 1;
        } else {
            elderly += 1;
        }
    }

    if dist.rejected > 0 {
        tracing::debug!(rejected = dist.rejected, "Ignored invalid age samples");
    }

    for (p, &count) in dist.deciles.iter_mut().zip(dist.decile_counts.iter()) {
        *p = ratio(count, dist.total);
    }
    dist.summary = AgeSummary {
        children: percent(children, dist.total),
        working_age: percent(working, dist.total),
        elderly: percent(elderly, dist.total),
    };

    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn empty_input_is_all_zero() {
        let dist = aggregate_ages(&[]);
        assert!(dist.is_empty());
        assert!(dist.deciles.iter().all(|p| *p == 0.0));
        assert!(dist.deciles.iter().all(|p| !p.is_nan()));
        assert_eq!(dist.frequency.len(), 101);
        assert!(dist.frequency.iter().all(|c| *c == 0));
        assert_eq!(dist.summary, AgeSummary::default());
    }

    #[test]
    fn deciles_sum_to_one() {
        let ages = [0.0, 3.0, 17.0, 44.0, 44.5, 61.0, 79.0, 88.0, 90.0, 104.0, 12.0];
        let dist = aggregate_ages(&ages);
        let sum: f64 = dist.deciles.iter().sum();
        assert!((sum - 1.0).abs() < EPSILON, "sum was {sum}");
    }

    #[test]
    fn ninety_and_above_land_in_last_bucket() {
        for age in [90.0, 95.0, 120.0, 150.0, 1_000.0] {
            assert_eq!(decile_index(age), 9, "age {age}");
        }
        let dist = aggregate_ages(&[150.0]);
        assert_eq!(dist.decile_counts[9], 1);
        assert_eq!(dist.deciles[9], 1.0);
    }

    #[test]
    fn scenario_region_with_five_appointments() {
        let dist = aggregate_ages(&[5.0, 15.0, 25.0, 95.0, 95.0]);

        let expected = [0.2, 0.2, 0.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.4];
        for (i, (got, want)) in dist.deciles.iter().zip(expected.iter()).enumerate() {
            assert!((got - want).abs() < EPSILON, "bucket {i}: {got} != {want}");
        }

        let summary = dist.summary.rounded();
        assert_eq!(summary.children, 20.0);
        // 15 is working age, not a child.
        assert_eq!(summary.working_age, 40.0);
        assert_eq!(summary.elderly, 40.0);
    }

    #[test]
    fn life_stages_sum_to_hundred() {
        let ages = [1.0, 14.9, 15.0, 30.0, 64.99, 65.0, 99.0];
        let s = aggregate_ages(&ages).summary;
        assert!((s.children + s.working_age + s.elderly - 100.0).abs() < EPSILON);
    }

    #[test]
    fn frequency_drops_ages_over_hundred_but_deciles_keep_them() {
        let dist = aggregate_ages(&[100.0, 101.0, 130.0, 42.7]);
        assert_eq!(dist.frequency[100], 1);
        assert_eq!(dist.frequency[42], 1);
        assert_eq!(dist.frequency.iter().sum::<u64>(), 2);
        assert_eq!(dist.decile_counts[9], 3);
        assert_eq!(dist.total, 4);
    }

    #[test]
    fn invalid_ages_are_rejected_not_bucketed() {
        let dist = aggregate_ages(&[-1.0, f64::NAN, f64::INFINITY, 30.0]);
        assert_eq!(dist.rejected, 3);
        assert_eq!(dist.total, 1);
        assert_eq!(dist.deciles[3], 1.0);
        assert_eq!(dist.summary.working_age, 100.0);
    }

    #[test]
    fn summary_rounds_to_one_decimal() {
        let s = aggregate_ages(&[1.0, 20.0, 70.0]).summary.rounded();
        assert_eq!(s.children, 33.3);
        assert_eq!(s.working_age, 33.3);
        assert_eq!(s.elderly, 33.3);
    }
}

use serde::Serialize;

use crate::models::IncomeBracket;

/// Patients per income bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IncomeDistribution {
    pub low: u64,
    pub middle: u64,
    pub high: u64,
    /// Values matching no bracket. Reported, never charted.
    pub unclassified: u64,
}

impl IncomeDistribution {
    /// Counts in pie order: low, middle, high.
    pub fn counts(&self) -> [u64; 3] {
        [self.low, self.middle, self.high]
    }

    pub fn classified_total(&self) -> u64 {
        self.low + self.middle + self.high
    }

    pub fn count(&self, bracket: IncomeBracket) -> u64 {
        match bracket {
            IncomeBracket::Low => self.low,
            IncomeBracket::Middle => self.middle,
            IncomeBracket::High => self.high,
        }
    }
}

pub fn aggregate_income<S: AsRef<str>>(levels: &[S]) -> IncomeDistribution {
    levels
        .iter()
        .fold(IncomeDistribution::default(), |mut dist, raw| {
            match IncomeBracket::canonicalize(raw.as_ref()) {
                Some(IncomeBracket::Low) => dist.low += 1,
                Some(IncomeBracket::Middle) => dist.middle += 1,
                Some(IncomeBracket::High) => dist.high += 1,
                None => dist.unclassified += 1,
            }
            dist
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_case_insensitive_matches() {
        let dist = aggregate_income(&["low", "LOW", "Middle", "high", "High", "high"]);
        assert_eq!(dist.counts(), [2, 1, 3]);
        assert_eq!(dist.unclassified, 0);
    }

    #[test]
    fn other_strings_leave_brackets_unchanged() {
        let base = aggregate_income(&["low", "middle"]);
        for junk in ["", "lower-middle", "HIGH ", "unknown", "0"] {
            let dist = aggregate_income(&["low", "middle", junk]);
            assert_eq!(dist.counts(), base.counts(), "{junk:?}");
            assert_eq!(dist.unclassified, 1);
        }
    }

    #[test]
    fn empty_input_is_zero() {
        let dist = aggregate_income::<&str>(&[]);
        assert_eq!(dist, IncomeDistribution::default());
        assert_eq!(dist.classified_total(), 0);
    }

    #[test]
    fn accepts_owned_strings() {
        let levels = vec!["middle".to_string(), "Middle".to_string()];
        let dist = aggregate_income(&levels);
        assert_eq!(dist.count(IncomeBracket::Middle), 2);
    }
}

use serde::{Deserialize, Serialize};

/// Raised when a stored string does not name any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}: {value}")]
pub struct UnknownVariant {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownVariant {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Admin => "admin",
    Doctor => "doctor",
    Assistant => "assistant",
});

str_enum!(IncomeBracket {
    Low => "low",
    Middle => "middle",
    High => "high",
});

str_enum!(BmiCategory {
    Underweight => "underweight",
    Normal => "normal",
    Overweight => "overweight",
    Obese => "obese",
});

str_enum!(VaccineType {
    Polio => "polio",
    Bcg => "bcg",
    Dpt => "dpt",
    MeaslesRubella => "measles_rubella",
    Covid19 => "covid_19",
});

str_enum!(VaccinationAgeBand {
    UpTo18 => "0-18",
    From19To45 => "19-45",
    From46To60 => "46-60",
    Over60 => "60+",
});

str_enum!(Metric {
    Age => "age",
    Income => "income",
    Bmi => "bmi",
    Vaccination => "vaccination",
    ChronicDisease => "chronic_disease",
});

impl IncomeBracket {
    /// Exact, case-insensitive match on the bracket name.
    /// Anything else (padding included) is unclassified.
    pub fn canonicalize(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "middle" => Some(Self::Middle),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Income",
            Self::Middle => "Middle Income",
            Self::High => "High Income",
        }
    }
}

/// BMI category thresholds. Boundary values belong to the higher category.
pub const BMI_UNDERWEIGHT_BELOW: f64 = 18.5;
pub const BMI_NORMAL_BELOW: f64 = 25.0;
pub const BMI_OVERWEIGHT_BELOW: f64 = 30.0;

impl BmiCategory {
    /// Total partition over half-open intervals; values that fail every
    /// comparison (NaN) fall through to `Obese`.
    pub fn classify(bmi: f64) -> Self {
        if bmi < BMI_UNDERWEIGHT_BELOW {
            Self::Underweight
        } else if bmi < BMI_NORMAL_BELOW {
            Self::Normal
        } else if bmi < BMI_OVERWEIGHT_BELOW {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }

    /// Histogram axis label including the BMI range.
    pub fn range_label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight (<18.5)",
            Self::Normal => "Normal (18.5-24.9)",
            Self::Overweight => "Overweight (25-29.9)",
            Self::Obese => "Obese (30+)",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Underweight => "#FF6384",
            Self::Normal => "#4BC0C0",
            Self::Overweight => "#FFCE56",
            Self::Obese => "#FF0000",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Underweight => 0,
            Self::Normal => 1,
            Self::Overweight => 2,
            Self::Obese => 3,
        }
    }
}

impl VaccineType {
    /// Map a free-text vaccine name to its bucket.
    ///
    /// The name is lower-cased and stripped of spaces and hyphens, then the
    /// first matching rule wins: prefix `polio`, exact `bcg`, exact `dpt`,
    /// substring `measlesrubella` or `mr`, substring `covid`.
    pub fn canonicalize(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();

        if normalized.starts_with("polio") {
            Some(Self::Polio)
        } else if normalized == "bcg" {
            Some(Self::Bcg)
        } else if normalized == "dpt" {
            Some(Self::Dpt)
        } else if normalized.contains("measlesrubella") || normalized.contains("mr") {
            Some(Self::MeaslesRubella)
        } else if normalized.contains("covid") {
            Some(Self::Covid19)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Polio => "Polio",
            Self::Bcg => "BCG",
            Self::Dpt => "DPT",
            Self::MeaslesRubella => "Measles-Rubella",
            Self::Covid19 => "COVID-19",
        }
    }
}

impl VaccinationAgeBand {
    /// Inclusive upper bounds except the last band.
    pub fn of(age: f64) -> Self {
        if age <= 18.0 {
            Self::UpTo18
        } else if age <= 45.0 {
            Self::From19To45
        } else if age <= 60.0 {
            Self::From46To60
        } else {
            Self::Over60
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trip() {
        for (variant, s) in [
            (Role::Admin, "admin"),
            (Role::Doctor, "doctor"),
            (Role::Assistant, "assistant"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Role::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn metric_serializes_snake_case() {
        let json = serde_json::to_string(&Metric::ChronicDisease).unwrap();
        assert_eq!(json, "\"chronic_disease\"");
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = Role::from_str("nurse").unwrap_err();
        assert_eq!(err.field, "Role");
        assert_eq!(err.value, "nurse");
        assert!(Metric::from_str("").is_err());
    }

    #[test]
    fn income_matches_case_insensitively() {
        assert_eq!(IncomeBracket::canonicalize("LOW"), Some(IncomeBracket::Low));
        assert_eq!(IncomeBracket::canonicalize("Middle"), Some(IncomeBracket::Middle));
        assert_eq!(IncomeBracket::canonicalize("high"), Some(IncomeBracket::High));
    }

    #[test]
    fn income_rejects_near_misses() {
        for raw in ["", " low", "lower", "mid", "high income", "n/a"] {
            assert_eq!(IncomeBracket::canonicalize(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn bmi_boundaries_go_up() {
        assert_eq!(BmiCategory::classify(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::classify(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(24.99), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(30.0), BmiCategory::Obese);
        assert_eq!(BmiCategory::classify(52.3), BmiCategory::Obese);
    }

    #[test]
    fn bmi_index_follows_all_order() {
        for (i, category) in BmiCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn vaccine_normalization() {
        assert_eq!(VaccineType::canonicalize("Polio-1"), Some(VaccineType::Polio));
        assert_eq!(VaccineType::canonicalize("OPV Polio"), None);
        assert_eq!(VaccineType::canonicalize("B C G"), Some(VaccineType::Bcg));
        assert_eq!(VaccineType::canonicalize("dpt"), Some(VaccineType::Dpt));
        assert_eq!(VaccineType::canonicalize("DPT booster"), None);
        assert_eq!(
            VaccineType::canonicalize("measles rubella"),
            Some(VaccineType::MeaslesRubella)
        );
        assert_eq!(VaccineType::canonicalize("MR-2"), Some(VaccineType::MeaslesRubella));
        assert_eq!(VaccineType::canonicalize("Covid-19 Booster"), Some(VaccineType::Covid19));
        assert_eq!(VaccineType::canonicalize("vitamin-d"), None);
    }

    #[test]
    fn vaccine_first_rule_wins() {
        // "polio" prefix beats the "mr" substring rule.
        assert_eq!(VaccineType::canonicalize("polio-mr"), Some(VaccineType::Polio));
        // "mr" is checked before "covid".
        assert_eq!(VaccineType::canonicalize("covid mrna"), Some(VaccineType::MeaslesRubella));
    }

    #[test]
    fn vaccination_age_band_bounds() {
        assert_eq!(VaccinationAgeBand::of(0.0), VaccinationAgeBand::UpTo18);
        assert_eq!(VaccinationAgeBand::of(18.0), VaccinationAgeBand::UpTo18);
        assert_eq!(VaccinationAgeBand::of(19.0), VaccinationAgeBand::From19To45);
        assert_eq!(VaccinationAgeBand::of(45.0), VaccinationAgeBand::From19To45);
        assert_eq!(VaccinationAgeBand::of(60.0), VaccinationAgeBand::From46To60);
        assert_eq!(VaccinationAgeBand::of(60.5), VaccinationAgeBand::Over60);
    }
}

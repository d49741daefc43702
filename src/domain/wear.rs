//! Wear buckets and float classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the five named wear states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Wear {
    #[serde(rename = "Factory New")]
    FactoryNew,
    #[serde(rename = "Minimal Wear")]
    MinimalWear,
    #[serde(rename = "Field-Tested")]
    FieldTested,
    #[serde(rename = "Well-Worn")]
    WellWorn,
    #[serde(rename = "Battle-Scarred")]
    BattleScarred,
}

impl Wear {
    pub const ALL: [Wear; 5] = [
        Wear::FactoryNew,
        Wear::MinimalWear,
        Wear::FieldTested,
        Wear::WellWorn,
        Wear::BattleScarred,
    ];

    /// Canonical market name, e.g. "Field-Tested".
    pub fn name(&self) -> &'static str {
        match self {
            Wear::FactoryNew => "Factory New",
            Wear::MinimalWear => "Minimal Wear",
            Wear::FieldTested => "Field-Tested",
            Wear::WellWorn => "Well-Worn",
            Wear::BattleScarred => "Battle-Scarred",
        }
    }

    pub fn short(&self) -> &'static str {
        match self {
            Wear::FactoryNew => "FN",
            Wear::MinimalWear => "MW",
            Wear::FieldTested => "FT",
            Wear::WellWorn => "WW",
            Wear::BattleScarred => "BS",
        }
    }

    /// Parse a wear label leniently.
    ///
    /// Accepts canonical names and short codes case-insensitively, plus
    /// parenthesised or space-separated spellings such as "(Field-Tested)"
    /// and "field tested".
    pub fn from_label(label: &str) -> Result<Wear, WearError> {
        let folded = fold_label(label);
        Wear::ALL
            .into_iter()
            .find(|w| folded == fold_label(w.name()) || folded == w.short().to_ascii_lowercase())
            .ok_or_else(|| WearError::UnknownLabel(label.to_string()))
    }
}

fn fold_label(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl fmt::Display for Wear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Wear {
    type Err = WearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Wear::from_label(s)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WearError {
    #[error("float {0} out of range [0.0, 1.0]")]
    OutOfRange(f64),
    #[error("invalid float range: min {min} > max {max}")]
    InvertedRange { min: f64, max: f64 },
    #[error("unknown wear label: {0}")]
    UnknownLabel(String),
}

/// A wear bucket: `[lower, upper)`, or `[lower, upper]` when `inclusive_upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WearBucket {
    pub wear: Wear,
    pub lower: f64,
    pub upper: f64,
    pub inclusive_upper: bool,
}

impl WearBucket {
    pub fn contains(&self, f: f64) -> bool {
        if self.inclusive_upper {
            self.lower <= f && f <= self.upper
        } else {
            self.lower <= f && f < self.upper
        }
    }

    /// True if the closed interval `[lo, hi]` overlaps this bucket.
    pub fn intersects(&self, lo: f64, hi: f64) -> bool {
        if self.inclusive_upper {
            !(hi < self.lower || lo > self.upper)
        } else {
            !(hi < self.lower || lo >= self.upper)
        }
    }
}

/// The five buckets partitioning `[0, 1]`. Only Battle-Scarred includes its upper bound.
pub const WEAR_BUCKETS: [WearBucket; 5] = [
    WearBucket {
        wear: Wear::FactoryNew,
        lower: 0.00,
        upper: 0.07,
        inclusive_upper: false,
    },
    WearBucket {
        wear: Wear::MinimalWear,
        lower: 0.07,
        upper: 0.15,
        inclusive_upper: false,
    },
    WearBucket {
        wear: Wear::FieldTested,
        lower: 0.15,
        upper: 0.38,
        inclusive_upper: false,
    },
    WearBucket {
        wear: Wear::WellWorn,
        lower: 0.38,
        upper: 0.45,
        inclusive_upper: false,
    },
    WearBucket {
        wear: Wear::BattleScarred,
        lower: 0.45,
        upper: 1.00,
        inclusive_upper: true,
    },
];

/// Classify a float value into its wear bucket.
///
/// # Errors
/// Returns `WearError::OutOfRange` for values outside `[0, 1]` (including NaN).
pub fn wear_from_float(f: f64) -> Result<Wear, WearError> {
    WEAR_BUCKETS
        .iter()
        .find(|b| b.contains(f))
        .map(|b| b.wear)
        .ok_or(WearError::OutOfRange(f))
}

/// All wears a skin with float range `[float_min, float_max]` can come in, in bucket order.
pub fn valid_wears_for_range(float_min: f64, float_max: f64) -> Result<Vec<Wear>, WearError> {
    if float_min > float_max {
        return Err(WearError::InvertedRange {
            min: float_min,
            max: float_max,
        });
    }
    if !(0.0..=1.0).contains(&float_min) {
        return Err(WearError::OutOfRange(float_min));
    }
    if !(0.0..=1.0).contains(&float_max) {
        return Err(WearError::OutOfRange(float_max));
    }

    Ok(WEAR_BUCKETS
        .iter()
        .filter(|b| b.intersects(float_min, float_max))
        .map(|b| b.wear)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wear_from_float_edges() {
        let cases = [
            (0.00, Wear::FactoryNew),
            (0.069999, Wear::FactoryNew),
            (0.07, Wear::MinimalWear),
            (0.149999, Wear::MinimalWear),
            (0.15, Wear::FieldTested),
            (0.379999, Wear::FieldTested),
            (0.38, Wear::WellWorn),
            (0.449999, Wear::WellWorn),
            (0.45, Wear::BattleScarred),
            (1.0, Wear::BattleScarred),
        ];
        for (f, expected) in cases {
            assert_eq!(wear_from_float(f).unwrap(), expected, "float {}", f);
        }
    }

    #[test]
    fn test_wear_from_float_out_of_range() {
        assert_eq!(wear_from_float(-0.01), Err(WearError::OutOfRange(-0.01)));
        assert_eq!(wear_from_float(1.0001), Err(WearError::OutOfRange(1.0001)));
        assert!(wear_from_float(f64::NAN).is_err());
    }

    #[test]
    fn test_buckets_partition_unit_interval() {
        for i in 0..=10_000 {
            let f = i as f64 / 10_000.0;
            let hits = WEAR_BUCKETS.iter().filter(|b| b.contains(f)).count();
            assert_eq!(hits, 1, "float {} matched {} buckets", f, hits);
        }
    }

    #[test]
    fn test_valid_wears_boundaries() {
        let wears = valid_wears_for_range(0.00, 0.07).unwrap();
        assert_eq!(wears, vec![Wear::FactoryNew, Wear::MinimalWear]);

        let wears = valid_wears_for_range(0.38, 0.45).unwrap();
        assert_eq!(wears, vec![Wear::WellWorn, Wear::BattleScarred]);

        let wears = valid_wears_for_range(0.0, 1.0).unwrap();
        assert_eq!(wears, Wear::ALL.to_vec());
    }

    #[test]
    fn test_valid_wears_reaching_one_includes_battle_scarred() {
        let wears = valid_wears_for_range(1.0, 1.0).unwrap();
        assert_eq!(wears, vec![Wear::BattleScarred]);
    }

    #[test]
    fn test_valid_wears_rejects_bad_ranges() {
        assert!(matches!(
            valid_wears_for_range(0.5, 0.1),
            Err(WearError::InvertedRange { .. })
        ));
        assert!(matches!(
            valid_wears_for_range(0.0, 1.2),
            Err(WearError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_wear_label_normalization() {
        assert_eq!(Wear::from_label("field-tested").unwrap(), Wear::FieldTested);
        assert_eq!(Wear::from_label("(Field-Tested)").unwrap(), Wear::FieldTested);
        assert_eq!(Wear::from_label("Field Tested").unwrap(), Wear::FieldTested);
        assert_eq!(Wear::from_label("bs").unwrap(), Wear::BattleScarred);
        assert_eq!(Wear::from_label(" Minimal  Wear ").unwrap(), Wear::MinimalWear);
        assert!(Wear::from_label("Pristine").is_err());
    }

    #[test]
    fn test_wear_serialization() {
        let json = serde_json::to_string(&Wear::WellWorn).unwrap();
        assert_eq!(json, "\"Well-Worn\"");
    }
}

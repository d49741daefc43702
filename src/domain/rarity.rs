//! Rarity ladder.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Weapon skin rarity tiers, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rarity {
    Consumer,
    Industrial,
    MilSpec,
    Restricted,
    Classified,
    Covert,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Consumer,
        Rarity::Industrial,
        Rarity::MilSpec,
        Rarity::Restricted,
        Rarity::Classified,
        Rarity::Covert,
    ];

    /// The tier a trade-up of this rarity produces. `None` for covert.
    pub fn next(&self) -> Option<Rarity> {
        match self {
            Rarity::Consumer => Some(Rarity::Industrial),
            Rarity::Industrial => Some(Rarity::MilSpec),
            Rarity::MilSpec => Some(Rarity::Restricted),
            Rarity::Restricted => Some(Rarity::Classified),
            Rarity::Classified => Some(Rarity::Covert),
            Rarity::Covert => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Consumer => "consumer",
            Rarity::Industrial => "industrial",
            Rarity::MilSpec => "mil-spec",
            Rarity::Restricted => "restricted",
            Rarity::Classified => "classified",
            Rarity::Covert => "covert",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rarity: {0:?}")]
pub struct RarityParseError(pub String);

impl FromStr for Rarity {
    type Err = RarityParseError;

    /// Accepts catalog spellings like "Mil Spec", "milspec" or "Restricted Grade".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let normalized = lowered
            .strip_suffix(" grade")
            .unwrap_or(&lowered)
            .replace("mil spec", "mil-spec")
            .replace("milspec", "mil-spec")
            .replace("mil_spec", "mil-spec");

        Rarity::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| RarityParseError(s.to_string()))
    }
}

/// Accepts the same spellings as [`FromStr`], so JSON and CSV inputs agree.
impl<'de> Deserialize<'de> for Rarity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_rarity_chain() {
        assert_eq!(Rarity::Consumer.next(), Some(Rarity::Industrial));
        assert_eq!(Rarity::MilSpec.next(), Some(Rarity::Restricted));
        assert_eq!(Rarity::Classified.next(), Some(Rarity::Covert));
        assert_eq!(Rarity::Covert.next(), None);
    }

    #[test]
    fn test_rarity_ordering() {
        for pair in Rarity::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
    }

    #[test]
    fn test_rarity_parse_normalizes() {
        assert_eq!("Mil Spec".parse::<Rarity>().unwrap(), Rarity::MilSpec);
        assert_eq!("milspec".parse::<Rarity>().unwrap(), Rarity::MilSpec);
        assert_eq!("mil_spec".parse::<Rarity>().unwrap(), Rarity::MilSpec);
        assert_eq!("Restricted Grade".parse::<Rarity>().unwrap(), Rarity::Restricted);
        assert_eq!(" Covert ".parse::<Rarity>().unwrap(), Rarity::Covert);
        assert!("contraband".parse::<Rarity>().is_err());
        assert!("".parse::<Rarity>().is_err());
    }

    #[test]
    fn test_rarity_serialization() {
        let json = serde_json::to_string(&Rarity::MilSpec).unwrap();
        assert_eq!(json, "\"mil-spec\"");
        let parsed: Rarity = serde_json::from_str("\"classified\"").unwrap();
        assert_eq!(parsed, Rarity::Classified);
        let parsed: Rarity = serde_json::from_str("\"Mil Spec\"").unwrap();
        assert_eq!(parsed, Rarity::MilSpec);
        let parsed: Rarity = serde_json::from_str("\"Restricted\"").unwrap();
        assert_eq!(parsed, Rarity::Restricted);
        assert!(serde_json::from_str::<Rarity>("\"contraband\"").is_err());
    }
}

//! Market hash names: the `"StatTrak™ <name> (<Wear>)"` item identity used by price sources.

use thiserror::Error;

use super::wear::{Wear, WearError};

pub const STATTRAK_MARK: &str = "StatTrak™ ";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketHashNameError {
    #[error("invalid market hash name format: {0:?}")]
    Malformed(String),
    #[error(transparent)]
    Wear(#[from] WearError),
}

/// Collapse runs of whitespace and trim.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn build_market_hash_name(name: &str, wear: Wear, stattrak: bool) -> String {
    let prefix = if stattrak { STATTRAK_MARK } else { "" };
    format!("{}{} ({})", prefix, normalize_name(name), wear)
}

/// Split a market hash name into `(name, wear, stattrak)`.
pub fn parse_market_hash_name(mhn: &str) -> Result<(String, Wear, bool), MarketHashNameError> {
    let trimmed = mhn.trim();
    let (rest, stattrak) = match trimmed.strip_prefix(STATTRAK_MARK) {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };

    let body = rest
        .strip_suffix(')')
        .ok_or_else(|| MarketHashNameError::Malformed(mhn.to_string()))?;
    let (name, wear) = body
        .rsplit_once(" (")
        .ok_or_else(|| MarketHashNameError::Malformed(mhn.to_string()))?;

    let name = normalize_name(name);
    if name.is_empty() {
        return Err(MarketHashNameError::Malformed(mhn.to_string()));
    }

    Ok((name, Wear::from_label(wear)?, stattrak))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_market_hash_name() {
        assert_eq!(
            build_market_hash_name("AK-47 | Cartel", Wear::FieldTested, false),
            "AK-47 | Cartel (Field-Tested)"
        );
        assert_eq!(
            build_market_hash_name("  AK-47  |   Cartel ", Wear::FactoryNew, true),
            "StatTrak™ AK-47 | Cartel (Factory New)"
        );
    }

    #[test]
    fn test_parse_market_hash_name() {
        let (name, wear, st) = parse_market_hash_name("StatTrak™ M4A1-S | Hyper Beast (Well-Worn)").unwrap();
        assert_eq!(name, "M4A1-S | Hyper Beast");
        assert_eq!(wear, Wear::WellWorn);
        assert!(st);

        let (name, wear, st) = parse_market_hash_name("P250 | Sand Dune (Battle-Scarred)").unwrap();
        assert_eq!(name, "P250 | Sand Dune");
        assert_eq!(wear, Wear::BattleScarred);
        assert!(!st);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            parse_market_hash_name("AK-47 | Cartel"),
            Err(MarketHashNameError::Malformed(_))
        ));
        assert!(matches!(
            parse_market_hash_name("AK-47 | Cartel (Shiny)"),
            Err(MarketHashNameError::Wear(_))
        ));
        assert!(parse_market_hash_name(" (Factory New)").is_err());
    }
}

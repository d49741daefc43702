//! Catalog items, contract entries and outcomes.

use serde::{Deserialize, Serialize};

use super::rarity::Rarity;
use super::wear::Wear;

/// Reference data for one skin in one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinCatalogItem {
    /// e.g. "AK-47 | Cartel"
    pub name: String,
    pub collection: String,
    pub rarity: Rarity,
    pub float_min: f64,
    pub float_max: f64,
}

impl SkinCatalogItem {
    pub fn new(
        name: impl Into<String>,
        collection: impl Into<String>,
        rarity: Rarity,
        float_min: f64,
        float_max: f64,
    ) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            rarity,
            float_min,
            float_max,
        }
    }
}

/// One of the ten inputs of a trade-up contract.
///
/// `float_min`/`float_max` may be supplied by the caller or filled from the
/// catalog; `price_cents` is filled by a price resolver when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractEntry {
    pub name: String,
    pub collection: String,
    pub rarity: Rarity,
    pub float_value: f64,
    #[serde(default)]
    pub float_min: Option<f64>,
    #[serde(default)]
    pub float_max: Option<f64>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub stattrak: bool,
}

impl ContractEntry {
    pub fn new(
        name: impl Into<String>,
        collection: impl Into<String>,
        rarity: Rarity,
        float_value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            rarity,
            float_value,
            float_min: None,
            float_max: None,
            price_cents: None,
            stattrak: false,
        }
    }

    pub fn with_price(mut self, price_cents: i64) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    pub fn with_range(mut self, float_min: f64, float_max: f64) -> Self {
        self.float_min = Some(float_min);
        self.float_max = Some(float_max);
        self
    }

    pub fn with_stattrak(mut self, stattrak: bool) -> Self {
        self.stattrak = stattrak;
        self
    }

    /// Both range bounds, if present.
    pub fn float_range(&self) -> Option<(f64, f64)> {
        self.float_min.zip(self.float_max)
    }
}

/// A possible result of a contract, one per eligible (collection, item) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub name: String,
    pub collection: String,
    pub rarity: Rarity,
    pub float_min: f64,
    pub float_max: f64,
    pub prob: f64,
    pub out_float: f64,
    #[serde(rename = "wear")]
    pub wear_name: Wear,
    pub price_cents: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builders() {
        let entry = ContractEntry::new("AK-47 | Cartel", "The Chroma Collection", Rarity::Classified, 0.2)
            .with_price(1500)
            .with_range(0.0, 0.75)
            .with_stattrak(true);
        assert_eq!(entry.price_cents, Some(1500));
        assert_eq!(entry.float_range(), Some((0.0, 0.75)));
        assert!(entry.stattrak);
    }

    #[test]
    fn test_entry_range_requires_both_bounds() {
        let mut entry = ContractEntry::new("X", "C", Rarity::Restricted, 0.2);
        entry.float_min = Some(0.1);
        assert_eq!(entry.float_range(), None);
    }

    #[test]
    fn test_entry_deserializes_with_defaults() {
        let json = serde_json::json!({
            "name": "MP9 | Hot Rod",
            "collection": "The Arms Deal Collection",
            "rarity": "restricted",
            "floatValue": 0.03
        });
        let entry: ContractEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.rarity, Rarity::Restricted);
        assert_eq!(entry.price_cents, None);
        assert!(!entry.stattrak);
    }
}

//! Price resolution for contract entries and outcomes.
//!
//! Pricing gaps are not errors: a resolver answering `None` leaves the field
//! absent and the summary blanks whatever depends on it.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::domain::{build_market_hash_name, wear_from_float, ContractEntry, Outcome, Wear, WearError};

pub mod cache;

pub use cache::{open_price_cache, JsonPriceCache, PriceCache, PriceCacheError};

/// Looks up the price of an item in a given wear and variant.
pub trait PriceResolver: Send + Sync + fmt::Debug {
    fn price_for(&self, item_name: &str, wear: Wear, stattrak: bool) -> Option<i64>;
}

/// In-memory price map keyed by market hash name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTable {
    prices: HashMap<String, i64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a price. Returns the previous value.
    pub fn insert(&mut self, market_hash_name: impl Into<String>, price_cents: i64) -> Option<i64> {
        self.prices.insert(market_hash_name.into(), price_cents)
    }

    pub fn get(&self, market_hash_name: &str) -> Option<i64> {
        self.prices.get(market_hash_name).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Extend<(String, i64)> for PriceTable {
    fn extend<T: IntoIterator<Item = (String, i64)>>(&mut self, iter: T) {
        self.prices.extend(iter);
    }
}

impl IntoIterator for PriceTable {
    type Item = (String, i64);
    type IntoIter = std::collections::hash_map::IntoIter<String, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.prices.into_iter()
    }
}

impl FromIterator<(String, i64)> for PriceTable {
    fn from_iter<T: IntoIterator<Item = (String, i64)>>(iter: T) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

impl PriceResolver for PriceTable {
    fn price_for(&self, item_name: &str, wear: Wear, stattrak: bool) -> Option<i64> {
        self.get(&build_market_hash_name(item_name, wear, stattrak))
    }
}

/// Price entries that have no price yet, using the wear of each entry's own float.
///
/// # Errors
/// Fails if an unpriced entry's float is outside `[0, 1]`.
pub fn fill_entry_prices(
    entries: &mut [ContractEntry],
    resolver: &dyn PriceResolver,
    stattrak: bool,
) -> Result<(), WearError> {
    for entry in entries.iter_mut().filter(|e| e.price_cents.is_none()) {
        let wear = wear_from_float(entry.float_value)?;
        entry.price_cents = resolver.price_for(&entry.name, wear, stattrak);
        if entry.price_cents.is_none() {
            debug!("No price for entry '{}' ({})", entry.name, wear);
        }
    }
    Ok(())
}

/// Price every outcome at the wear of its remapped float.
pub fn fill_outcome_prices(outcomes: &mut [Outcome], resolver: &dyn PriceResolver, stattrak: bool) {
    for outcome in outcomes.iter_mut() {
        outcome.price_cents = resolver.price_for(&outcome.name, outcome.wear_name, stattrak);
        if outcome.price_cents.is_none() {
            debug!("No price for outcome '{}' ({})", outcome.name, outcome.wear_name);
        }
    }
}

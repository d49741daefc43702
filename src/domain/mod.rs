//! Domain types for trade-up evaluation.
//!
//! This module provides:
//! - Wear buckets and float classification
//! - The rarity ladder
//! - Catalog items, contract entries and outcomes
//! - The catalog index used for outcome-pool queries
//! - Market hash name construction and parsing

pub mod catalog;
pub mod market_hash;
pub mod rarity;
pub mod skin;
pub mod wear;

pub use catalog::{Catalog, CatalogLookup};
pub use market_hash::{build_market_hash_name, parse_market_hash_name, MarketHashNameError};
pub use rarity::{Rarity, RarityParseError};
pub use skin::{ContractEntry, Outcome, SkinCatalogItem};
pub use wear::{valid_wears_for_range, wear_from_float, Wear, WearBucket, WearError, WEAR_BUCKETS};

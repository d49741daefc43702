//! Pure computation engine for trade-up contracts.
//!
//! Everything here is synchronous and side-effect free: a deterministic function
//! of the catalog snapshot, the ten entries, their prices and the fee rate.

use thiserror::Error;

use crate::domain::{Rarity, WearError};

pub mod outcomes;
pub mod summary;
pub mod validate;

pub use outcomes::{compute_f_norm_avg, compute_outcomes};
pub use summary::{summarize, ContractSummary, Decision};
pub use validate::{fill_ranges_from_catalog, validate_entries};

/// Number of inputs consumed by a trade-up contract.
pub const CONTRACT_SIZE: usize = 10;

/// Guards the float normalization against zero-width ranges.
pub const RANGE_EPSILON: f64 = 1e-9;

/// Structural contract failures. All of them abort the evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error("a contract needs exactly 10 entries, got {0}")]
    InvalidEntryCount(usize),
    #[error("all entries must share one rarity, found: {}", join_rarities(.0))]
    MixedRarity(Vec<Rarity>),
    #[error("StatTrak and non-StatTrak entries cannot be mixed in one contract")]
    MixedVariant,
    #[error("skin not found in catalog: '{name}' from collection '{collection}'")]
    SkinNotFound { name: String, collection: String },
    #[error("no trade-up target exists above rarity '{0}'")]
    NoUpgradePath(Rarity),
    #[error("no input collection has skins at rarity '{0}'")]
    EmptyOutcomePool(Rarity),
    #[error("entry '{name}' has no float range")]
    MissingFloatRange { name: String },
    #[error(transparent)]
    FloatOutOfRange(#[from] WearError),
}

fn join_rarities(rarities: &[Rarity]) -> String {
    rarities
        .iter()
        .map(Rarity::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

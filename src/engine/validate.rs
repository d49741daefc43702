use tracing::debug;

use crate::domain::{CatalogLookup, ContractEntry, Rarity};

use super::{ContractError, CONTRACT_SIZE};

/// Check the structural invariants of a contract.
///
/// Returns the common rarity and StatTrak flag.
///
/// # Errors
/// `InvalidEntryCount` unless there are exactly ten entries, `MixedRarity` if the
/// rarities differ, `MixedVariant` if StatTrak and non-StatTrak entries are mixed.
pub fn validate_entries(entries: &[ContractEntry]) -> Result<(Rarity, bool), ContractError> {
    if entries.len() != CONTRACT_SIZE {
        return Err(ContractError::InvalidEntryCount(entries.len()));
    }

    let mut rarities: Vec<Rarity> = entries.iter().map(|e| e.rarity).collect();
    rarities.sort();
    rarities.dedup();
    if rarities.len() != 1 {
        return Err(ContractError::MixedRarity(rarities));
    }

    let stattrak = entries[0].stattrak;
    if entries.iter().any(|e| e.stattrak != stattrak) {
        return Err(ContractError::MixedVariant);
    }

    Ok((rarities[0], stattrak))
}

/// Fill missing float ranges from the catalog.
///
/// On error the entries may be partially filled; callers discard them.
///
/// # Errors
/// `SkinNotFound` naming the first entry whose (name, collection) is not catalogued.
pub fn fill_ranges_from_catalog(
    entries: &mut [ContractEntry],
    catalog: &dyn CatalogLookup,
) -> Result<(), ContractError> {
    for entry in entries.iter_mut() {
        if entry.float_range().is_some() {
            continue;
        }

        let item = catalog.get(&entry.name, &entry.collection).ok_or_else(|| {
            ContractError::SkinNotFound {
                name: entry.name.clone(),
                collection: entry.collection.clone(),
            }
        })?;

        debug!(
            "Filled range for '{}' ({}): [{}, {}]",
            entry.name, entry.collection, item.float_min, item.float_max
        );
        entry.float_min = Some(item.float_min);
        entry.float_max = Some(item.float_max);
    }

    Ok(())
}

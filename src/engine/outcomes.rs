use tracing::debug;

use crate::domain::{wear_from_float, CatalogLookup, ContractEntry, Outcome, SkinCatalogItem};

use super::{validate_entries, ContractError, RANGE_EPSILON};

/// Mean position of each entry's float within its own range.
///
/// Unweighted across all entries regardless of collection.
///
/// # Errors
/// `MissingFloatRange` if any entry has not had its range filled.
pub fn compute_f_norm_avg(entries: &[ContractEntry]) -> Result<f64, ContractError> {
    let mut total = 0.0;
    for entry in entries {
        let (min, max) = entry
            .float_range()
            .ok_or_else(|| ContractError::MissingFloatRange {
                name: entry.name.clone(),
            })?;
        let width = (max - min).max(RANGE_EPSILON);
        total += (entry.float_value - min) / width;
    }
    Ok(total / entries.len() as f64)
}

/// Compute the outcome pool of a validated, range-filled contract.
///
/// Every eligible (collection, item) pair at the next rarity receives
/// probability `n_c / S`, where `n_c` counts the entries from that collection
/// and `S = Σ n_c * m_c` over collections with `m_c > 0` eligible items. Each
/// outcome's float is the average normalized input float remapped into the
/// item's own range.
///
/// Collections appear in first-appearance order of the entries, items in catalog
/// order.
///
/// # Errors
/// Structural errors from [`validate_entries`], `NoUpgradePath` for covert
/// contracts, `EmptyOutcomePool` when no collection has next-tier items,
/// `MissingFloatRange` for unfilled entries and `FloatOutOfRange` if a remapped
/// float falls outside `[0, 1]`.
pub fn compute_outcomes(
    entries: &[ContractEntry],
    catalog: &dyn CatalogLookup,
) -> Result<Vec<Outcome>, ContractError> {
    let (rarity, _stattrak) = validate_entries(entries)?;
    let next_rarity = rarity.next().ok_or(ContractError::NoUpgradePath(rarity))?;

    let mut count_by_collection: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        match count_by_collection
            .iter_mut()
            .find(|(c, _)| *c == entry.collection.as_str())
        {
            Some((_, n)) => *n += 1,
            None => count_by_collection.push((entry.collection.as_str(), 1)),
        }
    }

    // Collections without next-tier items drop out of the pool.
    let pool: Vec<(&str, usize, &[SkinCatalogItem])> = count_by_collection
        .into_iter()
        .map(|(c, n)| (c, n, catalog.outcomes_for(c, next_rarity)))
        .filter(|(_, _, outs)| !outs.is_empty())
        .collect();

    if pool.is_empty() {
        return Err(ContractError::EmptyOutcomePool(next_rarity));
    }

    let pool_size: usize = pool.iter().map(|(_, n, outs)| n * outs.len()).sum();
    if pool_size == 0 {
        return Err(ContractError::EmptyOutcomePool(next_rarity));
    }

    let f_norm_avg = compute_f_norm_avg(entries)?;
    debug!(
        "Outcome pool: {} collections, S={}, f_norm_avg={}",
        pool.len(),
        pool_size,
        f_norm_avg
    );

    let mut outcomes = Vec::with_capacity(pool_size);
    for (collection, n_c, items) in pool {
        let prob = n_c as f64 / pool_size as f64;
        for item in items {
            let out_float = item.float_min + (item.float_max - item.float_min) * f_norm_avg;
            outcomes.push(Outcome {
                name: item.name.clone(),
                collection: collection.to_string(),
                rarity: next_rarity,
                float_min: item.float_min,
                float_max: item.float_max,
                prob,
                out_float,
                wear_name: wear_from_float(out_float)?,
                price_cents: None,
            });
        }
    }

    Ok(outcomes)
}

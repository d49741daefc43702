use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{CatalogLookup, ContractEntry, Outcome, Rarity};
use crate::engine::{
    compute_outcomes, fill_ranges_from_catalog, summarize, validate_entries, ContractError,
    ContractSummary,
};
use crate::pricing::{fill_entry_prices, fill_outcome_prices, PriceResolver};

/// Fully evaluated contract: the filled inputs, the priced outcome pool and
/// the financial summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResult {
    pub rarity: Rarity,
    pub stattrak: bool,
    pub entries: Vec<ContractEntry>,
    pub outcomes: Vec<Outcome>,
    #[serde(flatten)]
    pub summary: ContractSummary,
}

/// Runs one contract through validation, range filling, pricing, the outcome
/// engine and the summarizer.
#[derive(Clone)]
pub struct Evaluator {
    catalog: Arc<dyn CatalogLookup>,
    fees_rate: f64,
}

impl Evaluator {
    pub fn new(catalog: Arc<dyn CatalogLookup>, fees_rate: f64) -> Self {
        Self { catalog, fees_rate }
    }

    pub fn fees_rate(&self) -> f64 {
        self.fees_rate
    }

    /// Same catalog, different fee rate.
    pub fn with_fees_rate(&self, fees_rate: f64) -> Self {
        Self {
            catalog: self.catalog.clone(),
            fees_rate,
        }
    }

    /// Evaluate a contract.
    ///
    /// Entries that already carry a price keep it; the resolver is asked only
    /// for the rest. Missing prices never fail the evaluation, they surface as
    /// absent summary fields and an incomplete decision.
    ///
    /// # Errors
    /// Any structural [`ContractError`].
    pub fn evaluate(
        &self,
        mut entries: Vec<ContractEntry>,
        resolver: &dyn PriceResolver,
    ) -> Result<ContractResult, ContractError> {
        let (rarity, stattrak) = validate_entries(&entries)?;
        fill_ranges_from_catalog(&mut entries, self.catalog.as_ref())?;
        fill_entry_prices(&mut entries, resolver, stattrak)?;

        let mut outcomes = compute_outcomes(&entries, self.catalog.as_ref())?;
        fill_outcome_prices(&mut outcomes, resolver, stattrak);
        debug!("Computed {} outcomes for {} contract", outcomes.len(), rarity);

        let summary = summarize(&entries, &outcomes, self.fees_rate);
        info!(
            "Evaluated {} contract: decision={} evNet={:?} cost={:?}",
            rarity, summary.decision, summary.ev_net_cents, summary.total_inputs_cost_cents
        );

        Ok(ContractResult {
            rarity,
            stattrak,
            entries,
            outcomes,
            summary,
        })
    }
}

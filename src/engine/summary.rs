//! Financial summary of a priced contract.
//!
//! Every metric is gated on its own inputs: a missing outcome price blanks the
//! EV-derived fields but leaves the input cost and break-even price intact.

use serde::{Deserialize, Serialize};

use crate::domain::{ContractEntry, Outcome};

use super::CONTRACT_SIZE;

/// Profitability verdict for a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Net expected value covers the input cost.
    Profitable,
    NotProfitable,
    /// Some price needed for the verdict is missing.
    Incomplete,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Profitable => write!(f, "profitable"),
            Decision::NotProfitable => write!(f, "not_profitable"),
            Decision::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// Derived financial metrics. All amounts are in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub fees_rate: f64,
    pub total_inputs_cost_cents: Option<i64>,
    pub ev_gross_cents: Option<f64>,
    pub ev_net_cents: Option<f64>,
    pub avg_outcome_price_cents: Option<f64>,
    pub roi_simple: Option<f64>,
    pub roi_simple_net: Option<f64>,
    pub pl_expected_net_cents: Option<f64>,
    pub roi_net: Option<f64>,
    pub prob_profit: Option<f64>,
    pub break_even_price_cents: Option<f64>,
    pub max_break_even_cost_total_cents: Option<f64>,
    pub max_break_even_cost_per_skin_cents: Option<f64>,
    pub decision: Decision,
}

/// Sum of entry prices, only when every entry is priced.
fn total_inputs_cost(entries: &[ContractEntry]) -> Option<i64> {
    entries.iter().map(|e| e.price_cents).sum()
}

/// Outcome prices, only when every outcome is priced.
fn outcome_prices(outcomes: &[Outcome]) -> Option<Vec<i64>> {
    if outcomes.is_empty() {
        return None;
    }
    outcomes.iter().map(|o| o.price_cents).collect()
}

/// Compute the financial summary of a contract.
///
/// `fees_rate` is the sale-side marketplace fee (0.02 = 2%). It applies to
/// outcome sale prices, never to input costs.
pub fn summarize(entries: &[ContractEntry], outcomes: &[Outcome], fees_rate: f64) -> ContractSummary {
    let net_factor = 1.0 - fees_rate;
    let total_cost = total_inputs_cost(entries);
    // Ratios divide by the cost, so they need it strictly positive.
    let positive_cost = total_cost.filter(|c| *c > 0).map(|c| c as f64);
    let prices = outcome_prices(outcomes);

    let ev_gross = prices.as_ref().map(|ps| {
        outcomes
            .iter()
            .zip(ps)
            .map(|(o, p)| o.prob * *p as f64)
            .sum::<f64>()
    });
    let ev_net = ev_gross.map(|ev| ev * net_factor);

    let avg_outcome_price = prices
        .as_ref()
        .map(|ps| ps.iter().sum::<i64>() as f64 / ps.len() as f64);

    let roi_simple = avg_outcome_price
        .zip(positive_cost)
        .map(|(avg, cost)| avg / cost);
    let roi_simple_net = avg_outcome_price
        .zip(positive_cost)
        .map(|(avg, cost)| avg * net_factor / cost);

    let pl_expected_net = ev_net.zip(positive_cost).map(|(ev, cost)| ev - cost);
    let roi_net = pl_expected_net
        .zip(positive_cost)
        .map(|(pl, cost)| pl / cost);

    // Each outcome's net sale price is rounded to whole cents, half to even,
    // before comparing.
    let prob_profit = prices.as_ref().zip(total_cost).map(|(ps, cost)| {
        outcomes
            .iter()
            .zip(ps)
            .filter(|(_, p)| (**p as f64 * net_factor).round_ties_even() >= cost as f64)
            .map(|(o, _)| o.prob)
            .sum::<f64>()
    });

    let break_even_price = total_cost
        .filter(|_| net_factor > 0.0)
        .map(|cost| cost as f64 / net_factor);

    let decision = match (ev_net, total_cost) {
        (Some(ev), Some(cost)) if ev >= cost as f64 => Decision::Profitable,
        (Some(_), Some(_)) => Decision::NotProfitable,
        _ => Decision::Incomplete,
    };

    ContractSummary {
        fees_rate,
        total_inputs_cost_cents: total_cost,
        ev_gross_cents: ev_gross,
        ev_net_cents: ev_net,
        avg_outcome_price_cents: avg_outcome_price,
        roi_simple,
        roi_simple_net,
        pl_expected_net_cents: pl_expected_net,
        roi_net,
        prob_profit,
        break_even_price_cents: break_even_price,
        max_break_even_cost_total_cents: ev_net,
        max_break_even_cost_per_skin_cents: ev_net.map(|ev| ev / CONTRACT_SIZE as f64),
        decision,
    }
}

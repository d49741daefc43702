use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use super::AppState;
use crate::config::validate_fees_rate;
use crate::domain::ContractEntry;
use crate::error::AppError;
use crate::orchestration::ContractResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub entries: Vec<ContractEntry>,
    /// Overrides the configured fee rate for this evaluation.
    pub fees_rate: Option<f64>,
}

pub async fn evaluate_contract(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<ContractResult>, AppError> {
    let evaluator = match request.fees_rate {
        Some(fees_rate) => {
            let fees_rate = validate_fees_rate("feesRate", fees_rate)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            state.evaluator.with_fees_rate(fees_rate)
        }
        None => state.evaluator.clone(),
    };
    debug!("Evaluating contract with {} entries", request.entries.len());

    let prices = state.prices.read().await;
    let result = evaluator.evaluate(request.entries, &*prices)?;
    Ok(Json(result))
}

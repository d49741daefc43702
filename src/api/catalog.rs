use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{valid_wears_for_range, CatalogLookup, Rarity, Wear};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct WearsQuery {
    pub name: String,
    pub collection: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WearsResponse {
    pub name: String,
    pub collection: String,
    pub rarity: Rarity,
    pub float_min: f64,
    pub float_max: f64,
    pub wears: Vec<Wear>,
}

/// Wears a catalogued skin can drop in, given its float range.
pub async fn get_wears(
    Query(params): Query<WearsQuery>,
    State(state): State<AppState>,
) -> Result<Json<WearsResponse>, AppError> {
    let item = state
        .catalog
        .get(&params.name, &params.collection)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "skin '{}' from collection '{}'",
                params.name, params.collection
            ))
        })?;

    let wears = valid_wears_for_range(item.float_min, item.float_max)?;

    Ok(Json(WearsResponse {
        name: item.name.clone(),
        collection: item.collection.clone(),
        rarity: item.rarity,
        float_min: item.float_min,
        float_max: item.float_max,
        wears,
    }))
}

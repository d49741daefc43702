use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::domain::{build_market_hash_name, parse_market_hash_name, Wear};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub name: String,
    pub wear: String,
    pub stattrak: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub market_hash_name: String,
    pub price_cents: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub market_hash_name: String,
    pub price_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct PutPricesRequest {
    pub prices: Vec<PriceUpdate>,
}

#[derive(Debug, Serialize)]
pub struct PutPricesResponse {
    pub updated: usize,
}

/// Look up one price, falling back to the price cache when the table misses.
pub async fn get_price(
    Query(params): Query<PriceQuery>,
    State(state): State<AppState>,
) -> Result<Json<PriceResponse>, AppError> {
    let wear = Wear::from_label(&params.wear)?;
    let market_hash_name =
        build_market_hash_name(&params.name, wear, params.stattrak.unwrap_or(false));

    let mut price_cents = state.prices.read().await.get(&market_hash_name);
    if price_cents.is_none() {
        if let Some(cache) = &state.cache {
            price_cents = cache.get(&market_hash_name).await?;
        }
    }

    Ok(Json(PriceResponse {
        market_hash_name,
        price_cents,
    }))
}

/// Store prices in the in-memory table and, when configured, the price cache.
///
/// The whole request is validated before anything is written.
pub async fn put_prices(
    State(state): State<AppState>,
    Json(request): Json<PutPricesRequest>,
) -> Result<Json<PutPricesResponse>, AppError> {
    let mut updates = Vec::with_capacity(request.prices.len());
    for update in &request.prices {
        if update.price_cents < 0 {
            return Err(AppError::BadRequest(format!(
                "negative price for '{}'",
                update.market_hash_name
            )));
        }
        let (name, wear, stattrak) = parse_market_hash_name(&update.market_hash_name)?;
        updates.push((build_market_hash_name(&name, wear, stattrak), update.price_cents));
    }

    state.prices.write().await.extend(updates.iter().cloned());

    if let Some(cache) = &state.cache {
        for (key, price_cents) in &updates {
            cache.set(key, *price_cents).await?;
        }
        cache.flush().await?;
    }

    info!("Stored {} prices", updates.len());
    Ok(Json(PutPricesResponse {
        updated: updates.len(),
    }))
}

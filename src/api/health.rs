use axum::extract::State;
use axum::Json;

use super::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the catalog is loaded; reports what the evaluator is working with.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let prices = state.prices.read().await.len();
    Json(serde_json::json!({
        "status": "ready",
        "catalogItems": state.catalog.len(),
        "prices": prices,
        "feesRate": state.evaluator.fees_rate(),
    }))
}

pub mod catalog;
pub mod contracts;
pub mod health;
pub mod prices;

use crate::config::Config;
use crate::domain::Catalog;
use crate::orchestration::Evaluator;
use crate::pricing::{PriceCache, PriceTable};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub evaluator: Evaluator,
    pub prices: Arc<RwLock<PriceTable>>,
    pub cache: Option<Arc<dyn PriceCache>>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        prices: PriceTable,
        cache: Option<Arc<dyn PriceCache>>,
        config: Config,
    ) -> Self {
        let evaluator = Evaluator::new(catalog.clone(), config.fees_rate);
        Self {
            catalog,
            evaluator,
            prices: Arc::new(RwLock::new(prices)),
            cache,
            config,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/contracts/evaluate", post(contracts::evaluate_contract))
        .route("/v1/catalog/wears", get(catalog::get_wears))
        .route("/v1/prices", get(prices::get_price).put(prices::put_prices))
        .layer(cors)
        .with_state(state)
}

pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod pricing;

pub use config::Config;
pub use datasource::CsvLoadError;
pub use db::{init_db, Repository};
pub use domain::{
    Catalog, CatalogLookup, ContractEntry, Outcome, Rarity, SkinCatalogItem, Wear, WearError,
};
pub use engine::{ContractError, ContractSummary, Decision};
pub use error::AppError;
pub use orchestration::{ContractResult, Evaluator};
pub use pricing::{PriceCache, PriceResolver, PriceTable};

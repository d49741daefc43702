use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::datasource::CsvLoadError;
use crate::domain::{MarketHashNameError, WearError};
use crate::engine::ContractError;
use crate::pricing::PriceCacheError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ContractError> for AppError {
    fn from(err: ContractError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<WearError> for AppError {
    fn from(err: WearError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<MarketHashNameError> for AppError {
    fn from(err: MarketHashNameError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<PriceCacheError> for AppError {
    fn from(err: PriceCacheError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<CsvLoadError> for AppError {
    fn from(err: CsvLoadError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rarity;

    #[test]
    fn test_contract_errors_are_bad_requests() {
        let err: AppError = ContractError::NoUpgradePath(Rarity::Covert).into();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let resp = AppError::NotFound("x".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

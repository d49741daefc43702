use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub catalog_path: PathBuf,
    /// Sale-side marketplace fee, e.g. 0.02 for 2%.
    pub fees_rate: f64,
    pub local_prices_path: Option<PathBuf>,
    /// JSON file or SQLite database (by suffix) holding cached prices.
    pub price_store_path: Option<PathBuf>,
    pub batch_concurrency: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Check a fee rate is in `[0, 1)`.
pub fn validate_fees_rate(key: &str, fees_rate: f64) -> Result<f64, ConfigError> {
    if (0.0..1.0).contains(&fees_rate) {
        Ok(fees_rate)
    } else {
        Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be in [0, 1), got {}", fees_rate),
        ))
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let catalog_path = env_map
            .get("CATALOG_PATH")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingEnv("CATALOG_PATH".to_string()))?;

        let fees_rate = env_map
            .get("FEES_RATE")
            .map(|s| s.as_str())
            .unwrap_or("0.02")
            .parse::<f64>()
            .map_err(|_| {
                ConfigError::InvalidValue("FEES_RATE".to_string(), "must be a number".to_string())
            })?;
        let fees_rate = validate_fees_rate("FEES_RATE", fees_rate)?;

        let local_prices_path = optional_path(&env_map, "LOCAL_PRICES_PATH");
        let price_store_path = optional_path(&env_map, "PRICE_STORE_PATH");

        let batch_concurrency = env_map
            .get("BATCH_CONCURRENCY")
            .map(|s| s.as_str())
            .unwrap_or("4")
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "BATCH_CONCURRENCY".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        Ok(Config {
            port,
            catalog_path,
            fees_rate,
            local_prices_path,
            price_store_path,
            batch_concurrency,
        })
    }
}

fn optional_path(env_map: &HashMap<String, String>, key: &str) -> Option<PathBuf> {
    env_map
        .get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("CATALOG_PATH".to_string(), "/tmp/skins.csv".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/skins.csv"));
        assert_eq!(config.fees_rate, 0.02);
        assert_eq!(config.local_prices_path, None);
        assert_eq!(config.price_store_path, None);
        assert_eq!(config.batch_concurrency, 4);
    }

    #[test]
    fn test_missing_catalog_path() {
        let mut env_map = setup_required_env();
        env_map.remove("CATALOG_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "CATALOG_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_optional_paths() {
        let mut env_map = setup_required_env();
        env_map.insert("LOCAL_PRICES_PATH".to_string(), "prices.csv".to_string());
        env_map.insert("PRICE_STORE_PATH".to_string(), "  ".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.local_prices_path, Some(PathBuf::from("prices.csv")));
        assert_eq!(config.price_store_path, None);
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_fees_rate_bounds() {
        for bad in ["1.0", "-0.1", "abc"] {
            let mut env_map = setup_required_env();
            env_map.insert("FEES_RATE".to_string(), bad.to_string());
            match Config::from_env_map(env_map) {
                Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "FEES_RATE"),
                _ => panic!("Expected InvalidValue error for {}", bad),
            }
        }

        let mut env_map = setup_required_env();
        env_map.insert("FEES_RATE".to_string(), "0".to_string());
        assert_eq!(Config::from_env_map(env_map).unwrap().fees_rate, 0.0);
    }

    #[test]
    fn test_invalid_batch_concurrency() {
        let mut env_map = setup_required_env();
        env_map.insert("BATCH_CONCURRENCY".to_string(), "0".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "BATCH_CONCURRENCY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tradeup_ev::config::validate_fees_rate;
use tradeup_ev::datasource::{read_catalog_csv, read_contract_csv, read_prices_csv};
use tradeup_ev::orchestration::{run_batch, spawn_ctrl_c_listener, BatchOptions, Evaluator};
use tradeup_ev::pricing::{open_price_cache, PriceCache, PriceTable};
use tradeup_ev::{api, Config};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Flags take precedence over the environment
    let mut env_map: HashMap<String, String> = std::env::vars().collect();
    let overrides = [
        ("CATALOG_PATH", &cli.catalog),
        ("LOCAL_PRICES_PATH", &cli.prices),
        ("PRICE_STORE_PATH", &cli.price_store),
    ];
    for (key, value) in overrides {
        if let Some(path) = value {
            env_map.insert(key.to_string(), path.display().to_string());
        }
    }
    if let Commands::Serve { port: Some(port) } = &cli.command {
        env_map.insert("PORT".to_string(), port.to_string());
    }
    let config = Config::from_env_map(env_map).context("Configuration error")?;

    let catalog = Arc::new(
        read_catalog_csv(&config.catalog_path)
            .with_context(|| format!("Failed to load catalog {}", config.catalog_path.display()))?,
    );
    let (prices, cache) = load_prices(&config).await?;

    match cli.command {
        Commands::Serve { .. } => serve(config, catalog, prices, cache).await,

        Commands::Evaluate { contract, fees } => {
            let fees_rate = resolve_fees(&config, fees)?;
            let entries = read_contract_csv(&contract)
                .with_context(|| format!("Failed to read contract {}", contract.display()))?;
            let result = Evaluator::new(catalog, fees_rate)
                .evaluate(entries, &prices)
                .with_context(|| format!("Invalid contract {}", contract.display()))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }

        Commands::Batch {
            contracts_dir,
            max,
            fees,
            concurrency,
            ok_dir,
            fail_dir,
            error_dir,
            results,
        } => {
            let fees_rate = resolve_fees(&config, fees)?;
            let mut options = BatchOptions::new(contracts_dir);
            options.max = max;
            options.concurrency = concurrency.unwrap_or(config.batch_concurrency).max(1);
            override_path(&mut options.ok_dir, ok_dir);
            override_path(&mut options.fail_dir, fail_dir);
            override_path(&mut options.error_dir, error_dir);
            override_path(&mut options.results_path, results);

            let stop = Arc::new(AtomicBool::new(false));
            let listener = spawn_ctrl_c_listener(stop.clone());
            let summary = run_batch(
                Evaluator::new(catalog, fees_rate),
                Arc::new(prices),
                &options,
                stop,
            )
            .await
            .context("Batch scan failed");
            listener.abort();

            println!("{}", serde_json::to_string_pretty(&summary?)?);
            Ok(())
        }
    }
}

fn resolve_fees(config: &Config, fees: Option<f64>) -> Result<f64> {
    match fees {
        Some(fees) => Ok(validate_fees_rate("--fees", fees)?),
        None => Ok(config.fees_rate),
    }
}

fn override_path(target: &mut PathBuf, value: Option<PathBuf>) {
    if let Some(path) = value {
        *target = path;
    }
}

/// Merge the price cache and the local price list; local prices win.
async fn load_prices(config: &Config) -> Result<(PriceTable, Option<Arc<dyn PriceCache>>)> {
    let mut prices = PriceTable::new();

    let cache = match &config.price_store_path {
        Some(path) => {
            let cache = open_price_cache(path)
                .await
                .with_context(|| format!("Failed to open price store {}", path.display()))?;
            prices.extend(cache.entries().await?);
            Some(cache)
        }
        None => None,
    };

    if let Some(path) = &config.local_prices_path {
        let local = read_prices_csv(path)
            .with_context(|| format!("Failed to load local prices {}", path.display()))?;
        prices.extend(local);
    }

    tracing::info!("{} prices available", prices.len());
    Ok((prices, cache))
}

async fn serve(
    config: Config,
    catalog: Arc<tradeup_ev::domain::Catalog>,
    prices: PriceTable,
    cache: Option<Arc<dyn PriceCache>>,
) -> Result<()> {
    let port = config.port;

    // Create router
    let app = api::create_router(api::AppState::new(catalog, prices, cache, config));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

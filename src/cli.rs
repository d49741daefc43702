//! Command line definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tradeup")]
#[command(about = "CS2 trade-up contract EV engine", long_about = None)]
pub struct Cli {
    /// Skin catalog CSV (overrides CATALOG_PATH)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Local prices CSV (overrides LOCAL_PRICES_PATH)
    #[arg(long, global = true)]
    pub prices: Option<PathBuf>,

    /// Price cache, JSON or .sqlite/.db (overrides PRICE_STORE_PATH)
    #[arg(long, global = true)]
    pub price_store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Evaluate one contract CSV and print the result as JSON
    #[command(visible_alias = "e")]
    Evaluate {
        /// Contract CSV with ten entries
        #[arg(short, long)]
        contract: PathBuf,

        /// Sale fee rate, e.g. 0.02 (overrides FEES_RATE)
        #[arg(long)]
        fees: Option<f64>,
    },

    /// Evaluate every contract CSV in a directory and sort them by verdict
    #[command(visible_alias = "b")]
    Batch {
        /// Directory holding contract CSVs
        #[arg(long)]
        contracts_dir: PathBuf,

        /// Stop after this many evaluations
        #[arg(long)]
        max: Option<usize>,

        /// Sale fee rate, e.g. 0.02 (overrides FEES_RATE)
        #[arg(long)]
        fees: Option<f64>,

        /// Contracts evaluated in parallel (overrides BATCH_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Destination for profitable contracts [default: <contracts-dir>/ok]
        #[arg(long)]
        ok_dir: Option<PathBuf>,

        /// Destination for unprofitable or unpriced contracts [default: <contracts-dir>/fail]
        #[arg(long)]
        fail_dir: Option<PathBuf>,

        /// Destination for invalid contracts [default: <contracts-dir>/error]
        #[arg(long)]
        error_dir: Option<PathBuf>,

        /// Scan results CSV [default: <contracts-dir>/scan_results.csv]
        #[arg(long)]
        results: Option<PathBuf>,
    },
}

//! Directory scanner: evaluates every contract CSV in a folder and sorts the
//! files into `ok/`, `fail/` and `error/` by verdict.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::evaluator::{ContractResult, Evaluator};
use crate::datasource::{read_contract_csv, CsvLoadError};
use crate::engine::{ContractError, Decision};
use crate::pricing::cache::write_atomic;
use crate::pricing::PriceResolver;

pub const DEFAULT_RESULTS_FILE: &str = "scan_results.csv";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot list contracts: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("cannot write scan results: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a single contract could not be evaluated.
#[derive(Debug, Error)]
enum ItemError {
    #[error(transparent)]
    Load(#[from] CsvLoadError),
    #[error(transparent)]
    Contract(#[from] ContractError),
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub contracts_dir: PathBuf,
    pub ok_dir: PathBuf,
    pub fail_dir: PathBuf,
    pub error_dir: PathBuf,
    pub results_path: PathBuf,
    pub concurrency: usize,
    /// Stop once this many contracts have been evaluated. Unreadable or
    /// invalid contracts do not count.
    pub max: Option<usize>,
}

impl BatchOptions {
    /// Defaults: `ok/`, `fail/`, `error/` and `scan_results.csv` inside `contracts_dir`.
    pub fn new(contracts_dir: impl Into<PathBuf>) -> Self {
        let contracts_dir = contracts_dir.into();
        Self {
            ok_dir: contracts_dir.join("ok"),
            fail_dir: contracts_dir.join("fail"),
            error_dir: contracts_dir.join("error"),
            results_path: contracts_dir.join(DEFAULT_RESULTS_FILE),
            contracts_dir,
            concurrency: 4,
            max: None,
        }
    }

    fn dir_for(&self, status: ScanStatus) -> &Path {
        match status {
            ScanStatus::Ok => &self.ok_dir,
            ScanStatus::Fail => &self.fail_dir,
            ScanStatus::Error => &self.error_dir,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// Profitable.
    Ok,
    /// Not profitable, or pricing incomplete.
    Fail,
    /// Unreadable file or structurally invalid contract.
    Error,
}

/// One line of the scan results CSV.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRow {
    pub timestamp: String,
    pub file: String,
    pub status: ScanStatus,
    pub decision: Option<Decision>,
    pub total_inputs_cost_cents: Option<i64>,
    pub ev_gross_cents: Option<f64>,
    pub ev_net_cents: Option<f64>,
    pub pl_expected_net_cents: Option<f64>,
    pub roi_net: Option<f64>,
    pub prob_profit: Option<f64>,
    pub break_even_price_cents: Option<f64>,
    pub moved_to: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub found: usize,
    pub evaluated: usize,
    pub ok: usize,
    pub fail: usize,
    pub error: usize,
    /// Files left in place because the run was stopped.
    pub skipped: usize,
}

#[derive(Default)]
struct ScanState {
    rows: Vec<ScanRow>,
    summary: BatchSummary,
    in_flight: usize,
}

impl ScanState {
    /// Contracts that produced a verdict.
    fn counted(&self) -> usize {
        self.summary.ok + self.summary.fail
    }
}

/// Set `stop` on Ctrl-C. In-flight evaluations still finish.
pub fn spawn_ctrl_c_listener(stop: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, finishing in-flight contracts");
            stop.store(true, Ordering::SeqCst);
        }
    })
}

/// Contract CSVs directly inside the contracts directory, sorted by name.
fn collect_contract_files(options: &BatchOptions) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(&options.contracts_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv && path != options.results_path.as_path() {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Evaluate every contract in `options.contracts_dir`.
///
/// At most `options.concurrency` contracts are in flight. Once `stop` is set
/// or `options.max` contracts have reached a verdict, remaining files are
/// skipped and left in place. This run's rows are appended to the results
/// CSV once, atomically, after all in-flight work has drained.
pub async fn run_batch(
    evaluator: Evaluator,
    resolver: Arc<dyn PriceResolver>,
    options: &BatchOptions,
    stop: Arc<AtomicBool>,
) -> Result<BatchSummary, BatchError> {
    let files = collect_contract_files(options)?;
    for dir in [&options.ok_dir, &options.fail_dir, &options.error_dir] {
        tokio::fs::create_dir_all(dir).await?;
    }
    info!(
        "Scanning {} contracts in {} (concurrency {})",
        files.len(),
        options.contracts_dir.display(),
        options.concurrency
    );

    let state = Arc::new(Mutex::new(ScanState {
        summary: BatchSummary {
            found: files.len(),
            ..BatchSummary::default()
        },
        ..ScanState::default()
    }));
    let finished = Arc::new(Notify::new());

    stream::iter(files)
        .map(|path| {
            let evaluator = evaluator.clone();
            let resolver = resolver.clone();
            let state = state.clone();
            let finished = finished.clone();
            let stop = stop.clone();
            async move {
                if !admit(&state, &finished, options.max, &stop).await {
                    debug!("Skipping {}", path.display());
                    state.lock().await.summary.skipped += 1;
                    return;
                }
                let row = process_file(path, evaluator, resolver, options).await;
                record(&state, row).await;
                finished.notify_waiters();
            }
        })
        .buffer_unordered(options.concurrency.max(1))
        .collect::<Vec<()>>()
        .await;

    let (mut rows, summary) = {
        let mut guard = state.lock().await;
        (std::mem::take(&mut guard.rows), guard.summary.clone())
    };
    rows.sort_by(|a, b| a.file.cmp(&b.file));
    append_scan_results(&options.results_path, &rows).await?;

    info!(
        "Scan finished: {} evaluated, {} ok, {} fail, {} error, {} skipped",
        summary.evaluated, summary.ok, summary.fail, summary.error, summary.skipped
    );
    Ok(summary)
}

/// Wait for a slot under `max`. In-flight contracts hold a slot until they
/// finish, and an error verdict gives it back.
async fn admit(
    state: &Mutex<ScanState>,
    finished: &Notify,
    max: Option<usize>,
    stop: &AtomicBool,
) -> bool {
    loop {
        let notified = finished.notified();
        {
            let mut guard = state.lock().await;
            let counted = guard.counted();
            if stop.load(Ordering::SeqCst) || max.is_some_and(|max| counted >= max) {
                return false;
            }
            if max.map_or(true, |max| counted + guard.in_flight < max) {
                guard.in_flight += 1;
                return true;
            }
        }
        notified.await;
    }
}

async fn record(state: &Mutex<ScanState>, row: ScanRow) {
    let mut guard = state.lock().await;
    guard.in_flight -= 1;
    guard.summary.evaluated += 1;
    match row.status {
        ScanStatus::Ok => guard.summary.ok += 1,
        ScanStatus::Fail => guard.summary.fail += 1,
        ScanStatus::Error => guard.summary.error += 1,
    }
    guard.rows.push(row);
}

async fn process_file(
    path: PathBuf,
    evaluator: Evaluator,
    resolver: Arc<dyn PriceResolver>,
    options: &BatchOptions,
) -> ScanRow {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let task_path = path.clone();
    let outcome = tokio::task::spawn_blocking(move || -> Result<ContractResult, ItemError> {
        let entries = read_contract_csv(&task_path)?;
        Ok(evaluator.evaluate(entries, resolver.as_ref())?)
    })
    .await;

    let mut row = ScanRow {
        timestamp: chrono::Utc::now().to_rfc3339(),
        file: file.clone(),
        status: ScanStatus::Error,
        decision: None,
        total_inputs_cost_cents: None,
        ev_gross_cents: None,
        ev_net_cents: None,
        pl_expected_net_cents: None,
        roi_net: None,
        prob_profit: None,
        break_even_price_cents: None,
        moved_to: None,
        message: String::new(),
    };

    match outcome {
        Ok(Ok(result)) => {
            let summary = result.summary;
            row.status = match summary.decision {
                Decision::Profitable => ScanStatus::Ok,
                Decision::NotProfitable | Decision::Incomplete => ScanStatus::Fail,
            };
            row.decision = Some(summary.decision);
            row.total_inputs_cost_cents = summary.total_inputs_cost_cents;
            row.ev_gross_cents = summary.ev_gross_cents;
            row.ev_net_cents = summary.ev_net_cents;
            row.pl_expected_net_cents = summary.pl_expected_net_cents;
            row.roi_net = summary.roi_net;
            row.prob_profit = summary.prob_profit;
            row.break_even_price_cents = summary.break_even_price_cents;
        }
        Ok(Err(e)) => {
            warn!("Contract {} failed: {}", file, e);
            row.message = e.to_string();
        }
        Err(e) => {
            warn!("Evaluation task for {} failed: {}", file, e);
            row.message = e.to_string();
        }
    }

    let dest = options.dir_for(row.status).join(&file);
    match tokio::fs::rename(&path, &dest).await {
        Ok(()) => row.moved_to = Some(dest.display().to_string()),
        Err(e) => {
            warn!("Could not move {} to {}: {}", path.display(), dest.display(), e);
            if row.message.is_empty() {
                row.message = format!("move failed: {}", e);
            }
        }
    }

    row
}

/// Append `rows` to the log at `path`. The header is written only when the
/// log is new or empty.
async fn append_scan_results(path: &Path, rows: &[ScanRow]) -> Result<(), BatchError> {
    let mut existing = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    if !existing.is_empty() && !existing.ends_with(b"\n") {
        existing.push(b'\n');
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(existing.is_empty())
        .from_writer(existing);
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;
    debug!("Appended {} scan rows", rows.len());
    Ok(())
}

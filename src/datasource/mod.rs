//! CSV readers for the skin catalog, contracts and local price lists.
//!
//! Column names vary between exports, so each logical column is an ordered
//! list of candidate headers. For every row the candidates are probed in
//! priority order and the first present, non-empty and parseable value wins.

use csv::StringRecord;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub mod catalog_csv;
pub mod contract_csv;
pub mod prices_csv;

pub use catalog_csv::{parse_catalog_csv, read_catalog_csv};
pub use contract_csv::{parse_contract_csv, read_contract_csv};
pub use prices_csv::{parse_cents, parse_prices_csv, read_prices_csv};

#[derive(Debug, Error)]
pub enum CsvLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("invalid row at line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, CsvLoadError> {
    std::fs::read(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub(crate) fn reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes)
}

/// Header positions of every candidate present, in candidate priority order.
pub(crate) fn columns(headers: &StringRecord, candidates: &[&str]) -> Vec<usize> {
    candidates
        .iter()
        .filter_map(|cand| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == *cand)
        })
        .collect()
}

/// Like [`columns`], but at least one candidate must be present.
pub(crate) fn required_columns(
    headers: &StringRecord,
    candidates: &[&str],
    missing: &mut Vec<String>,
) -> Vec<usize> {
    let found = columns(headers, candidates);
    if found.is_empty() {
        missing.push(candidates[0].to_string());
    }
    found
}

/// First non-empty value among `cols`.
pub(crate) fn first_text<'r>(record: &'r StringRecord, cols: &[usize]) -> Option<&'r str> {
    cols.iter()
        .filter_map(|&i| record.get(i))
        .find(|v| !v.is_empty())
}

/// First non-empty value among `cols` that parses as `T`.
///
/// `Ok(None)` when every candidate is empty; `Err(raw)` when some value was
/// present but none parsed.
pub(crate) fn probe<T: FromStr>(record: &StringRecord, cols: &[usize]) -> Result<Option<T>, String> {
    let mut rejected = None;
    for value in cols.iter().filter_map(|&i| record.get(i)) {
        if value.is_empty() {
            continue;
        }
        match value.parse::<T>() {
            Ok(parsed) => return Ok(Some(parsed)),
            Err(_) => {
                rejected.get_or_insert_with(|| value.to_string());
            }
        }
    }
    match rejected {
        Some(raw) => Err(raw),
        None => Ok(None),
    }
}

pub(crate) fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

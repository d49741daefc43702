use std::path::Path;
use tracing::debug;

use super::{columns, first_text, line_of, probe, read_file, reader, required_columns, CsvLoadError};
use crate::domain::{ContractEntry, Rarity};

const NAME: &[&str] = &["Name", "Arma"];
const COLLECTION: &[&str] = &["Collection", "Coleccion"];
const RARITY: &[&str] = &["Rarity", "Grado"];
const FLOAT: &[&str] = &["Float", "FloatValue"];
const PRICE_CENTS: &[&str] = &["PriceCents", "price_cents"];
const STATTRAK: &[&str] = &["StatTrak", "Stattrak"];
const FLOAT_MIN: &[&str] = &["FloatMin", "Float min", "Float_min"];
const FLOAT_MAX: &[&str] = &["FloatMax", "Float max", "Float_max"];

pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y"
    )
}

/// Read a contract CSV: `Name,Collection,Rarity,Float[,PriceCents][,StatTrak][,FloatMin,FloatMax]`.
///
/// The entry count is not checked here; that is the validator's job.
pub fn read_contract_csv(path: &Path) -> Result<Vec<ContractEntry>, CsvLoadError> {
    let bytes = read_file(path)?;
    let entries = parse_contract_csv(&bytes)?;
    debug!("Read {} contract entries from {}", entries.len(), path.display());
    Ok(entries)
}

pub fn parse_contract_csv(bytes: &[u8]) -> Result<Vec<ContractEntry>, CsvLoadError> {
    let mut rdr = reader(bytes);
    let headers = rdr.headers()?.clone();

    let mut missing = Vec::new();
    let name_cols = required_columns(&headers, NAME, &mut missing);
    let collection_cols = required_columns(&headers, COLLECTION, &mut missing);
    let rarity_cols = required_columns(&headers, RARITY, &mut missing);
    let float_cols = required_columns(&headers, FLOAT, &mut missing);
    if !missing.is_empty() {
        return Err(CsvLoadError::MissingColumns(missing));
    }
    let price_cols = columns(&headers, PRICE_CENTS);
    let stattrak_cols = columns(&headers, STATTRAK);
    let min_cols = columns(&headers, FLOAT_MIN);
    let max_cols = columns(&headers, FLOAT_MAX);

    let mut entries = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = line_of(&record);
        let invalid = |message: String| CsvLoadError::InvalidRow { line, message };

        let name = first_text(&record, &name_cols)
            .ok_or_else(|| invalid("empty name".to_string()))?;
        let collection = first_text(&record, &collection_cols)
            .ok_or_else(|| invalid(format!("empty collection for {name}")))?;
        let rarity = probe::<Rarity>(&record, &rarity_cols)
            .map_err(|raw| invalid(format!("unknown rarity {raw:?} for {name}")))?
            .ok_or_else(|| invalid(format!("empty rarity for {name}")))?;
        let float_value = probe::<f64>(&record, &float_cols)
            .map_err(|raw| invalid(format!("bad float {raw:?} for {name}")))?
            .unwrap_or(0.0);

        let mut entry = ContractEntry::new(name, collection, rarity, float_value);
        // A price that does not parse is treated as unknown.
        entry.price_cents = probe::<i64>(&record, &price_cols).ok().flatten();
        entry.stattrak = first_text(&record, &stattrak_cols).is_some_and(is_truthy);
        entry.float_min = probe::<f64>(&record, &min_cols).ok().flatten();
        entry.float_max = probe::<f64>(&record, &max_cols).ok().flatten();

        entries.push(entry);
    }

    Ok(entries)
}

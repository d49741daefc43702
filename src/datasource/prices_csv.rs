use std::path::Path;
use tracing::{info, warn};

use super::contract_csv::is_truthy;
use super::{columns, first_text, line_of, read_file, reader, CsvLoadError};
use crate::domain::{build_market_hash_name, parse_market_hash_name, Wear};
use crate::pricing::PriceTable;

const MARKET_HASH_NAME: &[&str] = &["MarketHashName", "market_hash_name"];
const NAME: &[&str] = &["Name", "Arma"];
const WEAR: &[&str] = &["Wear", "Exterior"];
const PRICE: &[&str] = &["PriceCents", "price_cents", "Price"];
const STATTRAK: &[&str] = &["StatTrak", "Stattrak"];

/// Parse a price cell into cents.
///
/// Integers are cents; anything with a decimal point is dollars, rounded to
/// the nearest cent. Negative or unparseable values yield `None`.
pub fn parse_cents(raw: &str) -> Option<i64> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    let cents = if cleaned.contains('.') {
        let dollars = cleaned.parse::<f64>().ok()?;
        if !dollars.is_finite() {
            return None;
        }
        (dollars * 100.0).round() as i64
    } else {
        cleaned.parse::<i64>().ok()?
    };
    (cents >= 0).then_some(cents)
}

/// Load a local price list into a [`PriceTable`].
pub fn read_prices_csv(path: &Path) -> Result<PriceTable, CsvLoadError> {
    let bytes = read_file(path)?;
    let table = parse_prices_csv(&bytes)?;
    info!("Loaded {} local prices from {}", table.len(), path.display());
    Ok(table)
}

/// Accepts either `MarketHashName,PriceCents` or `Name,Wear,PriceCents[,StatTrak]`.
///
/// Keys are normalized to canonical market hash names. Rows with an unusable
/// price, wear or name are skipped with a warning.
pub fn parse_prices_csv(bytes: &[u8]) -> Result<PriceTable, CsvLoadError> {
    let mut rdr = reader(bytes);
    let headers = rdr.headers()?.clone();

    let price_cols = columns(&headers, PRICE);
    let mhn_cols = columns(&headers, MARKET_HASH_NAME);
    let name_cols = columns(&headers, NAME);
    let wear_cols = columns(&headers, WEAR);
    let stattrak_cols = columns(&headers, STATTRAK);

    let by_market_hash_name = !mhn_cols.is_empty();
    let mut missing = Vec::new();
    if price_cols.is_empty() {
        missing.push(PRICE[0].to_string());
    }
    if !by_market_hash_name {
        if name_cols.is_empty() {
            missing.push(NAME[0].to_string());
        }
        if wear_cols.is_empty() {
            missing.push(WEAR[0].to_string());
        }
    }
    if !missing.is_empty() {
        return Err(CsvLoadError::MissingColumns(missing));
    }

    let mut table = PriceTable::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = line_of(&record);

        let Some(price) = first_text(&record, &price_cols).and_then(parse_cents) else {
            warn!("Skipping price row at line {}: unusable price", line);
            skipped += 1;
            continue;
        };

        let key = if by_market_hash_name {
            let raw = first_text(&record, &mhn_cols).unwrap_or_default();
            match parse_market_hash_name(raw) {
                Ok((name, wear, stattrak)) => build_market_hash_name(&name, wear, stattrak),
                Err(e) => {
                    warn!("Skipping price row at line {}: {}", line, e);
                    skipped += 1;
                    continue;
                }
            }
        } else {
            let name = first_text(&record, &name_cols).unwrap_or_default();
            let wear = first_text(&record, &wear_cols)
                .map(Wear::from_label)
                .transpose();
            match (name.is_empty(), wear) {
                (false, Ok(Some(wear))) => {
                    let stattrak = first_text(&record, &stattrak_cols).is_some_and(is_truthy);
                    build_market_hash_name(name, wear, stattrak)
                }
                (_, Err(e)) => {
                    warn!("Skipping price row at line {}: {}", line, e);
                    skipped += 1;
                    continue;
                }
                _ => {
                    warn!("Skipping price row at line {}: missing name or wear", line);
                    skipped += 1;
                    continue;
                }
            }
        };

        table.insert(key, price);
    }

    if skipped > 0 {
        warn!("Skipped {} unusable price rows", skipped);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceResolver;

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("1234"), Some(1234));
        assert_eq!(parse_cents("12.34"), Some(1234));
        assert_eq!(parse_cents("$0.5"), Some(50));
        assert_eq!(parse_cents("1,250"), Some(1250));
        assert_eq!(parse_cents("3.999"), Some(400));
        assert_eq!(parse_cents(""), None);
        assert_eq!(parse_cents("abc"), None);
        assert_eq!(parse_cents("-5"), None);
    }

    #[test]
    fn test_market_hash_name_schema() {
        let csv = "MarketHashName,PriceCents\n\
                   AK-47 | Cartel (Field-Tested),1520\n\
                   StatTrak™ AK-47 | Cartel (Minimal Wear),41.25\n\
                   broken name,100\n\
                   AK-47 | Cartel (Well-Worn),\n";

        let table = parse_prices_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.price_for("AK-47 | Cartel", Wear::FieldTested, false), Some(1520));
        assert_eq!(table.price_for("AK-47 | Cartel", Wear::MinimalWear, true), Some(4125));
        assert_eq!(table.price_for("AK-47 | Cartel", Wear::WellWorn, false), None);
    }

    #[test]
    fn test_name_wear_schema() {
        let csv = "Name,Wear,PriceCents,StatTrak\n\
                   P250 | Asiimov,FT,300,\n\
                   P250 | Asiimov,battle-scarred,210,1\n\
                   P250 | Asiimov,shiny,999,\n";

        let table = parse_prices_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.price_for("P250 | Asiimov", Wear::FieldTested, false), Some(300));
        assert_eq!(table.price_for("P250 | Asiimov", Wear::BattleScarred, true), Some(210));
    }

    #[test]
    fn test_missing_columns() {
        let csv = "Name,PriceCents\nA,1\n";
        match parse_prices_csv(csv.as_bytes()) {
            Err(CsvLoadError::MissingColumns(cols)) => assert_eq!(cols, vec!["Wear".to_string()]),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }
}

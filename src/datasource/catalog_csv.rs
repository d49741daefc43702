use std::path::Path;
use tracing::info;

use super::{columns, first_text, line_of, probe, read_file, reader, required_columns, CsvLoadError};
use crate::domain::{Catalog, Rarity, SkinCatalogItem};

const NAME: &[&str] = &["Arma", "Name", "Weapon"];
const COLLECTION: &[&str] = &["Coleccion", "Collection"];
const RARITY: &[&str] = &["Grado", "Rarity", "Grade"];
const FLOAT_MIN: &[&str] = &["FloatMin", "Float min", "Float_min", "Min"];
const FLOAT_MAX: &[&str] = &["FloatMax", "Float max", "Float_max", "Max"];

/// Load the skin catalog from a CSV export and index it.
pub fn read_catalog_csv(path: &Path) -> Result<Catalog, CsvLoadError> {
    let bytes = read_file(path)?;
    let items = parse_catalog_csv(&bytes)?;
    info!("Loaded {} catalog items from {}", items.len(), path.display());
    Ok(Catalog::new(items))
}

/// Parse catalog rows. Blank float bounds default to the full [0, 1] range.
pub fn parse_catalog_csv(bytes: &[u8]) -> Result<Vec<SkinCatalogItem>, CsvLoadError> {
    let mut rdr = reader(bytes);
    let headers = rdr.headers()?.clone();

    let mut missing = Vec::new();
    let name_cols = required_columns(&headers, NAME, &mut missing);
    let collection_cols = required_columns(&headers, COLLECTION, &mut missing);
    let rarity_cols = required_columns(&headers, RARITY, &mut missing);
    if !missing.is_empty() {
        return Err(CsvLoadError::MissingColumns(missing));
    }
    let min_cols = columns(&headers, FLOAT_MIN);
    let max_cols = columns(&headers, FLOAT_MAX);

    let mut items = Vec::new();
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
        let float_min = probe::<f64>(&record, &min_cols)
            .map_err(|raw| invalid(format!("bad float min {raw:?} for {name}")))?
            .unwrap_or(0.0);
        let float_max = probe::<f64>(&record, &max_cols)
            .map_err(|raw| invalid(format!("bad float max {raw:?} for {name}")))?
            .unwrap_or(1.0);

        items.push(SkinCatalogItem::new(name, collection, rarity, float_min, float_max));
    }

    Ok(items)
}

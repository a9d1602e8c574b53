//! CSV Ingestion
//!
//! Turns uploaded bytes into a typed [`Table`].
//!
//! Parsing is delegated to the `csv` crate in strict mode: every data record
//! must have exactly as many fields as the header. After the records are read,
//! each column goes through a type-inference pass and becomes either
//! [`ColumnData::Numeric`] or [`ColumnData::Text`].

use std::collections::HashSet;

use super::error::{ParseError, ParseResult};
use super::types::{Column, ColumnData, Table};

/// Byte-order marker written by spreadsheet tools and our own sample file
const UTF8_BOM: &str = "\u{feff}";

/// Cell values read as missing, compared after trimming whitespace
pub const NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
    "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Whether a raw cell counts as missing
pub fn is_missing(raw: &str) -> bool {
    NA_VALUES.contains(&raw.trim())
}

/// Parse comma-separated bytes into a table
pub fn parse_csv(bytes: &[u8]) -> ParseResult<Table> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::Encoding {
        valid_up_to: e.valid_up_to(),
    })?;
    parse_csv_str(text)
}

/// Parse comma-separated text into a table
pub fn parse_csv_str(text: &str) -> ParseResult<Table> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut records = 0usize;

    for result in reader.records() {
        let record = result?;
        for (column, field) in raw.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
        records += 1;
    }

    // A lone blank header line with nothing under it carries no columns
    let blank_header = headers.len() == 1 && headers[0].trim().is_empty();
    if headers.is_empty() || (blank_header && records == 0) {
        return Err(ParseError::Empty);
    }

    let names = normalize_headers(headers.iter());

    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| Column {
            name,
            data: infer_column(cells),
        })
        .collect();

    let table = Table::new(columns)?;

    tracing::debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        missing = table.missing_count(),
        "Parsed CSV upload"
    );

    Ok(table)
}

/// Name blank headers `Unnamed: {i}` and suffix repeats with `.1`, `.2`, ...
fn normalize_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for (idx, header) in headers.enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        names.push(name);
    }

    names
}

/// Numeric when every non-missing cell parses as f64, text otherwise
fn infer_column(cells: Vec<String>) -> ColumnData {
    let numeric: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                return Some(None);
            }
            match cell.trim().parse::<f64>() {
                Ok(v) if v.is_nan() => Some(None),
                Ok(v) => Some(Some(v)),
                Err(_) => None,
            }
        })
        .collect();

    match numeric {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Text(
            cells
                .into_iter()
                .map(|cell| if is_missing(&cell) { None } else { Some(cell) })
                .collect(),
        ),
    }
}

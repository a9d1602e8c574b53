//! Group-by-and-sum over a table
//!
//! Totals a numeric column per distinct key, e.g. sales per region.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

use crate::table::{Cell, ColumnData, Table};

/// Errors from grouping
#[derive(Error, Debug)]
pub enum GroupError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column is not numeric: {0}")]
    NotNumeric(String),
}

/// Total for one key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
    /// Rows in the group, including rows whose value is missing
    pub count: usize,
}

/// Sum `value` per distinct `by`, sorted by key.
///
/// Rows with a missing key are dropped. Numeric keys sort numerically.
pub fn group_sum(table: &Table, by: &str, value: &str) -> Result<Vec<GroupTotal>, GroupError> {
    let key_column = table
        .column(by)
        .ok_or_else(|| GroupError::ColumnNotFound(by.to_string()))?;
    let value_column = table
        .column(value)
        .ok_or_else(|| GroupError::ColumnNotFound(value.to_string()))?;

    let values = match &value_column.data {
        ColumnData::Numeric(v) => v,
        ColumnData::Text(_) => return Err(GroupError::NotNumeric(value.to_string())),
    };

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Cell<'_>, GroupTotal)> = Vec::new();

    for (row, amount) in values.iter().enumerate() {
        let key_cell = match key_column.data.get(row) {
            // -0 and 0 are the same key
            Some(Cell::Number(n)) if n == 0.0 => Cell::Number(0.0),
            Some(cell) if !cell.is_missing() => cell,
            _ => continue,
        };

        let key = key_cell.to_string();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((
                key_cell,
                GroupTotal {
                    key,
                    total: 0.0,
                    count: 0,
                },
            ));
            groups.len() - 1
        });

        let group = &mut groups[slot].1;
        group.total += amount.unwrap_or(0.0);
        group.count += 1;
    }

    groups.sort_by(|(a, _), (b, _)| compare_keys(a, b));

    Ok(groups.into_iter().map(|(_, total)| total).collect())
}

fn compare_keys(a: &Cell<'_>, b: &Cell<'_>) -> Ordering {
    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.total_cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

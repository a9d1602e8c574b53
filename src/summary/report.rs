//! Summary report over a whole table

use serde::Serialize;

use super::stats::ColumnStats;
use crate::table::{ColumnData, Table};

/// Statistics for one numeric column, labelled with its name
#[derive(Debug, Clone, Serialize)]
pub struct NamedStats {
    pub column: String,
    #[serde(flatten)]
    pub stats: ColumnStats,
}

/// Read-only aggregate view of a table
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub row_count: usize,
    pub column_count: usize,
    pub missing_count: usize,
    /// One entry per numeric column, in column order
    pub statistics: Vec<NamedStats>,
}

impl SummaryReport {
    /// Statistics for a named column, if it is numeric
    pub fn stats_for(&self, column: &str) -> Option<&ColumnStats> {
        self.statistics
            .iter()
            .find(|s| s.column == column)
            .map(|s| &s.stats)
    }
}

/// Summarize a table. Never fails; undefined statistics are NaN.
pub fn summarize(table: &Table) -> SummaryReport {
    let statistics = table
        .columns()
        .iter()
        .filter_map(|column| match &column.data {
            ColumnData::Numeric(values) => Some(NamedStats {
                column: column.name.clone(),
                stats: ColumnStats::compute(values),
            }),
            ColumnData::Text(_) => None,
        })
        .collect();

    SummaryReport {
        row_count: table.row_count(),
        column_count: table.column_count(),
        missing_count: table.missing_count(),
        statistics,
    }
}

//! Core data types for Tabula
//!
//! A [`Table`] is an ordered list of named, typed columns that all share the
//! same length.

use serde::Serialize;
use std::fmt;

use super::error::{ParseError, ParseResult};

/// Values of one column, tagged with the inferred type.
///
/// `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnData {
    /// Number of cells, missing included
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    /// Count of missing cells
    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Borrow a single cell
    pub fn get(&self, row: usize) -> Option<Cell<'_>> {
        match self {
            ColumnData::Numeric(v) => v.get(row).map(|c| match c {
                Some(n) => Cell::Number(*n),
                None => Cell::Missing,
            }),
            ColumnData::Text(v) => v.get(row).map(|c| match c {
                Some(s) => Cell::Text(s.as_str()),
                None => Cell::Missing,
            }),
        }
    }

    fn truncated(&self, n: usize) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(v.iter().take(n).copied().collect()),
            ColumnData::Text(v) => ColumnData::Text(v.iter().take(n).cloned().collect()),
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }
}

/// Borrowed view of a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl Cell<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Display string, `None` for a missing cell
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64's Display is the shortest round-trip form: 25.0 prints as "25"
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Missing => Ok(()),
        }
    }
}

/// In-memory row/column dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from columns, rejecting columns of unequal length
    pub fn new(columns: Vec<Column>) -> ParseResult<Self> {
        let row_count = columns.first().map(|c| c.data.len()).unwrap_or(0);

        if let Some(bad) = columns.iter().find(|c| c.data.len() != row_count) {
            return Err(ParseError::ColumnLength {
                column: bad.name.clone(),
                expected: row_count,
                found: bad.data.len(),
            });
        }

        Ok(Self { columns, row_count })
    }

    /// Build from columns already known to share `row_count` cells
    pub(crate) fn from_equal_columns(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.data.len() == row_count));
        Self { columns, row_count }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Find a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Total missing cells across the whole table
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(|c| c.data.missing_count()).sum()
    }

    /// Cells of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<Cell<'_>>> {
        if index >= self.row_count {
            return None;
        }
        self.columns.iter().map(|c| c.data.get(index)).collect()
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell<'_>>> + '_ {
        (0..self.row_count).filter_map(move |i| self.row(i))
    }

    /// First `n` rows as a new table
    pub fn head(&self, n: usize) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data: c.data.truncated(n),
            })
            .collect();

        Table {
            columns,
            row_count: self.row_count.min(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        Table::new(vec![
            Column::text(
                "name",
                vec![Some("ann".into()), None, Some("cy".into())],
            ),
            Column::numeric("age", vec![Some(31.0), Some(27.5), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_missing() {
        let table = people();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.missing_count(), 2);
        assert_eq!(table.headers(), vec!["name", "age"]);
    }

    #[test]
    fn test_unequal_columns_rejected() {
        let result = Table::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::numeric("b", vec![Some(1.0)]),
        ]);

        assert!(matches!(
            result,
            Err(ParseError::ColumnLength { ref column, expected: 2, found: 1 }) if column == "b"
        ));
    }

    #[test]
    fn test_row_access() {
        let table = people();
        let row = table.row(1).unwrap();
        assert_eq!(row, vec![Cell::Missing, Cell::Number(27.5)]);
        assert!(table.row(3).is_none());
        assert_eq!(table.rows().count(), 3);
    }

    #[test]
    fn test_head() {
        let table = people();
        let head = table.head(2);
        assert_eq!(head.row_count(), 2);
        assert_eq!(head.column_count(), 2);

        let all = table.head(100);
        assert_eq!(all, table);
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(Cell::Number(25.0).to_string(), "25");
        assert_eq!(Cell::Number(0.5).to_string(), "0.5");
        assert_eq!(Cell::Text("台北").render(), Some("台北".to_string()));
        assert_eq!(Cell::Missing.render(), None);
    }
}

//! Head preview of a table, rendered for display

use serde::Serialize;

use crate::table::{ColumnKind, Table};

/// Rows shown when no limit is configured
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Column header in a preview
#[derive(Debug, Clone, Serialize)]
pub struct PreviewColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// First rows of a table as display strings; missing cells are `None`
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub columns: Vec<PreviewColumn>,
    pub rows: Vec<Vec<Option<String>>>,
    pub total_rows: usize,
    pub truncated: bool,
}

impl Preview {
    /// Render the first `limit` rows of `table`
    pub fn of(table: &Table, limit: usize) -> Self {
        let head = table.head(limit);

        let columns = head
            .columns()
            .iter()
            .map(|c| PreviewColumn {
                name: c.name.clone(),
                kind: c.kind(),
            })
            .collect();

        let rows = head
            .rows()
            .map(|row| row.iter().map(|cell| cell.render()).collect())
            .collect();

        Self {
            columns,
            rows,
            total_rows: table.row_count(),
            truncated: table.row_count() > head.row_count(),
        }
    }
}

//! Example file
//!
//! The pane offers this file for download while no upload is present.

use super::error::ParseResult;
use super::types::{Column, Table};

/// Download name of the example file
pub const SAMPLE_FILENAME: &str = "sample.csv";

/// MIME type of every CSV the pane serves
pub const CSV_MIME: &str = "text/csv";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The fixed example table: name, age, city
pub fn sample_table() -> Table {
    let text = |values: &[&str]| values.iter().map(|v| Some(v.to_string())).collect();

    Table::from_equal_columns(
        vec![
            Column::text("姓名", text(&["張三", "李四", "王五"])),
            Column::numeric("年齡", vec![Some(25.0), Some(30.0), Some(35.0)]),
            Column::text("城市", text(&["台北", "台中", "高雄"])),
        ],
        3,
    )
}

/// Serialize a table as comma-separated UTF-8 with a leading byte-order marker.
///
/// Missing cells are written as empty fields.
pub fn table_to_csv(table: &Table) -> ParseResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| super::ParseError::Csv(e.to_string()))
}

/// Bytes of the downloadable example file
pub fn sample_csv() -> ParseResult<Vec<u8>> {
    table_to_csv(&sample_table())
}

//! Ingestion error types
//!
//! Defines all errors that can occur while turning uploaded bytes into a Table.

use thiserror::Error;

/// Errors that can occur while parsing an upload
#[derive(Error, Debug)]
pub enum ParseError {
    /// Bytes are not valid UTF-8
    #[error("File is not valid UTF-8 (invalid byte at offset {valid_up_to})")]
    Encoding { valid_up_to: usize },

    /// No header row at all
    #[error("No columns to parse from file")]
    Empty,

    /// A data row has a different field count than the header
    #[error("Line {line}: expected {expected} fields, found {found}")]
    Ragged { line: u64, expected: u64, found: u64 },

    /// Columns handed to `Table::new` disagree on length
    #[error("Column '{column}' has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Any other reader failure
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => ParseError::Ragged {
                line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
                expected: *expected_len,
                found: *len,
            },
            _ => ParseError::Csv(err.to_string()),
        }
    }
}

/// Result type alias for ingestion
pub type ParseResult<T> = Result<T, ParseError>;

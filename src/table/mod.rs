//! Tabula Table Layer
//!
//! This module owns the in-memory dataset and how it gets in and out:
//!
//! - **types**: `Table`, `Column`, the tagged `ColumnData` and `Cell` views
//! - **ingest**: CSV bytes → `Table`, with missing-value detection and type inference
//! - **sample**: the fixed example table and its UTF-8-with-BOM CSV encoding
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use tabula::table::{parse_csv, sample_csv, sample_table};
//!
//! let bytes = sample_csv().unwrap();
//! let table = parse_csv(&bytes).unwrap();
//! assert_eq!(table, sample_table());
//! ```

pub mod error;
pub mod ingest;
pub mod sample;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use ingest::{is_missing, parse_csv, parse_csv_str, NA_VALUES};
pub use sample::{sample_csv, sample_table, table_to_csv, CSV_MIME, SAMPLE_FILENAME};
pub use types::{Cell, Column, ColumnData, ColumnKind, Table};

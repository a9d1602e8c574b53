//! Tabula Summary
//!
//! Everything derived from a [`Table`](crate::table::Table):
//!
//! - **stats**: per-column `describe` statistics with linear-interpolated quartiles
//! - **report**: `SummaryReport` (row, column and missing counts plus statistics)
//! - **preview**: the head preview shown above the statistics
//! - **group**: group-by-and-sum
//!
//! # Example
//!
//! ```rust
//! use tabula::summary::summarize;
//! use tabula::table::parse_csv_str;
//!
//! let table = parse_csv_str("v\n1\n2\n3\n4\n").unwrap();
//! let report = summarize(&table);
//! assert_eq!(report.stats_for("v").unwrap().p50, 2.5);
//! ```

mod group;
mod preview;
mod report;
mod stats;

pub use group::{group_sum, GroupError, GroupTotal};
pub use preview::{Preview, PreviewColumn, DEFAULT_PREVIEW_ROWS};
pub use report::{summarize, NamedStats, SummaryReport};
pub use stats::{percentile, ColumnStats};

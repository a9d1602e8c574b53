//! # Tabula
//!
//! Tabular Summary Pane - upload a CSV file and get its shape, missing-value
//! count, `describe`-style statistics and a head preview. Without a file the
//! pane offers an example `sample.csv` for download.
//!
//! ## Modules
//!
//! - [`table`]: Table model, CSV ingestion with type inference, example file
//! - [`summary`]: Statistics, summary report, preview, group-sum
//! - [`pane`]: Session context, pane rendering, session store
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration, logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use tabula::pane::{render, PaneConfig, PaneView, SessionContext, UploadedFile};
//!
//! let mut ctx = SessionContext::new();
//! ctx.upload(Some(UploadedFile::new(
//!     Some("scores.csv".to_string()),
//!     "name,score\nann,1\nbo,2\ncy,3\ndi,4\n",
//! )))
//! .unwrap();
//!
//! if let PaneView::Loaded { report, .. } = render(&ctx, &PaneConfig::default()) {
//!     assert_eq!(report.row_count, 4);
//!     assert_eq!(report.stats_for("score").unwrap().p50, 2.5);
//! }
//! ```

pub mod api;
pub mod config;
pub mod pane;
pub mod summary;
pub mod table;

// Re-export top-level types for convenience
pub use table::{
    parse_csv, sample_csv, sample_table, Cell, Column, ColumnData, ColumnKind, ParseError,
    ParseResult, Table,
};

pub use summary::{
    group_sum, summarize, ColumnStats, GroupError, GroupTotal, Preview, SummaryReport,
};

pub use pane::{
    render, PaneConfig, PaneView, SessionConfig, SessionContext, SessionStore, StoreError,
    UploadedFile,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigDiscovery, ConfigError, LoggingConfig};

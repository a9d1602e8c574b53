//! Tabula Pane
//!
//! The Tabular Summary Pane as a pure function of a session's context:
//!
//! - **session**: `SessionContext`, the explicit per-session upload state
//! - **store**: `SessionStore`, live sessions keyed by id
//!
//! [`render`] turns a context into a [`PaneView`]:
//!
//! ```text
//! no upload      → no_file  (message + sample.csv download)
//! parsed upload  → loaded   (head preview + SummaryReport)
//! rejected upload→ failed   (error message + sample.csv download)
//! ```
//!
//! # Example
//!
//! ```rust
//! use tabula::pane::{render, PaneConfig, PaneView, SessionContext, UploadedFile};
//!
//! let mut ctx = SessionContext::new();
//! assert!(matches!(render(&ctx, &PaneConfig::default()), PaneView::NoFile { .. }));
//!
//! ctx.upload(Some(UploadedFile::new(None, "v\n1\n2\n"))).unwrap();
//! match render(&ctx, &PaneConfig::default()) {
//!     PaneView::Loaded { report, .. } => assert_eq!(report.row_count, 2),
//!     other => panic!("unexpected view: {other:?}"),
//! }
//! ```

mod session;
mod store;

pub use session::{SessionContext, UploadState, UploadedFile};
pub use store::{SessionConfig, SessionId, SessionStore, StoreError};

use serde::{Deserialize, Serialize};

use crate::summary::{summarize, Preview, SummaryReport, DEFAULT_PREVIEW_ROWS};
use crate::table::{sample_csv, CSV_MIME, SAMPLE_FILENAME};

/// Shown while no file is present
pub const NO_FILE_MESSAGE: &str = "Upload a CSV file to start the analysis";

/// Pane rendering options
#[derive(Debug, Clone, Deserialize)]
pub struct PaneConfig {
    /// Rows in the head preview
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_preview_rows() -> usize {
    DEFAULT_PREVIEW_ROWS
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
        }
    }
}

/// Descriptor for the example-file download
#[derive(Debug, Clone, Serialize)]
pub struct SampleDownload {
    pub file_name: String,
    pub mime: String,
    pub size_bytes: usize,
}

impl SampleDownload {
    pub fn describe() -> Self {
        Self {
            file_name: SAMPLE_FILENAME.to_string(),
            mime: CSV_MIME.to_string(),
            size_bytes: sample_csv().map(|b| b.len()).unwrap_or(0),
        }
    }
}

/// What the pane shows
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaneView {
    NoFile {
        message: String,
        sample: SampleDownload,
    },
    Loaded {
        file_name: Option<String>,
        preview: Preview,
        report: SummaryReport,
    },
    Failed {
        file_name: Option<String>,
        error: String,
        sample: SampleDownload,
    },
}

/// Render the pane for a session
pub fn render(ctx: &SessionContext, config: &PaneConfig) -> PaneView {
    match ctx.state() {
        UploadState::Empty => PaneView::NoFile {
            message: NO_FILE_MESSAGE.to_string(),
            sample: SampleDownload::describe(),
        },
        UploadState::Loaded { file_name, table } => PaneView::Loaded {
            file_name: file_name.clone(),
            preview: Preview::of(table, config.preview_rows),
            report: summarize(table),
        },
        UploadState::Failed { file_name, error } => PaneView::Failed {
            file_name: file_name.clone(),
            error: error.clone(),
            sample: SampleDownload::describe(),
        },
    }
}

//! Session-scoped pane context
//!
//! Holds what one user has uploaded. A new upload replaces the previous one;
//! a failed upload clears it.

use std::sync::Arc;

use crate::table::{parse_csv, ParseResult, Table};

/// A file handed to the pane by an upload control
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: Option<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name,
            bytes: bytes.into(),
        }
    }
}

/// Current upload state of a session
#[derive(Debug, Clone, Default)]
pub enum UploadState {
    /// Nothing uploaded yet, or the upload was cleared
    #[default]
    Empty,
    /// Last upload parsed successfully
    Loaded {
        file_name: Option<String>,
        table: Arc<Table>,
    },
    /// Last upload was rejected
    Failed {
        file_name: Option<String>,
        error: String,
    },
}

/// Per-session context passed to [`render`](super::render).
///
/// Cloning is cheap; clones share the parsed table.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    state: UploadState,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context already holding a parsed table
    pub fn with_table(file_name: Option<String>, table: Table) -> Self {
        Self {
            state: UploadState::Loaded {
                file_name,
                table: Arc::new(table),
            },
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// The current table, if the last upload succeeded
    pub fn table(&self) -> Option<&Table> {
        match &self.state {
            UploadState::Loaded { table, .. } => Some(table.as_ref()),
            _ => None,
        }
    }

    /// Shared handle to the current table
    pub fn shared_table(&self) -> Option<Arc<Table>> {
        match &self.state {
            UploadState::Loaded { table, .. } => Some(Arc::clone(table)),
            _ => None,
        }
    }

    /// Handle an upload event. `None` means no file was supplied and is not an error.
    pub fn upload(&mut self, file: Option<UploadedFile>) -> ParseResult<Option<&Table>> {
        match file {
            None => {
                self.clear();
                Ok(None)
            }
            Some(file) => {
                let parsed = parse_csv(&file.bytes);
                self.record(file.name, parsed)?;
                Ok(self.table())
            }
        }
    }

    /// Store the outcome of a parse that already happened
    pub fn record(
        &mut self,
        file_name: Option<String>,
        parsed: ParseResult<Table>,
    ) -> ParseResult<()> {
        match parsed {
            Ok(table) => {
                self.state = UploadState::Loaded {
                    file_name,
                    table: Arc::new(table),
                };
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    file = file_name.as_deref().unwrap_or("<unnamed>"),
                    error = %err,
                    "Upload rejected"
                );
                self.state = UploadState::Failed {
                    file_name,
                    error: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Drop the current table
    pub fn clear(&mut self) {
        self.state = UploadState::Empty;
    }
}

//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not already
//! library types. `PaneView` and friends serialize as they are.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pane::PaneView;
use crate::summary::GroupTotal;

// ============================================
// SESSION DTOs
// ============================================

/// Response to opening a session
#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    /// Initial (no file) view
    pub view: PaneView,
}

// ============================================
// SUMMARIZE DTOs
// ============================================

/// Query parameters for `POST /api/v1/summarize`
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeParams {
    /// Name to report for the uploaded body
    #[serde(default)]
    pub file_name: Option<String>,
    /// Override the configured preview length
    #[serde(default)]
    pub preview_rows: Option<usize>,
}

// ============================================
// GROUP DTOs
// ============================================

/// Query parameters for the group-sum endpoint
#[derive(Debug, Deserialize)]
pub struct GroupParams {
    /// Key column
    pub by: String,
    /// Numeric column to sum
    pub value: String,
}

/// Group-sum response
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub by: String,
    pub value: String,
    pub groups: Vec<GroupTotal>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

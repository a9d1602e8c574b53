//! Summarize Route
//!
//! Stateless one-shot pane.
//!
//! - POST /api/v1/summarize - CSV request body → pane view

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::SummarizeParams;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::pane::{render, PaneConfig, PaneView, SessionContext, UploadedFile};

/// POST /api/v1/summarize
///
/// An empty body means no file was supplied and yields the `no_file` view.
/// A malformed body is rejected with 422.
pub async fn summarize_upload(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummarizeParams>,
    body: Bytes,
) -> ApiResult<Json<PaneView>> {
    let file = if body.is_empty() {
        None
    } else {
        Some(UploadedFile::new(params.file_name, body.to_vec()))
    };

    let mut ctx = SessionContext::new();
    ctx.upload(file)?;

    let config = PaneConfig {
        preview_rows: params.preview_rows.unwrap_or(state.pane.preview_rows),
    };

    Ok(Json(render(&ctx, &config)))
}

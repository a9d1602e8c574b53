//! Session Routes
//!
//! The pane with a per-session context, mirroring an upload control that
//! keeps its file until it is replaced or removed.
//!
//! - POST /api/v1/sessions - Open a session
//! - GET /api/v1/sessions/:id - Current pane view
//! - POST /api/v1/sessions/:id/upload - Upload a file (multipart, field `file`)
//! - DELETE /api/v1/sessions/:id/upload - Remove the file
//! - GET /api/v1/sessions/:id/group - Group-sum over the uploaded table
//! - DELETE /api/v1/sessions/:id - End the session

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{GroupParams, GroupResponse, SessionCreatedResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::pane::{render, PaneView, SessionContext, StoreError, UploadedFile};
use crate::summary::group_sum;
use crate::table::parse_csv;

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// POST /api/v1/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<SessionCreatedResponse>)> {
    let (session_id, created_at) = state.sessions.create().await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id,
            created_at,
            view: render(&SessionContext::new(), &state.pane),
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PaneView>> {
    let ctx = state.sessions.snapshot(&id).await?;

    Ok(Json(render(&ctx, &state.pane)))
}

/// POST /api/v1/sessions/:id/upload
///
/// A request without a file part (or with an empty, unnamed one) clears the
/// session back to the `no_file` view. A malformed file is rejected with 422
/// and leaves the session in the `failed` state.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<PaneView>> {
    let ctx = match read_upload(multipart).await? {
        None => {
            state
                .sessions
                .with_session(&id, |ctx| {
                    ctx.clear();
                    ctx.clone()
                })
                .await?
        }
        Some(file) => {
            let size = file.bytes.len();
            // Parse before taking the store lock
            let parsed = parse_csv(&file.bytes);

            if let Ok(table) = &parsed {
                tracing::info!(
                    session_id = %id,
                    file = file.name.as_deref().unwrap_or("<unnamed>"),
                    bytes = size,
                    rows = table.row_count(),
                    columns = table.column_count(),
                    "Upload parsed"
                );
            }

            let (outcome, ctx) = state
                .sessions
                .with_session(&id, |ctx| (ctx.record(file.name, parsed), ctx.clone()))
                .await?;
            outcome?;
            ctx
        }
    };

    Ok(Json(render(&ctx, &state.pane)))
}

/// DELETE /api/v1/sessions/:id/upload
pub async fn clear_upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PaneView>> {
    let ctx = state
        .sessions
        .with_session(&id, |ctx| {
            ctx.clear();
            ctx.clone()
        })
        .await?;

    Ok(Json(render(&ctx, &state.pane)))
}

/// GET /api/v1/sessions/:id/group?by=&value=
pub async fn group_totals(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<GroupParams>,
) -> ApiResult<Json<GroupResponse>> {
    let table = state
        .sessions
        .snapshot(&id)
        .await?
        .shared_table()
        .ok_or_else(|| ApiError::Validation("No file uploaded in this session".to_string()))?;

    let groups = group_sum(&table, &params.by, &params.value)?;

    Ok(Json(GroupResponse {
        by: params.by,
        value: params.value,
        groups,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StoreError::SessionNotFound(id).into())
    }
}

/// Pull the `file` part out of a multipart body
async fn read_upload(mut multipart: Multipart) -> ApiResult<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;

        // Browsers send an empty, unnamed part when no file was picked
        if bytes.is_empty() && name.is_none() {
            return Ok(None);
        }

        return Ok(Some(UploadedFile::new(name, bytes.to_vec())));
    }

    Ok(None)
}

//! Sample Route
//!
//! - GET /api/v1/sample.csv - Download the example file

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::error::{ApiError, ApiResult};
use crate::table::{sample_csv, CSV_MIME, SAMPLE_FILENAME};

/// GET /api/v1/sample.csv
///
/// UTF-8 with byte-order marker so spreadsheet tools keep non-ASCII text intact.
pub async fn download_sample() -> ApiResult<Response> {
    let body = sample_csv().map_err(|e| ApiError::Internal(format!("Sample encoding: {}", e)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SAMPLE_FILENAME),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}

//! Tabula REST API
//!
//! HTTP API layer for Tabula, built with Axum.
//!
//! # Endpoints
//!
//! ## Pane
//! - `POST /api/v1/summarize` - Summarize a CSV request body
//! - `GET /api/v1/sample.csv` - Download the example file
//!
//! ## Sessions
//! - `POST /api/v1/sessions` - Open a session
//! - `GET /api/v1/sessions/:id` - Current pane view
//! - `POST /api/v1/sessions/:id/upload` - Upload a CSV (multipart)
//! - `DELETE /api/v1/sessions/:id/upload` - Remove the uploaded file
//! - `GET /api/v1/sessions/:id/group` - Group-sum over the uploaded table
//! - `DELETE /api/v1/sessions/:id` - End a session
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use tabula::api::{serve, ApiConfig, AppState};
//! use tabula::pane::{PaneConfig, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::new(config.clone(), PaneConfig::default(), SessionConfig::default());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    let api_routes = Router::new()
        // Stateless pane
        .route("/summarize", post(routes::summarize::summarize_upload))
        .route("/sample.csv", get(routes::sample::download_sample))
        // Session pane
        .route("/sessions", post(routes::sessions::create_session))
        .route(
            "/sessions/:id",
            get(routes::sessions::get_session).delete(routes::sessions::end_session),
        )
        .route(
            "/sessions/:id/upload",
            post(routes::sessions::upload_file).delete(routes::sessions::clear_upload),
        )
        .route("/sessions/:id/group", get(routes::sessions::group_totals))
        .layer(DefaultBodyLimit::max(upload_limit));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let reaper = state.sessions.start_reaper();
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Tabula API listening on {}", addr);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)));

    reaper.abort();
    result?;

    tracing::info!("Tabula API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::{PaneConfig, SessionConfig};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "tabula-test-boundary";

    fn create_test_app() -> Router {
        build_router(test_state(SessionConfig::default()))
    }

    fn test_state(sessions: SessionConfig) -> AppState {
        AppState::new(ApiConfig::default(), PaneConfig::default(), sessions)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_body(file_name: &str, content: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(session_id: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{}/upload", session_id))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(file_name, content)))
            .unwrap()
    }

    async fn open_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["view"]["state"], "no_file");
        json["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["sessions"], 0);
    }

    #[tokio::test]
    async fn test_health_ready_at_capacity() {
        let app = build_router(test_state(SessionConfig {
            max_sessions: 1,
            ..Default::default()
        }));
        open_session(&app).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_sample_download() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sample.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sample.csv\""
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
        assert_eq!(
            crate::table::parse_csv(&bytes).unwrap(),
            crate::table::sample_table()
        );
    }

    #[tokio::test]
    async fn test_summarize_body() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/summarize?file_name=data.csv")
                    .header(header::CONTENT_TYPE, "text/csv")
                    .body(Body::from("a,b\n1,x\n2,\n3,y\n4,z\n"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["state"], "loaded");
        assert_eq!(json["file_name"], "data.csv");
        assert_eq!(json["report"]["row_count"], 4);
        assert_eq!(json["report"]["column_count"], 2);
        assert_eq!(json["report"]["missing_count"], 1);
        assert_eq!(json["report"]["statistics"][0]["column"], "a");
        assert_eq!(json["report"]["statistics"][0]["p50"], 2.5);
        assert_eq!(json["preview"]["rows"][1][1], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_summarize_empty_body_is_no_file() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/summarize")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["state"], "no_file");
        assert_eq!(json["sample"]["file_name"], "sample.csv");
    }

    #[tokio::test]
    async fn test_summarize_ragged_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/summarize")
                    .body(Body::from("a,b\n1,2\n3\n"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_session_upload_flow() {
        let app = create_test_app();
        let id = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(upload_request(&id, "regions.csv", b"region,value\nN,1\nS,2\nN,3\n"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["state"], "loaded");
        assert_eq!(json["file_name"], "regions.csv");
        assert_eq!(json["report"]["row_count"], 3);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/sessions/{}/group?by=region&value=value", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["groups"][0]["key"], "N");
        assert_eq!(json["groups"][0]["total"], 4.0);
        assert_eq!(json["groups"][1]["key"], "S");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/sessions/{}/upload", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["state"], "no_file");
    }

    #[tokio::test]
    async fn test_session_failed_upload() {
        let app = create_test_app();
        let id = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(upload_request(&id, "good.csv", b"x\n1\n"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(upload_request(&id, "bad.csv", b"x\n\xff\xfe\n"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/sessions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["state"], "failed");
        assert_eq!(json["file_name"], "bad.csv");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/sessions/{}/group?by=x&value=x", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_end_session() {
        let app = create_test_app();
        let id = open_session(&app).await;

        let end = |app: Router, id: String| async move {
            app.oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/sessions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        };

        assert_eq!(end(app.clone(), id.clone()).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(end(app.clone(), id.clone()).await.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/sessions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_session_upload() {
        let app = create_test_app();

        let response = app
            .oneshot(upload_request("nope", "a.csv", b"x\n1\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

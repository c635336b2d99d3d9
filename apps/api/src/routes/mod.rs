pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::analysis::handlers;
use crate::documents::handlers as documents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analyze/resume",
            post(handlers::handle_analyze_resume),
        )
        .route(
            "/api/v1/analyze/job-description",
            post(handlers::handle_analyze_job_description),
        )
        .route(
            "/api/v1/analyze/similarity",
            post(handlers::handle_analyze_similarity),
        )
        .route(
            "/api/v1/analyze/comprehensive",
            post(handlers::handle_comprehensive),
        )
        .route("/api/v1/analyze/review", post(handlers::handle_review))
        // Documents API
        .route(
            "/api/v1/documents/extract",
            post(documents::handle_extract),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(state)
}

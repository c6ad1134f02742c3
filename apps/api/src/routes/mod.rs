pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Job corpus
        .route("/api/v1/jobs", get(handlers::handle_corpus_summary))
        .route("/api/v1/jobs/reload", post(handlers::handle_corpus_reload))
        // Screening
        .route("/api/v1/screen", post(handlers::handle_screen))
        .route("/api/v1/screen/upload", post(handlers::handle_screen_upload))
        .route("/api/v1/screen/export", post(handlers::handle_export_csv))
        .route("/api/v1/screen/report", post(handlers::handle_report))
        .layer(body_limit)
        .with_state(state)
}

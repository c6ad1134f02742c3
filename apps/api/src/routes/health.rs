use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness plus the size of the corpus currently being served.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let corpus = state.corpus.snapshot();
    Json(json!({
        "status": "ok",
        "service": "ats-matcher",
        "version": env!("CARGO_PKG_VERSION"),
        "jobs_loaded": corpus.len(),
        "scorer_backend": state.scorer.strategy(),
    }))
}

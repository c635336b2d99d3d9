use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::ranking::Strategy;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and tokenizer strategy.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let strategy = match state.analyzer.engine().strategy() {
        Strategy::PhraseAware => "phrase_aware",
        Strategy::Basic => "basic",
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobfit-api",
        "strategy": strategy,
        "llm_configured": state.config.groq_api_key.is_some()
    }))
}

use std::sync::Arc;

use reqwest::Client;

use crate::analysis::commentary::{Commentator, LlmCommentator};
use crate::analysis::orchestrator::Analyzer;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analyzer: Arc<Analyzer>,
    /// Shared HTTP client for LLM calls; one connection pool for all keys.
    pub http: Client,
}

impl AppState {
    /// LLM commentator for this request: the request's own key wins over the
    /// server key. `None` when neither is set.
    pub fn commentator(&self, request_key: Option<&str>) -> Option<Arc<dyn Commentator>> {
        let key = request_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.config.groq_api_key.as_deref())?;
        let client = LlmClient::with_client(
            self.http.clone(),
            key.to_string(),
            &self.config.llm_base_url,
        );
        Some(Arc::new(LlmCommentator(client)))
    }
}

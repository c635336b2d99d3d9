//! LLM commentary: prose feedback layered on top of the keyword analysis.
//!
//! Pluggable behind the `Commentator` trait so the orchestrator can run with a
//! stub in tests. The default `LlmCommentator` calls the chat-completions API.
//! Replies the model fails to format as JSON degrade to placeholder objects
//! carrying the raw text; transport and API failures surface as `LlmError`.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::analysis::models::SimilarityAnalysis;
use crate::analysis::prompts::{
    FIT_DOCUMENT_CHARS, FIT_SYSTEM_TEMPLATE, FIT_USER_TEMPLATE, REVIEW_JOB_SECTION_TEMPLATE,
    REVIEW_PROMPT_TEMPLATE, REVIEW_SYSTEM, STRENGTHS_RESUME_CHARS, STRENGTHS_SYSTEM_TEMPLATE,
};
use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{extract_json_object, CallOptions, LlmClient, LlmError};
use crate::ranking::weighting::WeightedTerm;

const STRENGTHS_OPTIONS: CallOptions = CallOptions {
    temperature: 0.7,
    max_tokens: 500,
};
const FIT_OPTIONS: CallOptions = CallOptions {
    temperature: 0.7,
    max_tokens: 600,
};
// lower temperature for more consistent JSON
const REVIEW_OPTIONS: CallOptions = CallOptions {
    temperature: 0.3,
    max_tokens: 1000,
};

const UNPARSED_NOTE: &str = "Unable to parse structured response";
const UNPARSED_HINT: &str = "Please check the AI model response format";

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthsWeaknesses {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl StrengthsWeaknesses {
    fn unparsed(raw: &str) -> Self {
        Self {
            strengths: vec![UNPARSED_NOTE.to_string()],
            weaknesses: vec![UNPARSED_HINT.to_string()],
            raw_response: Some(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitAssessment {
    #[serde(default)]
    pub fit_percentage: u32,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl FitAssessment {
    fn unparsed(raw: &str) -> Self {
        Self {
            fit_percentage: 0,
            reasons: vec![UNPARSED_NOTE.to_string()],
            suggestions: vec![UNPARSED_HINT.to_string()],
            raw_response: Some(raw.to_string()),
        }
    }
}

/// Deficiencies, improvement suggestions and critical gaps of a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeReview {
    #[serde(default = "default_deficiencies")]
    pub deficiencies: Vec<String>,
    #[serde(default = "default_suggestions")]
    pub suggestions: Vec<String>,
    #[serde(default = "default_critical_gaps")]
    pub critical_gaps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

fn default_deficiencies() -> Vec<String> {
    vec!["No significant deficiencies identified".to_string()]
}

fn default_suggestions() -> Vec<String> {
    vec!["Continue developing existing skills".to_string()]
}

fn default_critical_gaps() -> Vec<String> {
    vec!["No critical gaps identified".to_string()]
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait Commentator: Send + Sync {
    /// Strengths and weaknesses of a resume, given its top keywords.
    async fn strengths_weaknesses(
        &self,
        resume_text: &str,
        keywords: &[WeightedTerm],
    ) -> Result<StrengthsWeaknesses, LlmError>;

    /// How well a resume fits a job description, given their similarity.
    async fn fit_assessment(
        &self,
        resume_text: &str,
        jd_text: &str,
        similarity: &SimilarityAnalysis,
    ) -> Result<FitAssessment, LlmError>;

    /// Deficiencies and gaps of a resume, optionally against a job description.
    async fn review(
        &self,
        resume_text: &str,
        jd_text: Option<&str>,
    ) -> Result<ResumeReview, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmCommentator (chat-completions backed)
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmCommentator(pub LlmClient);

#[async_trait]
impl Commentator for LlmCommentator {
    async fn strengths_weaknesses(
        &self,
        resume_text: &str,
        keywords: &[WeightedTerm],
    ) -> Result<StrengthsWeaknesses, LlmError> {
        let system = STRENGTHS_SYSTEM_TEMPLATE.replace("{top_terms}", &format_top_terms(keywords));
        let user = truncate_chars(resume_text, STRENGTHS_RESUME_CHARS);

        let reply = self.0.call_text(&system, user, STRENGTHS_OPTIONS).await?;
        Ok(decode_or(&reply, StrengthsWeaknesses::unparsed))
    }

    async fn fit_assessment(
        &self,
        resume_text: &str,
        jd_text: &str,
        similarity: &SimilarityAnalysis,
    ) -> Result<FitAssessment, LlmError> {
        let system = FIT_SYSTEM_TEMPLATE
            .replace("{similarity_score}", &similarity.similarity_score.to_string())
            .replace("{common_terms}", &format_common_terms(similarity));
        let user = FIT_USER_TEMPLATE
            .replace("{resume_text}", truncate_chars(resume_text, FIT_DOCUMENT_CHARS))
            .replace("{jd_text}", truncate_chars(jd_text, FIT_DOCUMENT_CHARS));

        let reply = self.0.call_text(&system, &user, FIT_OPTIONS).await?;
        Ok(decode_or(&reply, FitAssessment::unparsed))
    }

    async fn review(
        &self,
        resume_text: &str,
        jd_text: Option<&str>,
    ) -> Result<ResumeReview, LlmError> {
        let job_section = jd_text
            .filter(|jd| !jd.trim().is_empty())
            .map(|jd| REVIEW_JOB_SECTION_TEMPLATE.replace("{jd_text}", jd))
            .unwrap_or_default();
        let prompt = REVIEW_PROMPT_TEMPLATE
            .replace("{resume_text}", resume_text)
            .replace("{job_description_section}", &job_section);
        let system = format!("{REVIEW_SYSTEM} {JSON_ONLY_INSTRUCTION}");

        let reply = self.0.call_text(&system, &prompt, REVIEW_OPTIONS).await?;
        Ok(decode_review(&reply))
    }
}

/// "term: 0.1234, ..." for the ten highest-scoring keywords.
fn format_top_terms(keywords: &[WeightedTerm]) -> String {
    let mut sorted: Vec<&WeightedTerm> = keywords.iter().collect();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted
        .iter()
        .take(10)
        .map(|k| format!("{}: {:.4}", k.term, k.score))
        .collect::<Vec<_>>()
        .join(", ")
}

/// "term: 0.1234, ..." for the five most important shared keywords.
fn format_common_terms(similarity: &SimilarityAnalysis) -> String {
    similarity
        .common_keywords
        .iter()
        .take(5)
        .map(|k| format!("{}: {:.4}", k.term, k.combined_importance))
        .collect::<Vec<_>>()
        .join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Reply decoding
// ────────────────────────────────────────────────────────────────────────────

fn decode_or<T: DeserializeOwned>(reply: &str, fallback: impl FnOnce(&str) -> T) -> T {
    match serde_json::from_str(extract_json_object(reply)) {
        Ok(value) => value,
        Err(e) => {
            warn!("LLM reply was not valid JSON ({e}), returning raw response");
            fallback(reply)
        }
    }
}

fn decode_review(reply: &str) -> ResumeReview {
    let candidate = extract_json_object(reply);
    match serde_json::from_str::<ResumeReview>(candidate) {
        Ok(review) => review,
        Err(e) => {
            warn!("Review reply was not valid JSON ({e}), parsing as text");
            parse_review_text(reply.trim())
        }
    }
}

#[derive(Clone, Copy)]
enum ReviewSection {
    Deficiencies,
    Suggestions,
    CriticalGaps,
}

/// Recovers a review from free text: header lines pick the section, bullet or
/// numbered lines become items. Empty sections get their defaults.
fn parse_review_text(text: &str) -> ResumeReview {
    let mut deficiencies = Vec::new();
    let mut suggestions = Vec::new();
    let mut critical_gaps = Vec::new();
    let mut current: Option<ReviewSection> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();
        let has_any = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));

        if has_any(&["deficienc", "weakness", "weak"]) {
            current = Some(ReviewSection::Deficiencies);
            continue;
        }
        if has_any(&["suggestion", "improve", "recommend"]) {
            current = Some(ReviewSection::Suggestions);
            continue;
        }
        if has_any(&["critical", "gap", "missing"]) {
            current = Some(ReviewSection::CriticalGaps);
            continue;
        }

        let is_item = line.starts_with(['-', '•', '*'])
            || line.chars().next().is_some_and(|c| c.is_ascii_digit());
        if !is_item {
            continue;
        }
        let item = line
            .trim_start_matches(|c: char| "-•*. ".contains(c) || c.is_ascii_digit())
            .trim();
        if item.is_empty() {
            continue;
        }

        match current {
            Some(ReviewSection::Deficiencies) => deficiencies.push(item.to_string()),
            Some(ReviewSection::Suggestions) => suggestions.push(item.to_string()),
            Some(ReviewSection::CriticalGaps) => critical_gaps.push(item.to_string()),
            None => {}
        }
    }

    if deficiencies.is_empty() && suggestions.is_empty() && critical_gaps.is_empty() {
        return ResumeReview {
            deficiencies: vec!["AI response could not be parsed properly".to_string()],
            suggestions: vec!["Please try again or check your API key".to_string()],
            critical_gaps: vec!["Response parsing failed".to_string()],
            raw_response: Some(text.to_string()),
        };
    }

    ResumeReview {
        deficiencies: non_empty_or(deficiencies, "No specific deficiencies identified"),
        suggestions: non_empty_or(suggestions, "Continue professional development"),
        critical_gaps: non_empty_or(critical_gaps, "No critical gaps identified"),
        raw_response: Some(text.to_string()),
    }
}

fn non_empty_or(items: Vec<String>, default: &str) -> Vec<String> {
    if items.is_empty() {
        vec![default.to_string()]
    } else {
        items
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    use crate::analysis::models::CommonKeywordScore;
    use crate::ranking::similarity::MatchQuality;

    /// Fake provider that always replies with `reply` and records request bodies.
    async fn spawn_provider(reply: &'static str) -> (LlmCommentator, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();
        let router = Router::new().route(
            "/chat/completions",
            post(move |Json(body): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push(body);
                    Json(json!({"choices": [{"message": {"content": reply}}]}))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = LlmClient::with_client(
            LlmClient::http_client().unwrap(),
            "key".to_string(),
            &format!("http://{addr}"),
        );
        (LlmCommentator(client), seen)
    }

    fn keywords() -> Vec<WeightedTerm> {
        vec![
            WeightedTerm {
                term: "rust".to_string(),
                score: 0.2,
            },
            WeightedTerm {
                term: "distributed systems".to_string(),
                score: 0.41234,
            },
        ]
    }

    fn similarity() -> SimilarityAnalysis {
        SimilarityAnalysis {
            similarity_score: 0.3456,
            match_quality: MatchQuality::Excellent,
            common_keywords: vec![CommonKeywordScore {
                term: "rust".to_string(),
                resume_score: 0.2,
                job_desc_score: 0.4,
                combined_importance: 0.3,
            }],
            total_features: 1,
        }
    }

    #[test]
    fn test_format_top_terms_sorted_with_four_decimals() {
        assert_eq!(
            format_top_terms(&keywords()),
            "distributed systems: 0.4123, rust: 0.2000"
        );
    }

    #[test]
    fn test_format_common_terms() {
        assert_eq!(format_common_terms(&similarity()), "rust: 0.3000");
    }

    #[test]
    fn test_decode_strengths_from_fenced_json() {
        let reply = "```json\n{\"strengths\": [\"Rust\"], \"weaknesses\": [\"No cloud\"]}\n```";
        let decoded = decode_or(reply, StrengthsWeaknesses::unparsed);
        assert_eq!(decoded.strengths, vec!["Rust"]);
        assert_eq!(decoded.weaknesses, vec!["No cloud"]);
        assert!(decoded.raw_response.is_none());
    }

    #[test]
    fn test_decode_strengths_unparseable_keeps_raw() {
        let decoded = decode_or("I think the resume is fine.", StrengthsWeaknesses::unparsed);
        assert_eq!(decoded.strengths, vec![UNPARSED_NOTE]);
        assert_eq!(
            decoded.raw_response.as_deref(),
            Some("I think the resume is fine.")
        );
    }

    #[test]
    fn test_decode_fit_with_prose_around_json() {
        let reply = "Here you go: {\"fit_percentage\": 72, \"reasons\": [\"a\"], \"suggestions\": []} Thanks";
        let decoded = decode_or(reply, FitAssessment::unparsed);
        assert_eq!(decoded.fit_percentage, 72);
        assert_eq!(decoded.reasons, vec!["a"]);
    }

    #[test]
    fn test_decode_review_fills_missing_keys() {
        let review = decode_review(r#"{"deficiencies": ["No metrics"]}"#);
        assert_eq!(review.deficiencies, vec!["No metrics"]);
        assert_eq!(review.suggestions, default_suggestions());
        assert_eq!(review.critical_gaps, default_critical_gaps());
    }

    #[test]
    fn test_parse_review_text_sections_and_bullets() {
        let text = "Deficiencies:\n- Lacks quantified results\n• Thin skills section\n\n\
                    Suggestions:\n1. Add metrics to each role\n* Lead with projects\n\n\
                    Critical Gaps:\n- No cloud experience";
        let review = parse_review_text(text);
        assert_eq!(
            review.deficiencies,
            vec!["Lacks quantified results", "Thin skills section"]
        );
        assert_eq!(
            review.suggestions,
            vec!["Add metrics to each role", "Lead with projects"]
        );
        assert_eq!(review.critical_gaps, vec!["No cloud experience"]);
        assert_eq!(review.raw_response.as_deref(), Some(text));
    }

    #[test]
    fn test_parse_review_text_defaults_for_empty_sections() {
        let review = parse_review_text("Suggestions:\n- Add a summary");
        assert_eq!(review.suggestions, vec!["Add a summary"]);
        assert_eq!(review.deficiencies, vec!["No specific deficiencies identified"]);
        assert_eq!(review.critical_gaps, vec!["No critical gaps identified"]);
    }

    #[test]
    fn test_parse_review_text_nothing_recognised() {
        let review = parse_review_text("The resume looks good overall.");
        assert_eq!(review.critical_gaps, vec!["Response parsing failed"]);
        assert!(review.raw_response.is_some());
    }

    #[tokio::test]
    async fn test_strengths_prompt_carries_keywords_and_truncated_resume() {
        let (commentator, seen) =
            spawn_provider(r#"{"strengths": ["s"], "weaknesses": ["w"]}"#).await;
        let resume = "x".repeat(STRENGTHS_RESUME_CHARS + 500);

        let result = commentator
            .strengths_weaknesses(&resume, &keywords())
            .await
            .unwrap();
        assert_eq!(result.strengths, vec!["s"]);

        let bodies = seen.lock().unwrap();
        let body = &bodies[0];
        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("distributed systems: 0.4123"));
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert_eq!(user.len(), STRENGTHS_RESUME_CHARS);
        assert_eq!(body["max_tokens"], 500);
    }

    #[tokio::test]
    async fn test_fit_prompt_carries_similarity() {
        let (commentator, seen) =
            spawn_provider(r#"{"fit_percentage": 80, "reasons": [], "suggestions": []}"#).await;

        let result = commentator
            .fit_assessment("resume", "job", &similarity())
            .await
            .unwrap();
        assert_eq!(result.fit_percentage, 80);

        let bodies = seen.lock().unwrap();
        let system = bodies[0]["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("(0.3456)"));
        assert!(system.contains("rust: 0.3000"));
        let user = bodies[0]["messages"][1]["content"].as_str().unwrap();
        assert_eq!(user, "Resume: resume\n\nJob Description: job");
    }

    #[tokio::test]
    async fn test_review_includes_job_section_only_when_given() {
        let (commentator, seen) = spawn_provider(r#"{"deficiencies": ["d"]}"#).await;

        commentator.review("resume", None).await.unwrap();
        commentator.review("resume", Some("Rust role")).await.unwrap();

        let bodies = seen.lock().unwrap();
        let without = bodies[0]["messages"][1]["content"].as_str().unwrap();
        let with = bodies[1]["messages"][1]["content"].as_str().unwrap();
        assert!(!without.contains("Job Description for Context"));
        assert!(with.contains("Job Description for Context:\nRust role"));
    }
}

//! Analysis orchestrator. Runs the ranking engine and optional LLM commentary
//! for one request and assembles the response sections.
//!
//! The engine is synchronous and CPU-bound, so every core stage runs inside
//! `tokio::task::spawn_blocking`. A stage that panics is reported as a failed
//! `Section` instead of tearing down the request; the other stages of a
//! comprehensive analysis still return their results.

use std::any::Any;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::commentary::{Commentator, FitAssessment};
use crate::analysis::models::{
    CompositeAnalysis, JobDescriptionAnalysis, KeywordScore, ResumeAnalysis, Section,
    SimilarityAnalysis,
};
use crate::ranking::weighting::WeightedTerm;
use crate::ranking::KeywordEngine;

/// How many terms each surface reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordLimits {
    pub resume: usize,
    pub job_description: usize,
    pub common: usize,
}

impl Default for KeywordLimits {
    fn default() -> Self {
        Self {
            resume: 20,
            job_description: 15,
            common: 15,
        }
    }
}

#[derive(Clone)]
pub struct Analyzer {
    engine: Arc<KeywordEngine>,
    limits: KeywordLimits,
}

impl Analyzer {
    pub fn new(engine: Arc<KeywordEngine>, limits: KeywordLimits) -> Self {
        Self { engine, limits }
    }

    pub fn engine(&self) -> &KeywordEngine {
        &self.engine
    }

    /// Top resume keywords, plus strengths and weaknesses when a commentator
    /// is available. An LLM failure only fails the commentary field.
    pub async fn analyze_resume(
        &self,
        resume_text: &str,
        commentator: Option<&dyn Commentator>,
    ) -> Section<ResumeAnalysis> {
        let limit = self.limits.resume;
        let keywords = match self
            .run_core("resume analysis", resume_text, move |engine, text| {
                engine.top_keywords(text, limit)
            })
            .await
        {
            Ok(keywords) => keywords,
            Err(message) => return Section::failed(message),
        };

        let llm_strengths_weaknesses = match commentator {
            Some(commentator) => Some(
                match commentator
                    .strengths_weaknesses(resume_text, &keywords)
                    .await
                {
                    Ok(commentary) => Section::Ok(commentary),
                    Err(e) => {
                        warn!("Strengths/weaknesses commentary failed: {e}");
                        Section::failed(format!("LLM analysis failed: {e}"))
                    }
                },
            ),
            None => None,
        };

        Section::Ok(ResumeAnalysis {
            top_keywords: to_scores(&keywords),
            llm_strengths_weaknesses,
        })
    }

    /// Top job-description keywords with a positive weight.
    pub async fn analyze_job_description(&self, jd_text: &str) -> Section<JobDescriptionAnalysis> {
        let limit = self.limits.job_description;
        match self
            .run_core("job description analysis", jd_text, move |engine, text| {
                let mut keywords = engine.top_keywords(text, limit);
                keywords.retain(|k| k.score > 0.0);
                keywords
            })
            .await
        {
            Ok(keywords) => Section::Ok(JobDescriptionAnalysis {
                top_keywords: to_scores(&keywords),
            }),
            Err(message) => Section::failed(message),
        }
    }

    pub async fn analyze_similarity(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Section<SimilarityAnalysis> {
        let limit = self.limits.common;
        let jd_text = jd_text.to_string();
        match self
            .run_core("similarity analysis", resume_text, move |engine, text| {
                let result = engine.compare(text, &jd_text);
                SimilarityAnalysis::from_result(&result, limit)
            })
            .await
        {
            Ok(similarity) => Section::Ok(similarity),
            Err(message) => Section::failed(message),
        }
    }

    /// Resume, job description and similarity in parallel, then the LLM fit
    /// assessment once the similarity is known.
    pub async fn comprehensive(
        &self,
        resume_text: &str,
        jd_text: &str,
        commentator: Option<&dyn Commentator>,
    ) -> CompositeAnalysis {
        let analysis_id = Uuid::new_v4();
        info!("Running comprehensive analysis {analysis_id}");

        let (resume_analysis, job_description_analysis, similarity_analysis) = tokio::join!(
            self.analyze_resume(resume_text, commentator),
            self.analyze_job_description(jd_text),
            self.analyze_similarity(resume_text, jd_text),
        );

        let llm_fit_assessment = match commentator {
            Some(commentator) => {
                Some(fit_assessment(commentator, resume_text, jd_text, &similarity_analysis).await)
            }
            None => None,
        };

        CompositeAnalysis {
            analysis_id,
            analyzed_at: Utc::now(),
            resume_analysis,
            job_description_analysis,
            similarity_analysis,
            llm_fit_assessment,
        }
    }

    /// Runs one engine stage on the blocking pool. A panic becomes
    /// `Err("<stage> failed: <panic message>")`.
    async fn run_core<T, F>(&self, stage: &str, text: &str, work: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&KeywordEngine, &str) -> T + Send + 'static,
    {
        let engine = self.engine.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || work(&engine, &text))
            .await
            .map_err(|e| {
                let reason = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    e.to_string()
                };
                error!("{stage} failed: {reason}");
                format!("{stage} failed: {reason}")
            })
    }
}

async fn fit_assessment(
    commentator: &dyn Commentator,
    resume_text: &str,
    jd_text: &str,
    similarity: &Section<SimilarityAnalysis>,
) -> Section<FitAssessment> {
    let empty = SimilarityAnalysis::empty();
    let similarity = similarity.ok().unwrap_or(&empty);
    match commentator
        .fit_assessment(resume_text, jd_text, similarity)
        .await
    {
        Ok(assessment) => Section::Ok(assessment),
        Err(e) => {
            warn!("Fit assessment commentary failed: {e}");
            Section::failed(format!("LLM fit assessment failed: {e}"))
        }
    }
}

fn to_scores(keywords: &[WeightedTerm]) -> Vec<KeywordScore> {
    keywords.iter().map(KeywordScore::from).collect()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

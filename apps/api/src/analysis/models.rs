use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::commentary::{FitAssessment, StrengthsWeaknesses};
use crate::ranking::similarity::{CommonKeyword, MatchQuality, SimilarityResult};
use crate::ranking::weighting::WeightedTerm;

/// Scores leave the service rounded to 4 decimals.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// A sub-result of an analysis: the value itself, or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Section<T> {
    Ok(T),
    Failed { error: String },
}

impl<T> Section<T> {
    pub fn failed(error: impl Into<String>) -> Self {
        Section::Failed {
            error: error.into(),
        }
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Section::Ok(value) => Some(value),
            Section::Failed { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match self {
            Section::Ok(_) => None,
            Section::Failed { error } => Some(error.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordScore {
    pub term: String,
    pub score: f64,
}

impl From<&WeightedTerm> for KeywordScore {
    fn from(weighted: &WeightedTerm) -> Self {
        Self {
            term: weighted.term.clone(),
            score: round4(weighted.score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonKeywordScore {
    pub term: String,
    pub resume_score: f64,
    pub job_desc_score: f64,
    pub combined_importance: f64,
}

impl From<&CommonKeyword> for CommonKeywordScore {
    fn from(common: &CommonKeyword) -> Self {
        Self {
            term: common.term.clone(),
            resume_score: round4(common.score_a),
            job_desc_score: round4(common.score_b),
            combined_importance: round4(common.combined_importance),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub top_keywords: Vec<KeywordScore>,
    /// `None` when no LLM API key is configured.
    pub llm_strengths_weaknesses: Option<Section<StrengthsWeaknesses>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDescriptionAnalysis {
    pub top_keywords: Vec<KeywordScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityAnalysis {
    pub similarity_score: f64,
    pub match_quality: MatchQuality,
    pub common_keywords: Vec<CommonKeywordScore>,
    pub total_features: usize,
}

impl SimilarityAnalysis {
    /// Classifies the score and keeps the `top_n` most important shared terms.
    pub fn from_result(result: &SimilarityResult, top_n: usize) -> Self {
        let common_keywords: Vec<CommonKeywordScore> = result
            .common_keywords
            .iter()
            .take(top_n)
            .map(CommonKeywordScore::from)
            .collect();
        // classify the reported score so the label always agrees with it
        let similarity_score = round4(result.similarity);
        Self {
            similarity_score,
            match_quality: MatchQuality::from_score(similarity_score),
            total_features: common_keywords.len(),
            common_keywords,
        }
    }

    /// Stand-in used when the similarity stage itself failed.
    pub fn empty() -> Self {
        Self {
            similarity_score: 0.0,
            match_quality: MatchQuality::Poor,
            common_keywords: Vec::new(),
            total_features: 0,
        }
    }
}

/// Resume alone, job description alone, and the pairwise comparison.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeAnalysis {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub resume_analysis: Section<ResumeAnalysis>,
    pub job_description_analysis: Section<JobDescriptionAnalysis>,
    pub similarity_analysis: Section<SimilarityAnalysis>,
    pub llm_fit_assessment: Option<Section<FitAssessment>>,
}

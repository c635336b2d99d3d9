//! Cosine similarity between two weighted-term mappings.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::ranking::weighting::TermWeights;

/// A term present in both documents.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonKeyword {
    pub term: String,
    pub score_a: f64,
    pub score_b: f64,
    /// Mean of the two scores.
    pub combined_importance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    pub similarity: f64,
    /// Sorted by combined importance, descending. Callers truncate.
    pub common_keywords: Vec<CommonKeyword>,
}

/// Four-tier label derived from the similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MatchQuality {
    /// Thresholds are inclusive lower bounds: 0.3, 0.2, 0.1.
    pub fn from_score(similarity: f64) -> Self {
        if similarity >= 0.3 {
            MatchQuality::Excellent
        } else if similarity >= 0.2 {
            MatchQuality::Good
        } else if similarity >= 0.1 {
            MatchQuality::Fair
        } else {
            MatchQuality::Poor
        }
    }
}

/// Cosine similarity over the union vocabulary of `a` and `b`, missing terms
/// counting as 0. Exactly 0.0 when either side has zero magnitude; exactly
/// symmetric in its arguments.
pub fn cosine_similarity(a: &TermWeights, b: &TermWeights) -> f64 {
    // sorted, so both argument orders sum in the same sequence
    let vocabulary: BTreeSet<&str> = a.iter().chain(b.iter()).map(|t| t.term.as_str()).collect();

    let vec_a: Vec<f64> = vocabulary.iter().map(|t| a.get(t).unwrap_or(0.0)).collect();
    let vec_b: Vec<f64> = vocabulary.iter().map(|t| b.get(t).unwrap_or(0.0)).collect();

    let dot: f64 = vec_a.iter().zip(&vec_b).map(|(x, y)| x * y).sum();
    let magnitude_a = vec_a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b = vec_b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }
    (dot / (magnitude_a * magnitude_b)).clamp(0.0, 1.0)
}

/// Terms in both mappings, by descending combined importance. Ties keep the
/// order the terms first appeared in `a`.
pub fn common_keywords(a: &TermWeights, b: &TermWeights) -> Vec<CommonKeyword> {
    let mut common: Vec<CommonKeyword> = a
        .iter()
        .filter_map(|t| {
            let score_b = b.get(&t.term)?;
            Some(CommonKeyword {
                term: t.term.clone(),
                score_a: t.score,
                score_b,
                combined_importance: (t.score + score_b) / 2.0,
            })
        })
        .collect();
    common.sort_by(|x, y| y.combined_importance.total_cmp(&x.combined_importance));
    common
}

pub fn compare(a: &TermWeights, b: &TermWeights) -> SimilarityResult {
    SimilarityResult {
        similarity: cosine_similarity(a, b),
        common_keywords: common_keywords(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(pairs: &[(&str, f64)]) -> TermWeights {
        pairs.iter().map(|(t, s)| (t.to_string(), *s)).collect()
    }

    #[test]
    fn test_identical_documents_score_one() {
        let a = weights(&[("rust", 0.6), ("tokio", 0.3), ("data platform", 0.8)]);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetry() {
        let a = weights(&[("rust", 0.6), ("tokio", 0.3)]);
        let b = weights(&[("rust", 0.1), ("kafka", 0.9), ("tokio", 0.2)]);
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        let a = weights(&[("rust", 0.6)]);
        let b = weights(&[("marketing", 0.6)]);
        let result = compare(&a, &b);
        assert_eq!(result.similarity, 0.0);
        assert!(result.common_keywords.is_empty());
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let a = weights(&[("rust", 0.6)]);
        let empty = TermWeights::default();
        assert_eq!(cosine_similarity(&a, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
        assert!(common_keywords(&empty, &a).is_empty());
    }

    #[test]
    fn test_known_value() {
        // (1,0) vs (1,1): cos = 1/sqrt(2)
        let a = weights(&[("x", 1.0)]);
        let b = weights(&[("x", 1.0), ("y", 1.0)]);
        assert!((cosine_similarity(&a, &b) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_common_keywords_sorted_by_combined_importance() {
        let a = weights(&[("rust", 0.2), ("tokio", 0.6), ("axum", 0.4)]);
        let b = weights(&[("rust", 0.2), ("tokio", 0.2), ("kafka", 0.9)]);
        let common = common_keywords(&a, &b);

        assert_eq!(common.len(), 2);
        assert_eq!(common[0].term, "tokio");
        assert!((common[0].combined_importance - 0.4).abs() < 1e-9);
        assert_eq!(common[0].score_a, 0.6);
        assert_eq!(common[0].score_b, 0.2);
        assert_eq!(common[1].term, "rust");
    }

    #[test]
    fn test_match_quality_thresholds() {
        assert_eq!(MatchQuality::from_score(0.3), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_score(0.95), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_score(0.2999), MatchQuality::Good);
        assert_eq!(MatchQuality::from_score(0.2), MatchQuality::Good);
        assert_eq!(MatchQuality::from_score(0.1), MatchQuality::Fair);
        assert_eq!(MatchQuality::from_score(0.0999), MatchQuality::Poor);
        assert_eq!(MatchQuality::from_score(0.0), MatchQuality::Poor);
    }

    #[test]
    fn test_match_quality_serializes_as_label() {
        let json = serde_json::to_string(&MatchQuality::Excellent).unwrap();
        assert_eq!(json, r#""Excellent""#);
        let json = serde_json::to_string(&MatchQuality::Fair).unwrap();
        assert_eq!(json, r#""Fair""#);
    }
}

//! Term weighting: boosted term frequency × heuristic IDF.
//!
//! There is no corpus to derive IDF from (one or two documents per call), so
//! IDF is a fixed tier chosen by term shape:
//!
//! | term                         | IDF |
//! |------------------------------|-----|
//! | multi-word phrase            | 2.0 |
//! | single word tagged as a noun | 1.5 |
//! | any other single word        | 0.5 |
//!
//! Phrase counts are doubled before normalizing by the token count.

use std::collections::HashMap;

use tracing::debug;

use crate::ranking::lexicon::Tagger;
use crate::ranking::tokenizer::Token;

/// The IDF tier table. Overridable per engine through `Config`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdfPolicy {
    pub phrase: f64,
    pub noun: f64,
    pub other: f64,
    /// Multiplier applied to a phrase's raw count.
    pub phrase_boost: f64,
}

impl Default for IdfPolicy {
    fn default() -> Self {
        Self {
            phrase: 2.0,
            noun: 1.5,
            other: 0.5,
            phrase_boost: 2.0,
        }
    }
}

impl IdfPolicy {
    /// IDF for one distinct term. Tagging failures fall back to `other`.
    pub fn idf(&self, token: &Token, tagger: Option<&dyn Tagger>) -> f64 {
        if token.is_phrase() {
            return self.phrase;
        }
        let Some(tagger) = tagger else {
            return self.other;
        };
        match tagger.part_of_speech(&token.text) {
            Ok(pos) if pos.is_noun() => self.noun,
            Ok(_) => self.other,
            Err(e) => {
                debug!("Tagging '{}' failed, using default IDF: {e}", token.text);
                self.other
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTerm {
    pub term: String,
    pub score: f64,
}

/// term → weight for one document, in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct TermWeights {
    terms: Vec<WeightedTerm>,
    index: HashMap<String, usize>,
}

impl TermWeights {
    pub fn get(&self, term: &str) -> Option<f64> {
        self.index.get(term).map(|&i| self.terms[i].score)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedTerm> + '_ {
        self.terms.iter()
    }

    /// The `n` highest-weighted terms, descending. Equal weights keep
    /// first-occurrence order.
    pub fn top(&self, n: usize) -> Vec<WeightedTerm> {
        let mut ranked = self.terms.clone();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(n);
        ranked
    }

    fn push(&mut self, term: String, score: f64) {
        self.index.insert(term.clone(), self.terms.len());
        self.terms.push(WeightedTerm { term, score });
    }
}

impl FromIterator<(String, f64)> for TermWeights {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut weights = TermWeights::default();
        for (term, score) in iter {
            match weights.index.get(&term) {
                Some(&i) => weights.terms[i].score = score,
                None => weights.push(term, score),
            }
        }
        weights
    }
}

/// Weighs a token sequence. An empty sequence yields an empty mapping.
pub fn weigh_tokens(
    tokens: &[Token],
    tagger: Option<&dyn Tagger>,
    policy: &IdfPolicy,
) -> TermWeights {
    if tokens.is_empty() {
        return TermWeights::default();
    }

    // distinct tokens in first-occurrence order, with raw counts
    let mut order: Vec<&Token> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        let count = counts.entry(token.text.as_str()).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let total = tokens.len() as f64;
    let mut weights = TermWeights::default();
    for token in order {
        let mut count = counts[token.text.as_str()] as f64;
        if token.is_phrase() {
            count *= policy.phrase_boost;
        }
        let tf = count / total;
        weights.push(token.text.clone(), tf * policy.idf(token, tagger));
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Range;

    use crate::ranking::lexicon::{EntityKind, PartOfSpeech, TaggerError};

    /// Tags words starting with 'n' as nouns, errors on words starting with 'x'.
    struct PrefixTagger;

    impl Tagger for PrefixTagger {
        fn entity(&self, _word: &str) -> Option<EntityKind> {
            None
        }

        fn part_of_speech(&self, word: &str) -> Result<PartOfSpeech, TaggerError> {
            if word.starts_with('x') {
                Err(TaggerError::Untaggable(word.to_string()))
            } else if word.starts_with('n') {
                Ok(PartOfSpeech::Noun)
            } else {
                Ok(PartOfSpeech::Verb)
            }
        }

        fn noun_chunks(&self, _words: &[&str]) -> Result<Vec<Range<usize>>, TaggerError> {
            Ok(vec![])
        }
    }

    fn word(text: &str) -> Token {
        Token {
            text: text.to_string(),
            word_count: 1,
        }
    }

    fn phrase(text: &str) -> Token {
        Token {
            text: text.to_string(),
            word_count: text.split(' ').count(),
        }
    }

    #[test]
    fn test_empty_tokens_yield_empty_weights() {
        let weights = weigh_tokens(&[], Some(&PrefixTagger), &IdfPolicy::default());
        assert!(weights.is_empty());
    }

    #[test]
    fn test_idf_tiers() {
        let tokens = vec![word("node"), word("run"), phrase("data platform")];
        let weights = weigh_tokens(&tokens, Some(&PrefixTagger), &IdfPolicy::default());

        // node: 1/3 * 1.5, run: 1/3 * 0.5, phrase: (1*2)/3 * 2.0
        assert!((weights.get("node").unwrap() - 0.5).abs() < 1e-9);
        assert!((weights.get("run").unwrap() - 1.0 / 6.0).abs() < 1e-9);
        assert!((weights.get("data platform").unwrap() - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_term_outweighs_single_occurrence() {
        let tokens = vec![word("net"), word("nil"), word("net")];
        let weights = weigh_tokens(&tokens, Some(&PrefixTagger), &IdfPolicy::default());
        assert!(weights.get("net").unwrap() > weights.get("nil").unwrap());
        assert_eq!(weights.len(), 2);
    }

    #[test]
    fn test_tagging_failure_defaults_to_other_tier() {
        let tokens = vec![word("xyz"), word("abc")];
        let weights = weigh_tokens(&tokens, Some(&PrefixTagger), &IdfPolicy::default());
        assert_eq!(weights.get("xyz"), weights.get("abc"));
        assert!((weights.get("xyz").unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_no_tagger_uses_other_tier_for_words() {
        let tokens = vec![word("node"), phrase("data platform")];
        let weights = weigh_tokens(&tokens, None, &IdfPolicy::default());
        assert!((weights.get("node").unwrap() - 0.25).abs() < 1e-9);
        assert!((weights.get("data platform").unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_policy() {
        let policy = IdfPolicy {
            phrase: 1.0,
            noun: 1.0,
            other: 1.0,
            phrase_boost: 1.0,
        };
        let tokens = vec![word("run"), phrase("data platform")];
        let weights = weigh_tokens(&tokens, Some(&PrefixTagger), &policy);
        assert_eq!(weights.get("run"), weights.get("data platform"));
    }

    #[test]
    fn test_top_is_sorted_truncated_and_stable() {
        let weights: TermWeights = vec![
            ("alpha".to_string(), 0.2),
            ("beta".to_string(), 0.5),
            ("gamma".to_string(), 0.2),
            ("delta".to_string(), 0.1),
        ]
        .into_iter()
        .collect();

        let top = weights.top(3);
        let terms: Vec<&str> = top.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["beta", "alpha", "gamma"]);
        assert!(weights.top(10).len() <= 4);
        assert!(weights.top(0).is_empty());
    }
}

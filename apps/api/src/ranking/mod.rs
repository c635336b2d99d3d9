// Document-ranking engine.
// raw text → normalizer → key-phrase extractor → tokenizer → weighting → similarity.
// Pure, synchronous computation over shared read-only linguistic resources.

pub mod lexicon;
pub mod normalizer;
pub mod phrases;
pub mod similarity;
pub mod tokenizer;
pub mod weighting;

use std::sync::Arc;

use tracing::debug;

use crate::ranking::lexicon::LinguisticResources;
use crate::ranking::phrases::{extract_key_phrases, KeyPhrases};
use crate::ranking::similarity::{compare, SimilarityResult};
use crate::ranking::tokenizer::{tokenize, Token};
use crate::ranking::weighting::{weigh_tokens, IdfPolicy, TermWeights, WeightedTerm};

/// Tokenization strategy, fixed when the engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Key phrases merged into single tokens, entity filtering, POS-based IDF.
    PhraseAware,
    /// No tagger: stopword and length filtering only, flat IDF for words.
    Basic,
}

pub struct KeywordEngine {
    resources: Arc<LinguisticResources>,
    strategy: Strategy,
    idf: IdfPolicy,
}

impl KeywordEngine {
    pub fn new(resources: Arc<LinguisticResources>) -> Self {
        let strategy = if resources.tagger().is_some() {
            Strategy::PhraseAware
        } else {
            Strategy::Basic
        };
        Self {
            resources,
            strategy,
            idf: IdfPolicy::default(),
        }
    }

    pub fn with_idf_policy(mut self, idf: IdfPolicy) -> Self {
        self.idf = idf;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Normalized, phrase-merged token stream of `text`.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let normalized = normalizer::normalize(text);
        let words = normalizer::words(&normalized);

        let phrases = match (self.strategy, self.resources.tagger()) {
            (Strategy::PhraseAware, Some(tagger)) => extract_key_phrases(&words, tagger),
            _ => KeyPhrases::default(),
        };
        debug!(
            "Tokenizing {} words with {} key phrases",
            words.len(),
            phrases.len()
        );

        tokenize(&words, &phrases, &self.resources)
    }

    pub fn weigh(&self, text: &str) -> TermWeights {
        let tokens = self.tokenize(text);
        let tagger = match self.strategy {
            Strategy::PhraseAware => self.resources.tagger(),
            Strategy::Basic => None,
        };
        weigh_tokens(&tokens, tagger, &self.idf)
    }

    /// The `n` highest-weighted terms of `text`, descending.
    pub fn top_keywords(&self, text: &str, n: usize) -> Vec<WeightedTerm> {
        self.weigh(text).top(n)
    }

    /// Similarity and shared terms of two documents. A document with no tokens
    /// yields 0.0 and no common keywords.
    pub fn compare(&self, text_a: &str, text_b: &str) -> SimilarityResult {
        compare(&self.weigh(text_a), &self.weigh(text_b))
    }
}

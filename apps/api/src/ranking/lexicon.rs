//! Linguistic resources shared by every analysis call.
//!
//! The bundle (stopword set + optional tagger) is built once at start-up and is
//! read-only afterwards. It is passed into `KeywordEngine::new` so tests can
//! substitute their own tagger or stopword list.

use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// The NLTK English stopword list.
static ENGLISH_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
        "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
        "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
        "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
        "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
        "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during", "before", "after",
        "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
        "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
        "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
        "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
        "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn",
        "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
        "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
        "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
    ]
    .into_iter()
    .collect()
});

const EMBEDDED_LEXICON: &str = include_str!("../../resources/lexicon.json");

/// Named-entity classes that are never allowed to become keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Organization,
    GeoPolitical,
}

/// Coarse part-of-speech classes. Only the noun/other split feeds scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Adverb,
    Number,
    Function,
}

impl PartOfSpeech {
    pub fn is_noun(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
    }
}

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("token '{0}' has no alphanumeric content")]
    Untaggable(String),
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed lexicon: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tagging backend used by phrase extraction, entity filtering and IDF tiers.
///
/// Every method works on already-normalized (lowercase) words.
pub trait Tagger: Send + Sync {
    /// Entity class of a single word, if it names a person, organization or place.
    fn entity(&self, word: &str) -> Option<EntityKind>;

    fn part_of_speech(&self, word: &str) -> Result<PartOfSpeech, TaggerError>;

    /// Noun-phrase-like spans over `words`, each 1 to 3 words long.
    fn noun_chunks(&self, words: &[&str]) -> Result<Vec<Range<usize>>, TaggerError>;
}

/// Word lists backing `LexiconTagger`. Every list is optional in the JSON.
#[derive(Debug, Default, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    pub persons: HashSet<String>,
    #[serde(default)]
    pub organizations: HashSet<String>,
    #[serde(default)]
    pub places: HashSet<String>,
    #[serde(default)]
    pub proper_nouns: HashSet<String>,
    /// Common nouns the suffix rules would otherwise misread (`supply`, `assembly`).
    #[serde(default)]
    pub nouns: HashSet<String>,
    #[serde(default)]
    pub verbs: HashSet<String>,
    #[serde(default)]
    pub adjectives: HashSet<String>,
    #[serde(default)]
    pub adverbs: HashSet<String>,
}

impl Lexicon {
    /// The lexicon compiled into the binary.
    pub fn embedded() -> Result<Self, LexiconError> {
        Ok(serde_json::from_str(EMBEDDED_LEXICON)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LexiconError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Longest noun chunk the tagger emits.
pub const MAX_CHUNK_WORDS: usize = 3;

/// Function words after which an `-ed` word starts a new clause.
const COORDINATORS: [&str; 4] = ["and", "or", "but", "then"];

/// Gazetteer + suffix-rule tagger.
///
/// Chunks are maximal runs of nouns and adjectives; stopwords, numbers, verbs
/// and adverbs end a run. An `-ed` word that only the suffix rule calls a verb
/// joins the run when it modifies the next word ("built distributed systems").
/// Runs longer than `MAX_CHUNK_WORDS` are cut from the right so each piece
/// keeps its head noun.
pub struct LexiconTagger {
    lexicon: Lexicon,
    stopwords: HashSet<String>,
}

impl LexiconTagger {
    pub fn new(lexicon: Lexicon, stopwords: HashSet<String>) -> Self {
        Self { lexicon, stopwords }
    }

    /// Whether `words[i]` is a suffix-rule participle used as a modifier: it
    /// follows a verb or a preposition-like function word and precedes content.
    fn is_modifier_participle(
        &self,
        words: &[&str],
        tags: &[Option<PartOfSpeech>],
        i: usize,
    ) -> bool {
        if i == 0 || i + 1 >= words.len() {
            return false;
        }
        if tags[i] != Some(PartOfSpeech::Verb)
            || self.lexicon.verbs.contains(words[i])
            || !looks_participial(words[i])
        {
            return false;
        }
        let after_verb_or_preposition = match tags[i - 1] {
            Some(PartOfSpeech::Verb) => true,
            Some(PartOfSpeech::Function) => !COORDINATORS.contains(&words[i - 1]),
            _ => false,
        };
        after_verb_or_preposition && tags[i + 1].is_some_and(is_content)
    }
}

fn is_content(tag: PartOfSpeech) -> bool {
    matches!(tag, PartOfSpeech::Noun | PartOfSpeech::ProperNoun | PartOfSpeech::Adjective)
}

fn looks_adverbial(word: &str) -> bool {
    word.len() > 4 && word.ends_with("ly")
}

fn looks_participial(word: &str) -> bool {
    word.len() > 4 && word.ends_with("ed") && !word.ends_with("eed")
}

impl Tagger for LexiconTagger {
    fn entity(&self, word: &str) -> Option<EntityKind> {
        if self.lexicon.persons.contains(word) {
            Some(EntityKind::Person)
        } else if self.lexicon.organizations.contains(word) {
            Some(EntityKind::Organization)
        } else if self.lexicon.places.contains(word) {
            Some(EntityKind::GeoPolitical)
        } else {
            None
        }
    }

    fn part_of_speech(&self, word: &str) -> Result<PartOfSpeech, TaggerError> {
        if !word.chars().any(|c| c.is_alphanumeric()) {
            return Err(TaggerError::Untaggable(word.to_string()));
        }
        if word.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return Ok(PartOfSpeech::Number);
        }
        if self.stopwords.contains(word) {
            return Ok(PartOfSpeech::Function);
        }
        if self.entity(word).is_some() || self.lexicon.proper_nouns.contains(word) {
            return Ok(PartOfSpeech::ProperNoun);
        }
        if self.lexicon.nouns.contains(word) {
            return Ok(PartOfSpeech::Noun);
        }
        if self.lexicon.adjectives.contains(word) {
            return Ok(PartOfSpeech::Adjective);
        }
        if self.lexicon.verbs.contains(word) {
            return Ok(PartOfSpeech::Verb);
        }
        if self.lexicon.adverbs.contains(word) || looks_adverbial(word) {
            return Ok(PartOfSpeech::Adverb);
        }
        if looks_participial(word) {
            return Ok(PartOfSpeech::Verb);
        }
        if ["ful", "ous", "able", "ible"]
            .iter()
            .any(|suffix| word.len() > suffix.len() + 2 && word.ends_with(suffix))
        {
            return Ok(PartOfSpeech::Adjective);
        }
        Ok(PartOfSpeech::Noun)
    }

    fn noun_chunks(&self, words: &[&str]) -> Result<Vec<Range<usize>>, TaggerError> {
        // Untaggable words behave like any other run breaker
        let tags: Vec<Option<PartOfSpeech>> = words
            .iter()
            .map(|word| self.part_of_speech(word).ok())
            .collect();

        let mut chunks = Vec::new();
        let mut run_start: Option<usize> = None;

        for i in 0..words.len() {
            if tags[i].is_some_and(is_content) || self.is_modifier_participle(words, &tags, i) {
                run_start.get_or_insert(i);
            } else if let Some(start) = run_start.take() {
                split_run(start..i, &mut chunks);
            }
        }
        if let Some(start) = run_start {
            split_run(start..words.len(), &mut chunks);
        }

        chunks.sort_by_key(|r| r.start);
        Ok(chunks)
    }
}

/// Cuts a run into head-final pieces of at most `MAX_CHUNK_WORDS` words.
fn split_run(run: Range<usize>, out: &mut Vec<Range<usize>>) {
    let mut end = run.end;
    while end > run.start {
        let start = end.saturating_sub(MAX_CHUNK_WORDS).max(run.start);
        out.push(start..end);
        end = start;
    }
}

/// Process-wide, read-only language resources.
pub struct LinguisticResources {
    stopwords: HashSet<String>,
    tagger: Option<Arc<dyn Tagger>>,
}

impl LinguisticResources {
    pub fn new(stopwords: HashSet<String>, tagger: Option<Arc<dyn Tagger>>) -> Self {
        Self { stopwords, tagger }
    }

    /// Loads the stopword list and the lexicon tagger.
    ///
    /// A lexicon that cannot be loaded leaves the bundle without a tagger; the
    /// engine then falls back to plain stopword filtering.
    pub fn load(lexicon_path: Option<&Path>) -> Self {
        let stopwords = english_stopwords();
        let lexicon = match lexicon_path {
            Some(path) => Lexicon::from_file(path),
            None => Lexicon::embedded(),
        };

        let tagger: Option<Arc<dyn Tagger>> = match lexicon {
            Ok(lexicon) => {
                info!(
                    "Lexicon tagger loaded ({} entity names, {} proper nouns)",
                    lexicon.persons.len() + lexicon.organizations.len() + lexicon.places.len(),
                    lexicon.proper_nouns.len()
                );
                Some(Arc::new(LexiconTagger::new(lexicon, stopwords.clone())))
            }
            Err(e) => {
                warn!("Lexicon unavailable, phrase extraction disabled: {e}");
                None
            }
        };

        Self::new(stopwords, tagger)
    }

    /// Stopwords only, no tagger.
    #[cfg(test)]
    pub fn without_tagger() -> Self {
        Self::new(english_stopwords(), None)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn tagger(&self) -> Option<&dyn Tagger> {
        self.tagger.as_deref()
    }
}

pub fn english_stopwords() -> HashSet<String> {
    ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect()
}

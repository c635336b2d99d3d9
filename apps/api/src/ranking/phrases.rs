//! Key-phrase extraction over normalized text.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::ranking::lexicon::{EntityKind, Tagger};

/// Longest accepted phrase, counted without spaces.
pub const MAX_PHRASE_CHARS: usize = 30;

/// Accepted key phrases of one document, with a first-word index for matching.
///
/// Candidates under one first word are kept longest first (ties alphabetical),
/// so matching never depends on hash iteration order.
#[derive(Debug, Default, Clone)]
pub struct KeyPhrases {
    phrases: HashSet<String>,
    by_first_word: HashMap<String, Vec<Vec<String>>>,
}

impl KeyPhrases {
    #[cfg(test)]
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut key_phrases = KeyPhrases::default();
        for phrase in phrases {
            key_phrases.insert(phrase.into());
        }
        key_phrases
    }

    fn insert(&mut self, phrase: String) {
        if phrase.is_empty() || !self.phrases.insert(phrase.clone()) {
            return;
        }
        let parts: Vec<String> = phrase.split(' ').map(str::to_string).collect();
        let bucket = self.by_first_word.entry(parts[0].clone()).or_default();
        bucket.push(parts);
        bucket.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.contains(phrase)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Longest multi-word phrase that starts at `words[0]`, as a word count.
    pub fn longest_match(&self, words: &[&str]) -> Option<usize> {
        let first = words.first()?;
        self.by_first_word.get(*first)?.iter().find_map(|parts| {
            let n = parts.len();
            let matches = n > 1
                && n <= words.len()
                && parts.iter().zip(words).all(|(p, w)| p.as_str() == *w);
            matches.then_some(n)
        })
    }
}

/// Extracts key phrases from normalized words.
///
/// A chunk is accepted when none of its words is a person, organization or
/// place and it is at most `MAX_PHRASE_CHARS` long ignoring spaces. A failing
/// tagger yields an empty set.
pub fn extract_key_phrases(words: &[&str], tagger: &dyn Tagger) -> KeyPhrases {
    let chunks = match tagger.noun_chunks(words) {
        Ok(chunks) => chunks,
        Err(e) => {
            warn!("Noun chunking failed, continuing without key phrases: {e}");
            return KeyPhrases::default();
        }
    };

    let mut accepted = KeyPhrases::default();
    for range in chunks {
        let Some(span) = words.get(range.clone()) else {
            continue;
        };
        if span.is_empty() {
            continue;
        }

        let entity: Option<(&str, EntityKind)> = span
            .iter()
            .find_map(|w| tagger.entity(w).map(|kind| (*w, kind)));
        if let Some((word, kind)) = entity {
            debug!("Rejected phrase '{}': '{word}' tagged {kind:?}", span.join(" "));
            continue;
        }

        let chars: usize = span.iter().map(|w| w.chars().count()).sum();
        if chars > MAX_PHRASE_CHARS {
            debug!("Rejected phrase '{}': {chars} chars", span.join(" "));
            continue;
        }

        accepted.insert(span.join(" "));
    }
    accepted
}

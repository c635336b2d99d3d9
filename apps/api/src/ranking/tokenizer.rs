//! Phrase-aware tokenization.
//!
//! A cursor walks the word array left to right. At each position the longest
//! key phrase starting there is emitted as a single token and the cursor jumps
//! past all of its words, so a phrase's words are never also counted alone.
//! Otherwise the current word goes through the single-word filter.

use crate::ranking::lexicon::LinguisticResources;
use crate::ranking::phrases::KeyPhrases;

pub const MIN_WORD_CHARS: usize = 2;
pub const MAX_WORD_CHARS: usize = 20;

/// A single filtered word or a merged multi-word key phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub word_count: usize,
}

impl Token {
    fn word(word: &str) -> Self {
        Self {
            text: word.to_string(),
            word_count: 1,
        }
    }

    fn phrase(words: &[&str]) -> Self {
        Self {
            text: words.join(" "),
            word_count: words.len(),
        }
    }

    pub fn is_phrase(&self) -> bool {
        self.word_count > 1
    }
}

pub fn tokenize(
    words: &[&str],
    phrases: &KeyPhrases,
    resources: &LinguisticResources,
) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(words.len());
    let mut cursor = 0;

    while cursor < words.len() {
        if let Some(n) = phrases.longest_match(&words[cursor..]) {
            tokens.push(Token::phrase(&words[cursor..cursor + n]));
            cursor += n;
            continue;
        }

        let word = words[cursor];
        if keep_word(word, phrases, resources) {
            tokens.push(Token::word(word));
        }
        cursor += 1;
    }

    tokens
}

fn keep_word(word: &str, phrases: &KeyPhrases, resources: &LinguisticResources) -> bool {
    let len = word.chars().count();
    if !(MIN_WORD_CHARS..=MAX_WORD_CHARS).contains(&len) {
        return false;
    }
    if !word.chars().any(char::is_alphanumeric) {
        return false;
    }
    if let Some(tagger) = resources.tagger() {
        if tagger.entity(word).is_some() {
            return false;
        }
    }
    !resources.is_stopword(word) || phrases.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ranking::lexicon::{english_stopwords, Lexicon, LexiconTagger};

    fn resources() -> LinguisticResources {
        let tagger = LexiconTagger::new(Lexicon::embedded().unwrap(), english_stopwords());
        LinguisticResources::new(english_stopwords(), Some(Arc::new(tagger)))
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_phrase_consumes_its_words() {
        let words = ["senior", "machine", "learning", "engineer", "needed"];
        let phrases = KeyPhrases::from_phrases(["machine learning engineer"]);
        let tokens = tokenize(&words, &phrases, &resources());

        assert_eq!(texts(&tokens), vec!["senior", "machine learning engineer", "needed"]);
        assert!(tokens[1].is_phrase());
        assert_eq!(tokens[1].word_count, 3);
    }

    #[test]
    fn test_no_constituent_unigrams_for_matched_phrase() {
        let words = ["data", "science", "and", "data", "science", "data"];
        let phrases = KeyPhrases::from_phrases(["data science"]);
        let tokens = tokenize(&words, &phrases, &resources());

        assert_eq!(texts(&tokens), vec!["data science", "data science", "data"]);
        assert!(!texts(&tokens).contains(&"science"));
    }

    #[test]
    fn test_longest_phrase_wins_at_same_position() {
        let words = ["machine", "learning", "engineer"];
        let phrases = KeyPhrases::from_phrases(["machine learning", "machine learning engineer"]);
        let tokens = tokenize(&words, &phrases, &resources());
        assert_eq!(texts(&tokens), vec!["machine learning engineer"]);
    }

    #[test]
    fn test_single_word_filters() {
        let words = ["a", "go", "the", "john", "abcdefghijklmnopqrstu", "kubernetes"];
        let tokens = tokenize(&words, &KeyPhrases::default(), &resources());
        assert_eq!(texts(&tokens), vec!["go", "kubernetes"]);
    }

    #[test]
    fn test_hyphen_only_words_are_dropped() {
        let words = ["--", "ci-cd", "---", "-", "x-ray"];
        let tokens = tokenize(&words, &KeyPhrases::default(), &resources());
        assert_eq!(texts(&tokens), vec!["ci-cd", "x-ray"]);
    }

    #[test]
    fn test_common_words_shadowing_names_are_kept() {
        let words = ["target", "mark", "young", "park", "slack", "zoom", "john"];
        let tokens = tokenize(&words, &KeyPhrases::default(), &resources());
        assert_eq!(texts(&tokens), vec!["target", "mark", "young", "park", "slack", "zoom"]);
    }

    #[test]
    fn test_stopword_kept_when_it_is_a_key_phrase() {
        let words = ["it", "support", "it"];
        let phrases = KeyPhrases::from_phrases(["it"]);
        let tokens = tokenize(&words, &phrases, &resources());
        assert_eq!(texts(&tokens), vec!["it", "support", "it"]);
    }

    #[test]
    fn test_without_tagger_entities_pass_through() {
        let words = ["john", "and", "rust"];
        let tokens = tokenize(
            &words,
            &KeyPhrases::default(),
            &LinguisticResources::without_tagger(),
        );
        assert_eq!(texts(&tokens), vec!["john", "rust"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize(&[], &KeyPhrases::default(), &resources()).is_empty());
    }
}

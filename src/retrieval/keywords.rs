use std::collections::HashSet;

use crate::constants::{MIN_KEYWORD_CHARS, OPTION_KEYWORD_CAP};
use crate::extraction::Question;

/// Accented vowels kept alongside ASCII word characters.
const DIACRITICS: [char; 6] = ['à', 'è', 'é', 'ì', 'ò', 'ù'];

/// Deduplicated keywords in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    terms: Vec<String>,
    seen: HashSet<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `term`; returns `false` if it was already present.
    pub fn insert(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if self.seen.contains(&term) {
            return false;
        }
        self.seen.insert(term.clone());
        self.terms.push(term);
        true
    }

    pub fn contains(&self, term: &str) -> bool {
        self.seen.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for term in iter {
            set.insert(term);
        }
        set
    }
}

/// Derives a retrieval query from quiz questions.
#[derive(Debug, Clone, Copy)]
pub struct KeywordExtractor {
    /// Tokens must have strictly more characters than this.
    pub min_chars: usize,
    /// Tokens taken from each answer option, after filtering.
    pub option_cap: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self {
            min_chars: MIN_KEYWORD_CHARS,
            option_cap: OPTION_KEYWORD_CAP,
        }
    }
}

impl KeywordExtractor {
    /// Collects question tokens and the first few tokens of each option.
    pub fn extract(&self, questions: &[Question]) -> KeywordSet {
        let mut keywords = KeywordSet::new();

        for question in questions {
            for token in self.tokens(&question.text) {
                keywords.insert(token);
            }
            for option in question.options.values() {
                for token in self.tokens(option).into_iter().take(self.option_cap) {
                    keywords.insert(token);
                }
            }
        }

        keywords
    }

    /// Lower-cases, blanks out characters outside the word alphabet, splits on
    /// whitespace and drops short tokens.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if is_word_char(c) { c } else { ' ' })
            .collect();

        normalized
            .split_whitespace()
            .filter(|t| t.chars().count() > self.min_chars)
            .map(str::to_string)
            .collect()
    }
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() || DIACRITICS.contains(&c)
}

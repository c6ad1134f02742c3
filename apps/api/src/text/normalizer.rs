use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::text::lemmatizer::lemmatize;
use crate::text::stopwords::is_stopword;

/// Lowercase, stopword-free, lemmatized token sequence.
///
/// Produced only by [`normalize`]; immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText {
    tokens: Vec<String>,
}

impl NormalizedText {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token_set(&self) -> HashSet<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }

    /// Tokens joined by a single space.
    pub fn as_text(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Normalizes raw text for matching.
///
/// Steps, in order:
/// 1. lowercase everything
/// 2. replace every character that is not an ASCII letter or whitespace with a space
/// 3. split on whitespace
/// 4. drop stopwords
/// 5. reduce each token to its noun base form
///
/// Digits and punctuation never survive, so emails and phone numbers are
/// destroyed here; identity extraction must run on the raw text.
pub fn normalize(raw_text: &str) -> NormalizedText {
    let cleaned: String = raw_text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let tokens = cleaned
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .map(lemmatize)
        // a lemma can collapse onto a stopword ("ares" -> "are")
        .filter(|lemma| !is_stopword(lemma))
        .collect();

    NormalizedText { tokens }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_sequence() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n\t ").is_empty());
    }

    #[test]
    fn test_lowercases_and_drops_stopwords() {
        let normalized = normalize("Skilled in Python and SQL.");
        assert_eq!(normalized.tokens(), &["skilled", "python", "sql"]);
    }

    #[test]
    fn test_digits_and_punctuation_split_tokens() {
        let normalized = normalize("john.smith@mail.com 9876543210");
        assert_eq!(normalized.tokens(), &["john", "smith", "mail", "com"]);
    }

    #[test]
    fn test_plural_tokens_are_lemmatized() {
        let normalized = normalize("Built dashboards for companies");
        assert_eq!(normalized.tokens(), &["built", "dashboard", "company"]);
    }

    #[test]
    fn test_non_ascii_letters_are_replaced() {
        let normalized = normalize("café résumé");
        assert_eq!(normalized.tokens(), &["caf", "r", "sum"]);
    }

    #[test]
    fn test_output_contains_no_stopwords_or_non_alphabetic_characters() {
        let samples = [
            "The quick brown fox jumps over the lazy dog!",
            "I've worked at 3 companies; they're all great.",
            "Ares and Dos are here: 100% of the time",
            "C++/C# developer, 5+ yrs @ ACME-Corp",
        ];
        for sample in samples {
            for token in normalize(sample).tokens() {
                assert!(!is_stopword(token), "stopword {token:?} in {sample:?}");
                assert!(
                    token.chars().all(|c| c.is_ascii_lowercase()),
                    "non-alphabetic token {token:?} in {sample:?}"
                );
            }
        }
    }

    #[test]
    fn test_normalization_is_stable_on_its_own_output() {
        let once = normalize("Managed databases and analyses for 12 companies");
        let twice = normalize(&once.as_text());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_token_set_deduplicates() {
        let normalized = normalize("python python sql");
        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized.token_set().len(), 2);
    }
}

//! Sentence boundary detection for article text.

use crate::error::Result;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Trait for sentence boundary detectors.
pub trait SentenceSplitter: Send + Sync {
    /// ISO code of the language the splitter is tuned for.
    fn language(&self) -> &str;

    /// Split prose into sentences, in order.
    fn split(&self, text: &str) -> Result<Vec<String>>;
}

/// Words that end with a period without ending the sentence.
const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "e.g", "i.e", "u.s",
    "u.k", "a.m", "p.m", "inc", "ltd", "corp", "dept", "est", "approx", "ca", "fig", "vol", "gen",
    "gov", "sgt", "capt", "lt", "col", "rev", "hon", "jan", "feb", "mar", "apr", "jun", "jul",
    "aug", "sep", "sept", "oct", "nov", "dec",
];

/// Abbreviations that only hold when a number follows, as in "No. 5".
const NUMERIC_ABBREVIATIONS: &[&str] = &["no", "nos", "pp"];

/// Rule-based splitter for English prose.
///
/// A boundary is terminal punctuation (with any closing quotes or brackets)
/// followed by whitespace and a sentence-initial character. Periods after known
/// abbreviations and after initials in a name do not end a sentence.
pub struct EnglishSentenceSplitter {
    boundary: Regex,
    abbreviations: HashSet<&'static str>,
}

impl EnglishSentenceSplitter {
    pub fn new() -> Self {
        let boundary = Regex::new(
            r#"(?x)
            [.!?]+          # terminal punctuation
            ["'”’)\]]*      # closing quotes or brackets
            \s+             # gap before the next sentence
        "#,
        )
        .expect("Invalid regex");

        Self {
            boundary,
            abbreviations: ENGLISH_ABBREVIATIONS.iter().copied().collect(),
        }
    }

    /// Whether the text following a candidate boundary can start a sentence.
    fn starts_sentence(rest: &str) -> bool {
        rest.chars().next().is_some_and(|c| {
            c.is_uppercase() || c.is_numeric() || matches!(c, '"' | '\'' | '“' | '‘' | '(' | '[')
        })
    }

    /// Whether the period at the end of `preceding` belongs to an abbreviation
    /// rather than ending the sentence. `rest` is the text after the gap.
    fn ends_with_abbreviation(&self, preceding: &str, rest: &str) -> bool {
        let mut tokens = preceding
            .split_whitespace()
            .rev()
            .map(|t| t.trim_start_matches(|c: char| !c.is_alphanumeric()));
        let token = tokens.next().unwrap_or_default();

        if Self::is_initial(token) {
            // "John F. Kennedy" or a leading "J. Smith", but not "vitamin C."
            return match tokens.next() {
                Some(before) => before.chars().next().is_some_and(char::is_uppercase),
                None => true,
            };
        }

        let word = token.to_lowercase();
        if NUMERIC_ABBREVIATIONS.contains(&word.as_str()) {
            return rest.chars().next().is_some_and(|c| c.is_ascii_digit());
        }

        self.abbreviations.contains(word.as_str())
    }

    /// A lone capital letter. The pronoun "I" is excluded so "World War I."
    /// still ends a sentence.
    fn is_initial(token: &str) -> bool {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.is_uppercase() && c != 'I',
            _ => false,
        }
    }
}

impl Default for EnglishSentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSplitter for EnglishSentenceSplitter {
    fn language(&self) -> &str {
        "en"
    }

    fn split(&self, text: &str) -> Result<Vec<String>> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for boundary in self.boundary.find_iter(text) {
            if !Self::starts_sentence(&text[boundary.end()..]) {
                continue;
            }

            let period_only = !boundary.as_str().contains(['!', '?']);

            if period_only
                && self.ends_with_abbreviation(
                    &text[start..boundary.start()],
                    &text[boundary.end()..],
                )
            {
                continue;
            }

            let sentence = text[start..boundary.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = boundary.end();
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }

        Ok(sentences)
    }
}

/// Split article text into sentences, returning nothing for blank or absent input.
pub fn segment_sentences(splitter: &dyn SentenceSplitter, text: Option<&str>) -> Vec<String> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            warn!("Invalid corpus: text must be a non-empty string");
            return Vec::new();
        }
    };

    match splitter.split(text) {
        Ok(sentences) => {
            debug!(
                language = splitter.language(),
                sentences = sentences.len(),
                "Sentence tokenization completed"
            );
            sentences
        }
        Err(e) => {
            warn!("Sentence tokenization failed: {}", e);
            Vec::new()
        }
    }
}

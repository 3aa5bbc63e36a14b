//! Encyclopedia lookup for topic summaries.

mod wikipedia;

pub use wikipedia::WikipediaClient;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for sources of short factual summaries.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch the introductory summary for an exact topic title.
    async fn fetch_summary(&self, topic: &str) -> Result<String>;
}

/// Cut text to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_chars("short", 500), "short");
    }

    #[test]
    fn test_truncate_to_limit() {
        let long = "a".repeat(1000);
        assert_eq!(truncate_chars(&long, 500).len(), 500);
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "प्रकाश संश्लेषण";
        let cut = truncate_chars(text, 4);
        assert_eq!(cut.chars().count(), 4);
        assert!(text.starts_with(cut));
    }
}

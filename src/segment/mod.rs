//! Text segmentation: article prose into sentences, model output into dialogue lines.

mod dialogue;
mod sentence;

pub use dialogue::{split_dialogue, TURN_DELIMITER};
pub use sentence::{segment_sentences, EnglishSentenceSplitter, SentenceSplitter};

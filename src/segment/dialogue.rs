//! Splitting raw LLM dialogue into speakable lines.

use tracing::{debug, warn};

/// Separator between dialogue turns in a model response.
pub const TURN_DELIMITER: &str = "\n\n";

/// Flatten raw dialogue blocks into individual lines.
///
/// Every block is split on a blank line. All fragments are kept, empty ones
/// included, so that voice alternation downstream stays aligned with the
/// model's own turn structure.
pub fn split_dialogue<S: AsRef<str>>(blocks: &[S]) -> Vec<String> {
    if blocks.is_empty() {
        warn!("No dialogue blocks to split");
        return Vec::new();
    }

    let lines: Vec<String> = blocks
        .iter()
        .flat_map(|block| block.as_ref().split(TURN_DELIMITER))
        .map(str::to_string)
        .collect();

    debug!(blocks = blocks.len(), lines = lines.len(), "Dialogue split completed");
    lines
}

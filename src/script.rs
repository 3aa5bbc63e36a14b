//! Conversation script builder.
//!
//! Rewrites article sentences into two-speaker dialogue, one model request per
//! sentence, then flattens the replies into individual lines.

use crate::config::Prompts;
use crate::error::Result;
use crate::llm::{ChatMessage, LanguageModel};
use crate::segment::split_dialogue;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Turns sentences into dialogue lines through a language model.
pub struct ScriptBuilder {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
}

impl ScriptBuilder {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Prompts) -> Self {
        Self { model, prompts }
    }

    /// The system instruction sent with every sentence.
    pub fn system_instruction(&self) -> &str {
        &self.prompts.script.system
    }

    /// Build dialogue lines for the given sentences.
    ///
    /// Requests are issued sequentially and in order. A failed request aborts
    /// the whole script: a partial conversation would lose the bridging
    /// between turns that the prompt asks for.
    #[instrument(skip_all, fields(sentences = sentences.len()))]
    pub async fn build(&self, sentences: &[String]) -> Result<Vec<String>> {
        let system = ChatMessage::system(self.system_instruction());
        let mut blocks = Vec::with_capacity(sentences.len());

        info!("Dialogue conversion started");

        for (idx, sentence) in sentences.iter().enumerate() {
            debug!(sentence = idx + 1, "Converting sentence");
            let messages = [system.clone(), ChatMessage::user(sentence.as_str())];
            let reply = self.model.complete(&messages).await.inspect_err(|e| {
                warn!(sentence = idx + 1, "Dialogue conversion failed: {}", e);
            })?;
            blocks.push(reply);
        }

        info!(blocks = blocks.len(), "Dialogue conversion done");
        Ok(split_dialogue(&blocks))
    }
}

//! Language model access.
//!
//! The script builder talks to a chat model through [`LanguageModel`]. The
//! default implementation targets a local Ollama server.

mod ollama;

pub use ollama::OllamaClient;

use crate::config::LlmSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Decoding parameters fixed for a whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
}

impl From<&LlmSettings> for GenerationOptions {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            top_p: settings.top_p,
            top_k: settings.top_k,
            repeat_penalty: settings.repeat_penalty,
        }
    }
}

/// Trait for chat-style language models.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Cheap reachability check. Any failure counts as unavailable.
    async fn is_available(&self) -> bool;

    /// Run one chat completion and return the raw response text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

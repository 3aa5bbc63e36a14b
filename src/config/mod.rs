//! Configuration module for Radiohost.
//!
//! Handles loading application settings, prompt templates and TTS credentials.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{CredentialSource, Credentials, EnvCredentials, StaticCredentials};
pub use prompts::{Prompts, ScriptPrompts};
pub use settings::{
    ArticleSettings, CredentialSettings, GeneralSettings, LlmSettings, PromptSettings,
    ScriptSettings, Settings, TopicSettings, TtsSettings,
};

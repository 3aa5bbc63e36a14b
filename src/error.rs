//! Error types for Radiohost.

use thiserror::Error;

/// Library-level error type for Radiohost operations.
#[derive(Error, Debug)]
pub enum RadioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("LLM service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Article fetch failed: {0}")]
    Article(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Text-to-speech error: {0}")]
    Tts(String),

    #[error("Audio decode failed: {0}")]
    AudioDecode(String),

    #[error("Audio encode failed: {0}")]
    AudioEncode(String),

    #[error("No valid audio produced: {0}")]
    NoAudio(String),

    #[error("Required credential not set: {0}")]
    MissingCredential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RadioError {
    /// Whether the error should stop the whole process rather than a single step.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RadioError::Config(_)
                | RadioError::MissingCredential(_)
                | RadioError::ServiceUnavailable(_)
        )
    }
}

/// Result type alias for Radiohost operations.
pub type Result<T> = std::result::Result<T, RadioError>;

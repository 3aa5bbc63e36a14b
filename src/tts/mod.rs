//! Text-to-speech synthesis.
//!
//! The assembler only needs a stream of encoded audio bytes per line. Providers
//! implement [`SpeechSynthesizer`]; a [`SynthesizerFactory`] builds one from the
//! API key once credentials are known.

mod elevenlabs;

pub use elevenlabs::{ElevenLabsClient, ElevenLabsFactory};

use crate::config::TtsSettings;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// Encoded audio as it arrives from the provider.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// One of the two alternating speakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Voice {
    A,
    B,
}

impl Voice {
    /// Voice for the line at `index`: A on even positions, B on odd ones.
    pub fn for_line(index: usize) -> Self {
        if index % 2 == 0 {
            Voice::A
        } else {
            Voice::B
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Voice::A => write!(f, "A"),
            Voice::B => write!(f, "B"),
        }
    }
}

/// Expressiveness parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl From<&TtsSettings> for VoiceSettings {
    fn from(settings: &TtsSettings) -> Self {
        Self {
            stability: settings.stability,
            similarity_boost: settings.similarity_boost,
            style: settings.style,
            use_speaker_boost: settings.use_speaker_boost,
        }
    }
}

/// A single synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub voice_id: String,
    pub text: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

/// Trait for text-to-speech providers.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Start synthesis and return the audio bytes as they are streamed back.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<ByteStream>;
}

/// Builds a synthesizer from an API key.
pub trait SynthesizerFactory: Send + Sync {
    fn connect(&self, api_key: &str) -> Result<Box<dyn SpeechSynthesizer>>;
}

//! Configuration settings for Radiohost.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub topic: TopicSettings,
    pub article: ArticleSettings,
    pub script: ScriptSettings,
    pub llm: LlmSettings,
    pub tts: TtsSettings,
    pub credentials: CredentialSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Where the generated dialogue is written.
    pub output_path: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_path: "GeneratedAudio.wav".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Bounds applied to the topic before anything is fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicSettings {
    /// Minimum trimmed length in characters.
    pub min_chars: usize,
    /// Maximum trimmed length in characters.
    pub max_chars: usize,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            min_chars: 3,
            max_chars: 70,
        }
    }
}

/// Encyclopedia lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleSettings {
    /// Wikipedia base URL; `{language}` is replaced with the response language.
    pub base_url: String,
    /// Response language.
    pub language: String,
    /// Summary is cut to this many characters.
    pub max_chars: usize,
    /// Let the encyclopedia pick a close match when the title is not exact.
    pub auto_suggest: bool,
    /// Request timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for ArticleSettings {
    fn default() -> Self {
        Self {
            base_url: "https://{language}.wikipedia.org".to_string(),
            language: "en".to_string(),
            max_chars: 500,
            auto_suggest: false,
            timeout_secs: 30,
        }
    }
}

/// Conversation script settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// Only the first N sentences of the article are turned into dialogue.
    pub max_sentences: usize,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self { max_sentences: 5 }
    }
}

/// Local LLM (Ollama) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Ollama server URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
    /// Timeout for the availability probe in milliseconds; 0 disables it.
    pub probe_timeout_ms: u64,
    /// Timeout for a single generation request in seconds; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3:8b".to_string(),
            temperature: 0.35,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.18,
            probe_timeout_ms: 500,
            timeout_secs: 300,
        }
    }
}

/// Text-to-speech (ElevenLabs) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsSettings {
    /// ElevenLabs API URL.
    pub base_url: String,
    /// Synthesis model.
    pub model_id: String,
    /// Requested container/codec, e.g. mp3_44100_128 or wav_44100.
    pub output_format: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
    /// Spoken prefix for lines assigned to the first voice.
    pub label_a: String,
    /// Spoken prefix for lines assigned to the second voice.
    pub label_b: String,
    /// Request timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            model_id: "eleven_v3".to_string(),
            output_format: "mp3_44100_128".to_string(),
            stability: 0.5,
            similarity_boost: 0.6,
            style: 0.4,
            use_speaker_boost: true,
            label_a: "Priya".to_string(),
            label_b: "Kirti".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Names of the environment variables holding the TTS credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    pub api_key_var: String,
    pub voice_a_var: String,
    pub voice_b_var: String,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            api_key_var: "ELEVENLABS_API_KEY".to_string(),
            voice_a_var: "ELEVENLABS_voice_id_A".to_string(),
            voice_b_var: "ELEVENLABS_voice_id_B".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::RadioError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject combinations the pipeline cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::RadioError;

        if self.topic.min_chars == 0 || self.topic.min_chars > self.topic.max_chars {
            return Err(RadioError::Config(format!(
                "topic bounds must satisfy 0 < min_chars <= max_chars (got {}..{})",
                self.topic.min_chars, self.topic.max_chars
            )));
        }
        if self.script.max_sentences == 0 {
            return Err(RadioError::Config(
                "script.max_sentences must be at least 1".to_string(),
            ));
        }
        if self.article.max_chars == 0 {
            return Err(RadioError::Config(
                "article.max_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("radiohost")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output file path.
    pub fn output_path(&self) -> PathBuf {
        Self::expand_path(&self.general.output_path)
    }
}

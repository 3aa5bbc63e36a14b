//! Radiohost - Synthetic Radio Dialogues
//!
//! Turns a topic into a two-voice audio conversation.
//!
//! # Overview
//!
//! A run goes through these steps:
//! - Fetch a short Wikipedia summary for the topic
//! - Split it into sentences and keep the first few
//! - Rewrite each sentence into Hinglish dialogue with a local Ollama model
//! - Voice the lines with two alternating ElevenLabs voices
//! - Concatenate everything into one 16-bit mono WAV file
//!
//! # Architecture
//!
//! - `config` - Settings, prompt templates and TTS credentials
//! - `encyclopedia` - Article summaries
//! - `segment` - Sentence and dialogue segmentation
//! - `llm` - Chat model access
//! - `script` - Conversation script builder
//! - `tts` - Text-to-speech providers
//! - `audio` - Decoding, normalization, assembly and WAV output
//! - `progress` - Stage events for the entry points
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use radiohost::config::Settings;
//! use radiohost::orchestrator::Orchestrator;
//! use radiohost::progress::TracingObserver;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let report = orchestrator.run("Photosynthesis", &TracingObserver).await?;
//!     println!("Wrote {}", report.assembly.output_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod encyclopedia;
pub mod error;
pub mod http;
pub mod llm;
pub mod orchestrator;
pub mod progress;
pub mod script;
pub mod segment;
pub mod tts;

#[cfg(test)]
mod testing;

pub use error::{RadioError, Result};

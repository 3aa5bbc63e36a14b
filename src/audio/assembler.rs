//! Two-voice audio assembly.
//!
//! Each dialogue line is synthesized with alternating voices, decoded,
//! canonicalized to mono at the output rate and appended to one buffer that
//! is written out as a single WAV file.

use super::{decode_audio, resample, sanitize, write_wav, OUTPUT_SAMPLE_RATE};
use crate::config::{Credentials, TtsSettings};
use crate::error::{RadioError, Result};
use crate::progress::{ProgressEvent, ProgressObserver, Stage};
use crate::tts::{SpeechRequest, SpeechSynthesizer, SynthesizerFactory, Voice, VoiceSettings};
use futures::StreamExt;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Sample rates accepted from the TTS provider before resampling.
const MIN_SOURCE_RATE: u32 = 8_000;
const MAX_SOURCE_RATE: u32 = 192_000;

/// A line that produced no audio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    pub index: usize,
    pub reason: String,
}

/// Outcome of a successful assembly.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    pub output_path: PathBuf,
    pub lines_total: usize,
    pub lines_used: usize,
    pub skipped: Vec<SkippedLine>,
    pub duration_seconds: f64,
}

/// Synthesizes dialogue lines and writes them as one audio file.
pub struct AudioAssembler {
    factory: Arc<dyn SynthesizerFactory>,
    settings: TtsSettings,
    voice_settings: VoiceSettings,
}

impl AudioAssembler {
    pub fn new(factory: Arc<dyn SynthesizerFactory>, settings: TtsSettings) -> Self {
        let voice_settings = VoiceSettings::from(&settings);
        Self {
            factory,
            settings,
            voice_settings,
        }
    }

    fn label(&self, voice: Voice) -> &str {
        match voice {
            Voice::A => &self.settings.label_a,
            Voice::B => &self.settings.label_b,
        }
    }

    fn request_for(&self, voice: Voice, line: &str, credentials: &Credentials) -> SpeechRequest {
        let voice_id = match voice {
            Voice::A => &credentials.voice_id_a,
            Voice::B => &credentials.voice_id_b,
        };
        let label = self.label(voice);
        let text = if label.is_empty() {
            line.to_string()
        } else {
            format!("{} {}", label, line)
        };

        SpeechRequest {
            voice_id: voice_id.clone(),
            text,
            model_id: self.settings.model_id.clone(),
            voice_settings: self.voice_settings.clone(),
        }
    }

    /// Synthesize every line and write the concatenated result to `output_path`.
    ///
    /// Lines that fail are skipped and reported; the call only fails when no
    /// line produced usable audio or the file cannot be written.
    #[instrument(skip_all, fields(lines = lines.len(), path = %output_path.display()))]
    pub async fn assemble(
        &self,
        lines: &[String],
        credentials: &Credentials,
        output_path: &Path,
        observer: &dyn ProgressObserver,
    ) -> Result<AssemblyReport> {
        if lines.is_empty() {
            warn!("Invalid audio data: must be a non-empty list");
            return Err(RadioError::InvalidInput(
                "dialogue must contain at least one line".to_string(),
            ));
        }

        let synthesizer = self.factory.connect(&credentials.api_key).inspect_err(|e| {
            warn!("Failed to initialize TTS client: {}", e);
        })?;

        let total = lines.len();
        let mut buffer: Vec<f32> = Vec::new();
        let mut skipped = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let voice = Voice::for_line(index);
            let request = self.request_for(voice, line, credentials);

            match self.render(synthesizer.as_ref(), &request).await {
                Ok(samples) => {
                    debug!(line = index, %voice, samples = samples.len(), "Line synthesized");
                    buffer.extend_from_slice(&samples);
                }
                Err(e) => {
                    warn!(line = index, %voice, "Skipping line: {}", e);
                    skipped.push(SkippedLine {
                        index,
                        reason: e.to_string(),
                    });
                }
            }

            observer.on_event(&ProgressEvent::progress(
                Stage::Synthesize,
                index + 1,
                total,
                format!("Line {}/{} processed", index + 1, total),
            ));
        }

        if buffer.is_empty() {
            warn!("No valid audio available to write");
            return Err(RadioError::NoAudio(format!(
                "all {} lines failed to synthesize",
                total
            )));
        }

        write_wav(output_path, &buffer, OUTPUT_SAMPLE_RATE)?;

        let report = AssemblyReport {
            output_path: output_path.to_path_buf(),
            lines_total: total,
            lines_used: total - skipped.len(),
            skipped,
            duration_seconds: buffer.len() as f64 / OUTPUT_SAMPLE_RATE as f64,
        };

        info!(
            used = report.lines_used,
            skipped = report.skipped.len(),
            seconds = report.duration_seconds,
            "Audio written"
        );

        Ok(report)
    }

    /// Synthesize one request into mono samples at the output rate.
    async fn render(
        &self,
        synthesizer: &dyn SpeechSynthesizer,
        request: &SpeechRequest,
    ) -> Result<Vec<f32>> {
        let mut stream = synthesizer.synthesize(request).await?;
        let mut payload = Vec::new();
        while let Some(chunk) = stream.next().await {
            payload.extend_from_slice(&chunk?);
        }

        if payload.is_empty() {
            return Err(RadioError::NoAudio("empty audio payload".to_string()));
        }

        let decoded = decode_audio(&payload)?;
        if !(MIN_SOURCE_RATE..=MAX_SOURCE_RATE).contains(&decoded.sample_rate) {
            return Err(RadioError::AudioDecode(format!(
                "unsupported sample rate {} Hz",
                decoded.sample_rate
            )));
        }
        let samples = sanitize(Some(decoded.samples))
            .ok_or_else(|| RadioError::AudioDecode("unusable sample layout".to_string()))?;

        Ok(resample(&samples, decoded.sample_rate, OUTPUT_SAMPLE_RATE))
    }
}

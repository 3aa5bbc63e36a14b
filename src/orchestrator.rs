//! Pipeline orchestrator for Radiohost.
//!
//! Coordinates the whole run from topic to audio file: service check, article
//! fetch, sentence segmentation, script building, credential check and
//! synthesis. Stages run strictly in order; the first failure ends the run.

use crate::audio::{AssemblyReport, AudioAssembler};
use crate::config::{CredentialSource, EnvCredentials, Prompts, Settings};
use crate::encyclopedia::{truncate_chars, ArticleSource, WikipediaClient};
use crate::error::{RadioError, Result};
use crate::llm::{LanguageModel, OllamaClient};
use crate::progress::{ProgressEvent, ProgressObserver, Stage};
use crate::script::ScriptBuilder;
use crate::segment::{segment_sentences, EnglishSentenceSplitter, SentenceSplitter};
use crate::tts::{ElevenLabsFactory, SynthesizerFactory};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Radiohost pipeline.
pub struct Orchestrator {
    settings: Settings,
    articles: Arc<dyn ArticleSource>,
    model: Arc<dyn LanguageModel>,
    splitter: Arc<dyn SentenceSplitter>,
    credentials: Arc<dyn CredentialSource>,
    script: ScriptBuilder,
    assembler: AudioAssembler,
}

/// Result of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Trimmed topic the run was made for.
    pub topic: String,
    /// Sentences sent to the script builder.
    pub sentences: Vec<String>,
    /// Dialogue lines sent to synthesis.
    pub lines: Vec<String>,
    pub assembly: AssemblyReport,
}

impl Orchestrator {
    /// Create an orchestrator backed by Wikipedia, Ollama and ElevenLabs.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let articles: Arc<dyn ArticleSource> = Arc::new(WikipediaClient::new(&settings.article)?);
        let model: Arc<dyn LanguageModel> = Arc::new(OllamaClient::new(&settings.llm)?);
        let splitter: Arc<dyn SentenceSplitter> = Arc::new(EnglishSentenceSplitter::new());
        let credentials: Arc<dyn CredentialSource> =
            Arc::new(EnvCredentials::new(settings.credentials.clone()));
        let factory: Arc<dyn SynthesizerFactory> =
            Arc::new(ElevenLabsFactory::new(settings.tts.clone()));

        info!(
            "Using {} at {} for dialogue",
            settings.llm.model, settings.llm.base_url
        );

        Ok(Self::with_components(
            settings,
            prompts,
            articles,
            model,
            splitter,
            credentials,
            factory,
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        articles: Arc<dyn ArticleSource>,
        model: Arc<dyn LanguageModel>,
        splitter: Arc<dyn SentenceSplitter>,
        credentials: Arc<dyn CredentialSource>,
        factory: Arc<dyn SynthesizerFactory>,
    ) -> Self {
        let script = ScriptBuilder::new(model.clone(), prompts);
        let assembler = AudioAssembler::new(factory, settings.tts.clone());

        Self {
            settings,
            articles,
            model,
            splitter,
            credentials,
            script,
            assembler,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether the language model answers its probe.
    pub async fn llm_available(&self) -> bool {
        self.model.is_available().await
    }

    /// Trim the topic and check its length against the configured bounds.
    pub fn validate_topic(&self, topic: &str) -> Result<String> {
        let topic = topic.trim();
        let len = topic.chars().count();
        let bounds = &self.settings.topic;

        if len < bounds.min_chars || len > bounds.max_chars {
            return Err(RadioError::InvalidTopic(format!(
                "must be between {} and {} characters (got {})",
                bounds.min_chars, bounds.max_chars, len
            )));
        }

        Ok(topic.to_string())
    }

    /// Run the full pipeline for one topic.
    #[instrument(skip(self, observer))]
    pub async fn run(&self, topic: &str, observer: &dyn ProgressObserver) -> Result<RunReport> {
        let topic = self
            .validate_topic(topic)
            .map_err(|e| fail(observer, Stage::Validate, e))?;

        // Service check
        observer.on_event(&ProgressEvent::started(
            Stage::ServiceCheck,
            "Checking language model service",
        ));
        if !self.model.is_available().await {
            return Err(fail(
                observer,
                Stage::ServiceCheck,
                RadioError::ServiceUnavailable(format!(
                    "no response from {}; start it with `ollama serve`",
                    self.settings.llm.base_url
                )),
            ));
        }
        observer.on_event(&ProgressEvent::completed(
            Stage::ServiceCheck,
            "Language model service is running",
        ));

        // Fetch
        observer.on_event(&ProgressEvent::started(
            Stage::Fetch,
            format!("Fetching article on '{}'", topic),
        ));
        let summary = self
            .articles
            .fetch_summary(&topic)
            .await
            .map_err(|e| fail(observer, Stage::Fetch, e))?;
        let summary = truncate_chars(&summary, self.settings.article.max_chars).trim();
        if summary.is_empty() {
            return Err(fail(
                observer,
                Stage::Fetch,
                RadioError::Article(format!("empty summary for '{}'", topic)),
            ));
        }
        observer.on_event(&ProgressEvent::completed(
            Stage::Fetch,
            format!("Fetched article ({} characters)", summary.chars().count()),
        ));

        // Segment
        observer.on_event(&ProgressEvent::started(Stage::Segment, "Tokenizing sentences"));
        let mut sentences = segment_sentences(self.splitter.as_ref(), Some(summary));
        sentences.truncate(self.settings.script.max_sentences);
        if sentences.is_empty() {
            return Err(fail(
                observer,
                Stage::Segment,
                RadioError::InvalidInput("article produced no sentences".to_string()),
            ));
        }
        observer.on_event(&ProgressEvent::completed(
            Stage::Segment,
            format!("Tokenization completed ({} sentences)", sentences.len()),
        ));

        // Script build
        observer.on_event(&ProgressEvent::started(
            Stage::ScriptBuild,
            "Converting sentences into dialogue",
        ));
        let lines = self
            .script
            .build(&sentences)
            .await
            .map_err(|e| fail(observer, Stage::ScriptBuild, e))?;
        if lines.is_empty() {
            return Err(fail(
                observer,
                Stage::ScriptBuild,
                RadioError::InvalidInput("model produced no dialogue".to_string()),
            ));
        }
        observer.on_event(&ProgressEvent::completed(
            Stage::ScriptBuild,
            format!("Dialogue ready ({} lines)", lines.len()),
        ));

        // Credential check
        observer.on_event(&ProgressEvent::started(
            Stage::CredentialCheck,
            "Reading TTS credentials",
        ));
        let credentials = self
            .credentials
            .resolve()
            .map_err(|e| fail(observer, Stage::CredentialCheck, e))?;
        observer.on_event(&ProgressEvent::completed(
            Stage::CredentialCheck,
            "TTS credentials found",
        ));

        // Synthesize
        observer.on_event(&ProgressEvent::started(
            Stage::Synthesize,
            format!("Generating audio for {} lines", lines.len()),
        ));
        let output_path = self.settings.output_path();
        let assembly = self
            .assembler
            .assemble(&lines, &credentials, &output_path, observer)
            .await
            .map_err(|e| fail(observer, Stage::Synthesize, e))?;
        observer.on_event(&ProgressEvent::completed(
            Stage::Synthesize,
            format!(
                "Audio saved to {} ({}/{} lines)",
                assembly.output_path.display(),
                assembly.lines_used,
                assembly.lines_total
            ),
        ));

        Ok(RunReport {
            topic,
            sentences,
            lines,
            assembly,
        })
    }
}

/// Report a stage failure and hand the error back.
fn fail(observer: &dyn ProgressObserver, stage: Stage, error: RadioError) -> RadioError {
    observer.on_event(&ProgressEvent::failed(stage, error.to_string()));
    error
}

//! Ollama chat client.

use super::{ChatMessage, GenerationOptions, LanguageModel};
use crate::config::LlmSettings;
use crate::error::{RadioError, Result};
use crate::http::{create_client_with_timeout, endpoint};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Client for a local Ollama server.
pub struct OllamaClient {
    client: reqwest::Client,
    probe_client: reqwest::Client,
    base_url: String,
    options: GenerationOptions,
}

/// Ollama-format chat request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repeat_penalty: f32,
}

/// Ollama-format chat response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

impl OllamaClient {
    /// Create a client from settings.
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let client = create_client_with_timeout(Duration::from_secs(settings.timeout_secs))?;
        let probe_client =
            create_client_with_timeout(Duration::from_millis(settings.probe_timeout_ms))?;

        info!(
            base_url = %settings.base_url,
            model = %settings.model,
            "Initialized Ollama client"
        );

        Ok(Self {
            client,
            probe_client,
            base_url: settings.base_url.clone(),
            options: GenerationOptions::from(settings),
        })
    }

    /// Decoding options used for every request.
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn is_available(&self) -> bool {
        let url = match endpoint(&self.base_url, "api/tags") {
            Ok(url) => url,
            Err(e) => {
                warn!("Ollama probe skipped: {}", e);
                return false;
            }
        };

        // Any HTTP answer means the server is up; only transport failures count.
        match self.probe_client.get(url).send().await {
            Ok(_) => true,
            Err(e) => {
                warn!("Ollama connection failed: {}", e);
                false
            }
        }
    }

    #[instrument(skip(self, messages), fields(model = %self.options.model, turns = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = OllamaChatRequest {
            model: &self.options.model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: self.options.temperature,
                top_p: self.options.top_p,
                top_k: self.options.top_k,
                repeat_penalty: self.options.repeat_penalty,
            },
        };

        debug!("Sending chat request to Ollama");

        let response = self
            .client
            .post(endpoint(&self.base_url, "api/chat")?)
            .json(&request)
            .send()
            .await
            .map_err(|e| RadioError::Llm(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Chat request failed");
            return Err(RadioError::Llm(format!("Status {}: {}", status, body)));
        }

        let chat: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| RadioError::Llm(format!("Invalid Ollama response: {}", e)))?;

        debug!(tokens = ?chat.eval_count, "Chat completed");
        Ok(chat.message.content)
    }
}

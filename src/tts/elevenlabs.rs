//! ElevenLabs text-to-speech client.

use super::{ByteStream, SpeechRequest, SpeechSynthesizer, SynthesizerFactory, VoiceSettings};
use crate::config::TtsSettings;
use crate::error::{RadioError, Result};
use crate::http::{create_client_with_timeout, endpoint};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const API_KEY_HEADER: &str = "xi-api-key";

/// ElevenLabs REST client.
pub struct ElevenLabsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: HeaderValue,
    output_format: String,
}

#[derive(Debug, Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

impl ElevenLabsClient {
    /// Create a client for the given API key.
    pub fn new(api_key: &str, settings: &TtsSettings) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(RadioError::Tts("API key is empty".to_string()));
        }

        let mut api_key = HeaderValue::from_str(api_key)
            .map_err(|_| RadioError::Tts("API key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);

        // Fail on a bad base URL now rather than on the first line.
        endpoint(&settings.base_url, "v1/text-to-speech/")?;

        Ok(Self {
            client: create_client_with_timeout(Duration::from_secs(settings.timeout_secs))?,
            base_url: settings.base_url.clone(),
            api_key,
            output_format: settings.output_format.clone(),
        })
    }

    fn speech_url(&self, voice_id: &str) -> Result<url::Url> {
        let mut url = endpoint(&self.base_url, "v1/text-to-speech/")?;
        url.path_segments_mut()
            .map_err(|_| RadioError::Config(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push(voice_id);
        url.query_pairs_mut()
            .append_pair("output_format", &self.output_format);
        Ok(url)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    #[instrument(skip(self, request), fields(voice_id = %request.voice_id, chars = request.text.len()))]
    async fn synthesize(&self, request: &SpeechRequest) -> Result<ByteStream> {
        let body = TextToSpeechBody {
            text: &request.text,
            model_id: &request.model_id,
            voice_settings: &request.voice_settings,
        };

        debug!("Requesting speech from ElevenLabs");

        let response = self
            .client
            .post(self.speech_url(&request.voice_id)?)
            .header(API_KEY_HEADER, self.api_key.clone())
            .header(ACCEPT, "audio/*")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, "ElevenLabs request failed");
            return Err(RadioError::Tts(format!("Status {}: {}", status, text)));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(RadioError::from))
            .boxed())
    }
}

/// Builds [`ElevenLabsClient`]s from configured settings.
pub struct ElevenLabsFactory {
    settings: TtsSettings,
}

impl ElevenLabsFactory {
    pub fn new(settings: TtsSettings) -> Self {
        Self { settings }
    }
}

impl SynthesizerFactory for ElevenLabsFactory {
    fn connect(&self, api_key: &str) -> Result<Box<dyn SpeechSynthesizer>> {
        Ok(Box::new(ElevenLabsClient::new(api_key, &self.settings)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(base_url: &str) -> TtsSettings {
        TtsSettings {
            base_url: base_url.to_string(),
            ..TtsSettings::default()
        }
    }

    fn request(voice_id: &str, text: &str) -> SpeechRequest {
        let settings = TtsSettings::default();
        SpeechRequest {
            voice_id: voice_id.to_string(),
            text: text.to_string(),
            model_id: settings.model_id.clone(),
            voice_settings: VoiceSettings::from(&settings),
        }
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = ElevenLabsClient::new("  ", &TtsSettings::default()).err().unwrap();
        assert!(matches!(err, RadioError::Tts(_)));
    }

    #[test]
    fn test_key_with_newline_rejected() {
        assert!(ElevenLabsClient::new("bad\nkey", &TtsSettings::default()).is_err());
    }

    #[test]
    fn test_factory_connects() {
        let factory = ElevenLabsFactory::new(TtsSettings::default());
        assert!(factory.connect("key").is_ok());
        assert!(factory.connect("").is_err());
    }

    #[tokio::test]
    async fn test_synthesize_streams_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-a"))
            .and(query_param("output_format", "mp3_44100_128"))
            .and(header("xi-api-key", "secret"))
            .and(body_partial_json(serde_json::json!({
                "text": "Priya namaste",
                "model_id": "eleven_v3",
                "voice_settings": {
                    "stability": 0.5,
                    "use_speaker_boost": true
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"audio-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ElevenLabsClient::new("secret", &settings_for(&server.uri())).unwrap();
        let stream = client.synthesize(&request("voice-a", "Priya namaste")).await.unwrap();
        let chunks: Vec<bytes::Bytes> = stream.try_collect().await.unwrap();
        let joined: Vec<u8> = chunks.concat();
        assert_eq!(joined, b"audio-bytes");
    }

    #[tokio::test]
    async fn test_synthesize_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = ElevenLabsClient::new("secret", &settings_for(&server.uri())).unwrap();
        let err = client.synthesize(&request("voice-a", "hi")).await.err().unwrap();
        match err {
            RadioError::Tts(msg) => assert!(msg.contains("401")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

//! In-memory stand-ins for the external services, shared by unit tests.

use crate::config::Credentials;
use crate::encyclopedia::ArticleSource;
use crate::error::{RadioError, Result};
use crate::llm::{ChatMessage, LanguageModel, Role};
use crate::tts::{ByteStream, SpeechRequest, SpeechSynthesizer, SynthesizerFactory};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Encode 16-bit samples as an in-memory WAV file.
pub fn make_wav_data(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
    cursor.into_inner()
}

/// A short mono tone at 44.1 kHz whose level depends on `seed`.
pub fn tone(seed: usize, len: usize) -> Vec<u8> {
    let level = 1000 + (seed as i16 % 20) * 500;
    let samples: Vec<i16> = (0..len)
        .map(|i| if i % 2 == 0 { level } else { -level })
        .collect();
    make_wav_data(44_100, 1, &samples)
}

pub fn credentials() -> Credentials {
    Credentials::new("test-key", "voice-a", "voice-b")
}

/// Model whose replies come from a closure over the user message.
pub struct ScriptedModel {
    reply: Box<dyn Fn(&str) -> Result<String> + Send + Sync>,
    available: bool,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn offline() -> Self {
        Self {
            available: false,
            ..Self::new(|_| Err(RadioError::Llm("offline".to_string())))
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        (self.reply)(user)
    }
}

/// Article source answering with a fixed result.
pub struct FixedArticle {
    summary: std::result::Result<String, String>,
    pub requests: Mutex<Vec<String>>,
}

impl FixedArticle {
    pub fn found(summary: impl Into<String>) -> Self {
        Self {
            summary: Ok(summary.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn missing(reason: impl Into<String>) -> Self {
        Self {
            summary: Err(reason.into()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ArticleSource for FixedArticle {
    async fn fetch_summary(&self, topic: &str) -> Result<String> {
        self.requests.lock().unwrap().push(topic.to_string());
        self.summary.clone().map_err(RadioError::Article)
    }
}

/// What a scripted synthesizer returns for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Audio delivered in two chunks.
    Audio(Vec<u8>),
    /// A stream with no bytes at all.
    Empty,
    /// The request itself fails.
    Fail(String),
    /// The stream breaks after the first chunk.
    Broken(Vec<u8>),
}

type ReplyFn = dyn Fn(usize, &SpeechRequest) -> Reply + Send + Sync;

/// Shared state behind [`ScriptedFactory`] and the synthesizers it hands out.
pub struct SynthState {
    reply: Box<ReplyFn>,
    pub requests: Mutex<Vec<SpeechRequest>>,
    pub api_keys: Mutex<Vec<String>>,
}

/// Factory producing synthesizers driven by a reply closure.
#[derive(Clone)]
pub struct ScriptedFactory {
    state: Arc<SynthState>,
    refuse_connect: bool,
}

impl ScriptedFactory {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(usize, &SpeechRequest) -> Reply + Send + Sync + 'static,
    {
        Self {
            state: Arc::new(SynthState {
                reply: Box::new(reply),
                requests: Mutex::new(Vec::new()),
                api_keys: Mutex::new(Vec::new()),
            }),
            refuse_connect: false,
        }
    }

    /// Every line gets a valid tone derived from its text.
    pub fn tones() -> Self {
        Self::new(|_, request| Reply::Audio(tone(request.text.len(), 64)))
    }

    pub fn refusing() -> Self {
        Self {
            refuse_connect: true,
            ..Self::tones()
        }
    }

    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn api_keys(&self) -> Vec<String> {
        self.state.api_keys.lock().unwrap().clone()
    }
}

impl SynthesizerFactory for ScriptedFactory {
    fn connect(&self, api_key: &str) -> Result<Box<dyn SpeechSynthesizer>> {
        if self.refuse_connect {
            return Err(RadioError::Tts("Failed to initialize client".to_string()));
        }
        self.state.api_keys.lock().unwrap().push(api_key.to_string());
        Ok(Box::new(ScriptedSynthesizer {
            state: self.state.clone(),
        }))
    }
}

struct ScriptedSynthesizer {
    state: Arc<SynthState>,
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<ByteStream> {
        let index = {
            let mut requests = self.state.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        let halves = |data: Vec<u8>| {
            let mid = data.len() / 2;
            (Bytes::copy_from_slice(&data[..mid]), Bytes::copy_from_slice(&data[mid..]))
        };

        match (self.state.reply)(index, request) {
            Reply::Audio(data) => {
                let (head, tail) = halves(data);
                Ok(stream::iter(vec![Ok(head), Ok(tail)]).boxed())
            }
            Reply::Empty => Ok(stream::empty::<Result<Bytes>>().boxed()),
            Reply::Fail(reason) => Err(RadioError::Tts(reason)),
            Reply::Broken(data) => {
                let (head, _) = halves(data);
                Ok(stream::iter(vec![
                    Ok(head),
                    Err(RadioError::Tts("connection reset".to_string())),
                ])
                .boxed())
            }
        }
    }
}

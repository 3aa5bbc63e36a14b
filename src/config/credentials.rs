//! TTS credential resolution.
//!
//! The API key and both voice ids are read once per run, before any audio is
//! requested. A missing value is a fatal configuration error that the entry
//! point decides how to handle.

use super::CredentialSettings;
use crate::error::{RadioError, Result};

/// API key plus the two voice ids used for the alternating speakers.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub voice_id_a: String,
    pub voice_id_b: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        voice_id_a: impl Into<String>,
        voice_id_b: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            voice_id_a: voice_id_a.into(),
            voice_id_b: voice_id_b.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("voice_id_a", &self.voice_id_a)
            .field("voice_id_b", &self.voice_id_b)
            .finish()
    }
}

/// Source of the credential bundle.
pub trait CredentialSource: Send + Sync {
    fn resolve(&self) -> Result<Credentials>;
}

/// Reads credentials from the process environment.
pub struct EnvCredentials {
    names: CredentialSettings,
}

impl EnvCredentials {
    pub fn new(names: CredentialSettings) -> Self {
        Self { names }
    }

    /// Resolve using an arbitrary lookup function instead of the real environment.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(RadioError::MissingCredential(name.to_string())),
            }
        };

        let api_key = fetch(&self.names.api_key_var)?;
        let voice_id_a = fetch(&self.names.voice_a_var)?;
        let voice_id_b = fetch(&self.names.voice_b_var)?;

        Ok(Credentials {
            api_key,
            voice_id_a,
            voice_id_b,
        })
    }

    /// Names of the variables that are currently unset or empty.
    pub fn missing(&self) -> Vec<String> {
        [
            &self.names.api_key_var,
            &self.names.voice_a_var,
            &self.names.voice_b_var,
        ]
        .into_iter()
        .filter(|name| {
            std::env::var(name.as_str())
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
        .cloned()
        .collect()
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(CredentialSettings::default())
    }
}

impl CredentialSource for EnvCredentials {
    fn resolve(&self) -> Result<Credentials> {
        self.resolve_with(|name| std::env::var(name).ok())
    }
}

/// Fixed credentials, for embedding and tests.
pub struct StaticCredentials(pub Credentials);

impl CredentialSource for StaticCredentials {
    fn resolve(&self) -> Result<Credentials> {
        Ok(self.0.clone())
    }
}

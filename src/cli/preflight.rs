//! Pre-flight checks before expensive operations.
//!
//! Validates that the TTS credentials are present before any article is
//! fetched or any model request is made, so a run does not fail after
//! minutes of script generation.

use crate::config::{EnvCredentials, Settings};
use crate::error::{RadioError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Generation needs all three TTS credentials.
    Generate,
    /// The API server synthesizes with the same credentials.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Generate | Operation::Serve => {
            check_credentials(&EnvCredentials::new(settings.credentials.clone()))
        }
    }
}

/// Check that every credential variable is set.
fn check_credentials(source: &EnvCredentials) -> Result<()> {
    let missing = source.missing();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RadioError::MissingCredential(missing.join(", ")))
    }
}

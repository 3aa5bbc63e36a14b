//! Doctor command - verify services, credentials and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::llm::{LanguageModel, OllamaClient};
use console::style;
use std::path::{Path, PathBuf};

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: Option<&str>) -> anyhow::Result<()> {
    Output::header("Radiohost Doctor");
    println!();
    println!("Checking services, credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Language Model").bold());
    let llm_check = check_llm(settings).await;
    llm_check.print();
    checks.push(llm_check);

    println!();

    println!("{}", style("Text-to-Speech Credentials").bold());
    let names = [
        (&settings.credentials.api_key_var, true),
        (&settings.credentials.voice_a_var, false),
        (&settings.credentials.voice_b_var, false),
    ];
    for (name, secret) in names {
        let check = check_env_var(name, std::env::var(name).ok(), secret);
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Output").bold());
    let output_check = check_output_dir(&settings.output_path());
    output_check.print();
    checks.push(output_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_path = config_path
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);
    let config_check = check_config_file(&config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before generating audio.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Radiohost is ready to use.");
    }

    Ok(())
}

/// Probe the Ollama server.
async fn check_llm(settings: &Settings) -> CheckResult {
    let name = format!("Ollama ({})", settings.llm.model);
    let client = match OllamaClient::new(&settings.llm) {
        Ok(client) => client,
        Err(e) => {
            return CheckResult::error(&name, &e.to_string(), "Check llm.base_url in the config file")
        }
    };

    if client.is_available().await {
        CheckResult::ok(&name, &format!("running at {}", settings.llm.base_url))
    } else {
        CheckResult::error(
            &name,
            &format!("not reachable at {}", settings.llm.base_url),
            &format!(
                "Start with: ollama serve (and pull the model: ollama pull {})",
                settings.llm.model
            ),
        )
    }
}

/// Check one credential variable, masking secrets.
fn check_env_var(name: &str, value: Option<String>, secret: bool) -> CheckResult {
    let hint = format!("Set with: export {}='...'", name);
    match value {
        Some(v) if v.trim().is_empty() => CheckResult::error(name, "empty", &hint),
        Some(v) if secret => CheckResult::ok(name, &format!("configured ({})", mask_secret(&v))),
        Some(v) => CheckResult::ok(name, &v),
        None => CheckResult::error(name, "not set", &hint),
    }
}

/// Keep only the first and last four characters of a secret.
fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Check that the output file can be created.
fn check_output_dir(output: &Path) -> CheckResult {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if dir.is_dir() {
        CheckResult::ok("Output file", &output.display().to_string())
    } else {
        CheckResult::error(
            "Output file",
            &format!("directory {} does not exist", dir.display()),
            "Create the directory or change general.output_path",
        )
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: radiohost config init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk_1234567890abcdef"), "sk_1...cdef");
        assert_eq!(mask_secret("short"), "*****");
    }

    #[test]
    fn test_check_env_var() {
        let key = check_env_var("ELEVENLABS_API_KEY", Some("sk_1234567890abcdef".into()), true);
        assert_eq!(key.status, CheckStatus::Ok);
        assert!(!key.message.contains("567890"));

        let voice = check_env_var("ELEVENLABS_voice_id_A", Some("voice-a".into()), false);
        assert_eq!(voice.message, "voice-a");

        assert_eq!(check_env_var("X", None, false).status, CheckStatus::Error);
        assert_eq!(check_env_var("X", Some("  ".into()), false).status, CheckStatus::Error);
    }

    #[test]
    fn test_check_output_dir() {
        let dir = TempDir::new().unwrap();
        assert_eq!(check_output_dir(&dir.path().join("a.wav")).status, CheckStatus::Ok);
        assert_eq!(check_output_dir(Path::new("GeneratedAudio.wav")).status, CheckStatus::Ok);
        assert_eq!(
            check_output_dir(&dir.path().join("missing").join("a.wav")).status,
            CheckStatus::Error
        );
    }

    #[tokio::test]
    async fn test_check_llm_unreachable() {
        let mut settings = Settings::default();
        settings.llm.base_url = "http://127.0.0.1:9".to_string();
        assert_eq!(check_llm(&settings).await.status, CheckStatus::Error);
    }
}

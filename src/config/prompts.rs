//! Prompt templates for Radiohost.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    /// Prompts for rewriting article sentences into dialogue.
    pub script: ScriptPrompts,
}

/// Prompts for the conversation script builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPrompts {
    pub system: String,
}

impl Default for ScriptPrompts {
    fn default() -> Self {
        Self {
            system: r#"
Role: Expert Hinglish Scriptwriter specialized in natural, structured debates.

Task: Convert the provided English text into a fluid Hinglish discussion between two females speakers. The dialogue must be max 50–60 words.

Strict Guidelines:

Logical Flow:
Dont use speaker names , just keep avoid it
Every turn must bridge from the previous statement . Ensure ideas evolve without repeating facts.
Language (Hinglish): Use Roman Hindi.
No English sentences.
Blend English keywords (nouns/verbs) into Hindi grammar naturally.

Tone & Grammar:
Use Respectful plural forms.
Maintain strict noun-verb-gender agreement.

Fillers:
Include natural transitions like matlab, dekhiye, waise, sahi baat hai.

Audio Cues (ElevenLabs):
Use cues like [happy], [smile], [sad], [thinking], [sigh], [pause], [laugh], [serious], [relief], [excited], [surprised], [hmm], [clears throat].

Constraints:
1. START IMMEDIATELY: No intro, no "Here is the script," and no meta-tags.
2. Output should contain only conversation
3. Strictly Avoid any Auto generated Note etc.
"#
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, overriding the built-in defaults from an optional custom directory.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_keywords() {
        let prompts = Prompts::default();
        let system = &prompts.script.system;
        assert!(system.contains("Hinglish"));
        assert!(system.contains("Role"));
        assert!(system.contains("Task"));
        assert!(system.contains("Audio Cues"));
    }

    #[test]
    fn test_default_prompt_is_stable() {
        assert_eq!(
            Prompts::default().script.system,
            Prompts::default().script.system
        );
    }

    #[test]
    fn test_custom_dir_overrides_script_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("script.toml"),
            "system = \"Write a short dialogue.\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str()).unwrap();
        assert_eq!(prompts.script.system, "Write a short dialogue.");
    }

    #[test]
    fn test_missing_custom_file_keeps_default() {
        let dir = tempfile::tempdir().unwrap();
        let prompts = Prompts::load(dir.path().to_str()).unwrap();
        assert!(prompts.script.system.contains("Hinglish"));
    }
}

//! CLI module for Radiohost.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{format_duration, Output, TerminalObserver};

use clap::{Parser, Subcommand};

/// Radiohost - Synthetic Radio Dialogues
///
/// Turns a topic into a two-voice Hinglish radio conversation: a Wikipedia
/// summary is rewritten by a local Ollama model and voiced with ElevenLabs.
#[derive(Parser, Debug)]
#[command(name = "radiohost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a dialogue audio file for a topic
    Generate {
        /// Topic to look up (3-70 characters)
        #[arg(short, long)]
        text: String,

        /// Output WAV file (overrides general.output_path)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check services, credentials and configuration
    Doctor,

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from(["radiohost", "-v", "generate", "--text", "Photosynthesis"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Generate { text, output } => {
                assert_eq!(text, "Photosynthesis");
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_generate_requires_text() {
        assert!(Cli::try_parse_from(["radiohost", "generate"]).is_err());
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["radiohost", "serve"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 3000);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["radiohost", "config", "show", "--config", "/tmp/r.toml"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/r.toml"));
    }
}

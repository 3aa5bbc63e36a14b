//! Generate command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{format_duration, Output, TerminalObserver};
use crate::config::Settings;
use crate::error::RadioError;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the generate command.
///
/// Pipeline failures are reported on the terminal and are not process errors.
pub async fn run_generate(text: &str, output: Option<String>, mut settings: Settings) -> Result<()> {
    if let Some(path) = output {
        settings.general.output_path = path;
    }

    let orchestrator = Orchestrator::new(settings)?;

    if let Err(e) = precheck(&orchestrator, text) {
        Output::error(&e.to_string());
        advise(&e);
        return Ok(());
    }

    Output::header("Radiohost");
    Output::kv("Topic", text.trim());
    Output::kv("Model", &orchestrator.settings().llm.model);
    println!();

    let observer = TerminalObserver::new();
    match orchestrator.run(text, &observer).await {
        Ok(report) => {
            println!();
            Output::success(&format!(
                "Audio saved to {}",
                report.assembly.output_path.display()
            ));
            Output::kv("Sentences", &report.sentences.len().to_string());
            Output::kv(
                "Lines",
                &format!(
                    "{} of {} voiced",
                    report.assembly.lines_used, report.assembly.lines_total
                ),
            );
            Output::kv(
                "Duration",
                &format_duration(report.assembly.duration_seconds),
            );

            if !report.assembly.skipped.is_empty() {
                Output::warning("Some lines were skipped:");
                for skipped in &report.assembly.skipped {
                    Output::list_item(&format!("line {}: {}", skipped.index + 1, skipped.reason));
                }
            }
        }
        Err(e) => advise(&e),
    }

    Ok(())
}

/// Checks that cost no network round trip: topic bounds, then credentials.
fn precheck(orchestrator: &Orchestrator, text: &str) -> crate::error::Result<()> {
    orchestrator.validate_topic(text)?;
    preflight::check(Operation::Generate, orchestrator.settings())
}

/// Follow-up advice for errors the user can fix.
fn advise(error: &RadioError) {
    hint(error);
    if error.is_fatal() {
        Output::info("Run `radiohost doctor` to check the setup.");
    }
}

fn hint(error: &RadioError) {
    match error {
        RadioError::ServiceUnavailable(_) => {
            Output::info("Start the model server with: ollama serve");
        }
        RadioError::MissingCredential(names) => {
            let first = names.split(", ").next().unwrap_or(names);
            Output::info(&format!("Set the missing variables, e.g. export {}='...'", first));
        }
        RadioError::InvalidTopic(_) => {
            Output::info("Try a short title such as \"Photosynthesis\".");
        }
        RadioError::Article(_) => {
            Output::info("Titles are matched exactly; check spelling and capitalization.");
        }
        _ => {}
    }
}

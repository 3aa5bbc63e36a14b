//! CLI output formatting utilities.

use crate::progress::{EventKind, ProgressEvent, ProgressObserver};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Renders pipeline progress as spinners, a per-line bar and status lines.
#[derive(Default)]
pub struct TerminalObserver {
    active: Mutex<Option<ProgressBar>>,
}

impl TerminalObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressObserver for TerminalObserver {
    fn on_event(&self, event: &ProgressEvent) {
        let Ok(mut active) = self.active.lock() else {
            return;
        };

        match &event.kind {
            EventKind::Started => {
                if let Some(pb) = active.take() {
                    pb.finish_and_clear();
                }
                *active = Some(Output::spinner(&event.timestamped()));
            }
            EventKind::Progress { current, total } => {
                let total = *total as u64;
                if active.as_ref().and_then(|pb| pb.length()) != Some(total) {
                    if let Some(pb) = active.take() {
                        pb.finish_and_clear();
                    }
                    *active = Some(Output::progress_bar(total, "lines"));
                }
                if let Some(pb) = active.as_ref() {
                    pb.set_position(*current as u64);
                }
            }
            EventKind::Completed => {
                if let Some(pb) = active.take() {
                    pb.finish_and_clear();
                }
                Output::success(&event.timestamped());
            }
            EventKind::Failed => {
                if let Some(pb) = active.take() {
                    pb.finish_and_clear();
                }
                Output::error(&event.timestamped());
            }
        }
    }
}

/// Format duration in seconds to a human-readable string.
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds.round() as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

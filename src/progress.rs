//! Pipeline progress reporting.
//!
//! The orchestrator never prints. Each entry point injects a
//! [`ProgressObserver`] that decides how stage transitions are presented.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Mutex;
use tracing::{info, warn};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validate,
    ServiceCheck,
    Fetch,
    Segment,
    ScriptBuild,
    CredentialCheck,
    Synthesize,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::ServiceCheck => "service check",
            Stage::Fetch => "fetch",
            Stage::Segment => "segment",
            Stage::ScriptBuild => "script build",
            Stage::CredentialCheck => "credential check",
            Stage::Synthesize => "synthesize",
        };
        write!(f, "{}", name)
    }
}

/// What happened within a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Started,
    /// Unit-level progress inside a stage (e.g. dialogue lines synthesized).
    Progress { current: usize, total: usize },
    Completed,
    Failed,
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    #[serde(flatten)]
    pub kind: EventKind,
    pub message: String,
    pub at: DateTime<Local>,
}

impl ProgressEvent {
    pub fn new(stage: Stage, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
            at: Local::now(),
        }
    }

    pub fn started(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, EventKind::Started, message)
    }

    pub fn completed(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, EventKind::Completed, message)
    }

    pub fn failed(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, EventKind::Failed, message)
    }

    pub fn progress(stage: Stage, current: usize, total: usize, message: impl Into<String>) -> Self {
        Self::new(stage, EventKind::Progress { current, total }, message)
    }

    /// Message prefixed with the wall-clock time, e.g. `[14:03:59] Fetched article`.
    pub fn timestamped(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Receives pipeline progress.
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match event.kind {
            EventKind::Failed => warn!(stage = %event.stage, "{}", event.message),
            _ => info!(stage = %event.stage, "{}", event.message),
        }
    }
}

/// Keeps every event in memory, for API responses and tests.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProgressObserver for CollectingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

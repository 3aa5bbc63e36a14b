//! HTTP API server for integration with other systems.
//!
//! Exposes the generation pipeline over JSON. Runs are serialized because
//! every run writes the same output file.

use crate::audio::SkippedLine;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::RadioError;
use crate::orchestrator::Orchestrator;
use crate::progress::{CollectingObserver, ProgressEvent};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
    run_lock: Mutex<()>,
}

impl AppState {
    fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            run_lock: Mutex::new(()),
        }
    }
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::warning(&format!("{}; generation requests will fail", e));
    }

    let orchestrator = Orchestrator::new(settings)?;
    let app = router(Arc::new(AppState::new(orchestrator)));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Radiohost API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Generate", "POST /generate");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct GenerateRequest {
    topic: String,
}

#[derive(Serialize, Default)]
struct GenerateResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<String>,
    lines_total: usize,
    lines_used: usize,
    skipped: Vec<SkippedLine>,
    events: Vec<ProgressEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let llm = state.orchestrator.llm_available().await;
    Json(serde_json::json!({ "status": "ok", "llm_available": llm }))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    let _guard = state.run_lock.lock().await;
    info!(topic = %req.topic, "Generation requested");

    let observer = CollectingObserver::new();
    let result = state.orchestrator.run(&req.topic, &observer).await;
    let events = observer.events();

    match result {
        Ok(report) => Json(GenerateResponse {
            success: true,
            output_path: Some(report.assembly.output_path.display().to_string()),
            lines_total: report.assembly.lines_total,
            lines_used: report.assembly.lines_used,
            skipped: report.assembly.skipped,
            events,
            error: None,
        })
        .into_response(),
        Err(e) => (
            status_for(&e),
            Json(GenerateResponse {
                success: false,
                events,
                error: Some(e.to_string()),
                ..Default::default()
            }),
        )
            .into_response(),
    }
}

/// HTTP status for a failed run. Setup problems on the server side are 503.
fn status_for(error: &RadioError) -> StatusCode {
    match error {
        RadioError::InvalidTopic(_) => StatusCode::BAD_REQUEST,
        RadioError::Article(_) => StatusCode::NOT_FOUND,
        e if e.is_fatal() => StatusCode::SERVICE_UNAVAILABLE,
        RadioError::Llm(_) | RadioError::Tts(_) | RadioError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Prompts, StaticCredentials};
    use crate::segment::EnglishSentenceSplitter;
    use crate::testing::{credentials, FixedArticle, ScriptedFactory, ScriptedModel};
    use tempfile::TempDir;

    async fn spawn_server(dir: &TempDir) -> String {
        let mut settings = Settings::default();
        settings.general.output_path = dir.path().join("out.wav").to_string_lossy().to_string();

        let orchestrator = Orchestrator::with_components(
            settings,
            Prompts::default(),
            Arc::new(FixedArticle::found(
                "Photosynthesis is a process used by plants. It converts light into energy.",
            )),
            Arc::new(ScriptedModel::new(|s: &str| Ok(format!("{}\n\nBilkul.", s)))),
            Arc::new(EnglishSentenceSplitter::new()),
            Arc::new(StaticCredentials(credentials())),
            Arc::new(ScriptedFactory::tones()),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::new(AppState::new(orchestrator)));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_generate_returns_report_and_events() {
        let dir = TempDir::new().unwrap();
        let base = spawn_server(&dir).await;

        let response = reqwest::Client::new()
            .post(format!("{}/generate", base))
            .json(&serde_json::json!({ "topic": "Photosynthesis" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["lines_total"], 4);
        assert_eq!(body["lines_used"], 4);
        assert!(body["events"].as_array().unwrap().len() > 6);
        assert!(body.get("error").is_none());
        assert!(dir.path().join("out.wav").exists());
    }

    #[tokio::test]
    async fn test_generate_rejects_short_topic() {
        let dir = TempDir::new().unwrap();
        let base = spawn_server(&dir).await;

        let response = reqwest::Client::new()
            .post(format!("{}/generate", base))
            .json(&serde_json::json!({ "topic": "ab" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Invalid topic"));
        assert!(!dir.path().join("out.wav").exists());
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let base = spawn_server(&dir).await;

        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["llm_available"], true);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&RadioError::InvalidTopic("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RadioError::ServiceUnavailable("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&RadioError::MissingCredential("ELEVENLABS_API_KEY".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&RadioError::Tts("quota".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&RadioError::NoAudio("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

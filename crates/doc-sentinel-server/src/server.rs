// crates/doc-sentinel-server/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: Axum surface for uploads, external updates, and live clients.
// Purpose: Expose the pipeline over HTTP and WebSocket transports.
// Dependencies: doc-sentinel-core, doc-sentinel-oracle, axum, tokio
// ============================================================================

//! ## Overview
//! The server exposes three routes: `/check-docs` accepts a multipart batch
//! of text documents, `/external-update` accepts a JSON policy update, and
//! `/ws` upgrades live viewers into the broadcast hub. Request paths return
//! results synchronously; only the watcher pipeline broadcasts. Validation
//! failures map to `400` and oracle failures to `500`, both as
//! `{"error": message}` bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Multipart;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::Message;
use axum::extract::ws::WebSocket;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use doc_sentinel_core::Document;
use doc_sentinel_oracle::HttpOracle;
use futures_util::SinkExt;
use futures_util::StreamExt;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::audit::AuditEvent;
use crate::audit::AuditSink;
use crate::audit::StderrAuditSink;
use crate::config::DocSentinelConfig;
use crate::context::AppContext;
use crate::pipeline::CheckOutcome;
use crate::pipeline::PipelineError;
use crate::pipeline::run_external_update;
use crate::pipeline::run_upload;
use crate::pipeline::run_watch_loop;
use crate::watcher::PolicyWatcher;
use crate::watcher::spawn_change_signals;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Multipart form field carrying uploaded documents.
const FILES_FIELD: &str = "files";

// ============================================================================
// SECTION: Server Errors
// ============================================================================

/// Errors that abort server startup.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration was missing or invalid.
    #[error("config error: {0}")]
    Config(String),
    /// A component failed to initialize.
    #[error("initialization failed: {0}")]
    Init(String),
    /// The listener could not be bound or the server failed.
    #[error("transport failure: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Successful comparison response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    /// Total oracle invocations so far.
    pub usage_count: u64,
    /// Accumulated invocation cost so far.
    pub total_bill: u64,
    /// Names of the analyzed documents, in order.
    pub files_analyzed: Vec<String>,
    /// Plain-text contradiction report.
    pub report: String,
}

impl From<CheckOutcome> for CheckResponse {
    fn from(outcome: CheckOutcome) -> Self {
        Self {
            usage_count: outcome.totals.invocations,
            total_bill: outcome.totals.total_cost,
            files_analyzed: outcome.files_analyzed,
            report: outcome.report.text,
        }
    }
}

/// External policy update request body.
#[derive(Debug, Deserialize)]
pub struct ExternalUpdateRequest {
    /// Updated policy content.
    pub content: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable error message.
    error: String,
}

// ============================================================================
// SECTION: API Errors
// ============================================================================

/// Errors returned to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload was invalid; mapped to `400`.
    #[error("{0}")]
    Validation(String),
    /// The oracle invocation failed; mapped to `500`.
    #[error("{0}")]
    Oracle(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(inner) => Self::Validation(inner.to_string()),
            PipelineError::Oracle(inner) => Self::Oracle(inner.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::Oracle(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (
            status,
            Json(ErrorBody {
                error: message,
            }),
        )
            .into_response()
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the application router over the shared context.
#[must_use]
pub fn build_router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/check-docs", post(handle_check_docs))
        .route("/external-update", post(handle_external_update))
        .route("/ws", get(handle_ws))
        .with_state(context)
}

// ============================================================================
// SECTION: Request Handlers
// ============================================================================

/// Handles a multipart document upload and returns the comparison result.
async fn handle_check_docs(
    State(context): State<Arc<AppContext>>,
    mut multipart: Multipart,
) -> Result<Json<CheckResponse>, ApiError> {
    let mut documents = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("invalid multipart payload".to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let text = field
            .text()
            .await
            .map_err(|_| ApiError::Validation(format!("file '{name}' could not be read")))?;
        documents.push(Document::new(name, text));
    }
    let outcome = run_upload(&context, documents).await?;
    Ok(Json(outcome.into()))
}

/// Handles an external policy update and returns the comparison result.
async fn handle_external_update(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<ExternalUpdateRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    let outcome = run_external_update(&context, request.content).await?;
    Ok(Json(outcome.into()))
}

// ============================================================================
// SECTION: WebSocket Handling
// ============================================================================

/// Upgrades a live viewer connection into the broadcast hub.
async fn handle_ws(State(context): State<Arc<AppContext>>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| client_session(context, socket))
}

/// Forwards hub messages to one client until either side closes.
async fn client_session(context: Arc<AppContext>, socket: WebSocket) {
    let (id, mut messages) = context.hub.register();
    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            message = messages.recv() => {
                let Some(message) = message else { break };
                let Ok(payload) = serde_json::to_string(&message) else { continue };
                if sink.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            frame = stream.next() => {
                // Inbound frames are ignored; the channel is broadcast-only.
                match frame {
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
        }
    }
    context.hub.unregister(id);
}

// ============================================================================
// SECTION: Startup
// ============================================================================

/// Builds the context, starts the watcher tasks, and serves HTTP.
///
/// # Errors
///
/// Returns [`ServerError`] when configuration is invalid, a component fails
/// to initialize, or the listener cannot be bound — the only fatal paths.
pub async fn serve(config: DocSentinelConfig) -> Result<(), ServerError> {
    config.validate().map_err(|err| ServerError::Config(err.to_string()))?;

    let oracle = HttpOracle::new(config.oracle.to_client_config())
        .map_err(|err| ServerError::Init(err.to_string()))?;
    let audit: Arc<dyn AuditSink> = Arc::new(StderrAuditSink);
    let context = Arc::new(AppContext::new(
        config.documents.max_count,
        Arc::new(oracle),
        Arc::clone(&audit),
    ));

    let watcher = PolicyWatcher::bootstrap(config.watcher.path.clone()).await;
    let signals = spawn_change_signals(
        config.watcher.path.clone(),
        Duration::from_millis(config.watcher.poll_interval_ms),
    );
    tokio::spawn(run_watch_loop(Arc::clone(&context), watcher, signals));

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
    audit.record(&AuditEvent::with_detail("server_listening", addr.to_string()));
    axum::serve(listener, build_router(context))
        .await
        .map_err(|_| ServerError::Transport("http server failed".to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

// crates/doc-sentinel-server/src/lib.rs
// ============================================================================
// Module: Doc Sentinel Server
// Description: Configuration, pipeline, watcher, and HTTP surface.
// Purpose: Wire the core components into the live contradiction service.
// Dependencies: doc-sentinel-core, doc-sentinel-oracle, axum, tokio
// ============================================================================

//! ## Overview
//! The server crate hosts everything around the core state: fail-closed
//! configuration, the audit sink, the policy watcher, the update pipeline,
//! and the axum HTTP/WebSocket surface. The binary entry point builds one
//! [`AppContext`] at startup and passes it to every component; nothing is
//! global.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod context;
pub mod pipeline;
pub mod server;
pub mod watcher;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditEvent;
pub use audit::AuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use config::API_KEY_ENV_VAR;
pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::DocSentinelConfig;
pub use context::AppContext;
pub use pipeline::CheckOutcome;
pub use pipeline::EXTERNAL_UPDATE_NAME;
pub use pipeline::LIVE_UPDATE_NAME;
pub use pipeline::PipelineError;
pub use pipeline::run_change_cycle;
pub use pipeline::run_external_update;
pub use pipeline::run_upload;
pub use pipeline::run_watch_loop;
pub use server::ApiError;
pub use server::CheckResponse;
pub use server::ExternalUpdateRequest;
pub use server::ServerError;
pub use server::build_router;
pub use server::serve;
pub use watcher::ChangeEvent;
pub use watcher::ChangeSignal;
pub use watcher::PolicyWatcher;
pub use watcher::ResourceReadError;
pub use watcher::spawn_change_signals;

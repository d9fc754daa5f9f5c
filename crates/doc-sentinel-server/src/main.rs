// crates/doc-sentinel-server/src/main.rs
// ============================================================================
// Module: Doc Sentinel Entry Point
// Description: Binary entry point for the live contradiction service.
// Purpose: Load configuration and run the server until shutdown.
// Dependencies: doc-sentinel-server, tokio
// ============================================================================

//! ## Overview
//! Loads configuration (default path or `DOC_SENTINEL_CONFIG`), then serves
//! until the process is stopped. Startup failures — bad configuration or an
//! unbindable listener — emit a structured audit event and a failure exit
//! code; every runtime error is handled inside the server.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::ExitCode;

use doc_sentinel_server::AuditEvent;
use doc_sentinel_server::AuditSink;
use doc_sentinel_server::DocSentinelConfig;
use doc_sentinel_server::StderrAuditSink;
use doc_sentinel_server::serve;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Runs the Doc Sentinel server.
#[tokio::main]
async fn main() -> ExitCode {
    let audit = StderrAuditSink;
    let config = match DocSentinelConfig::load() {
        Ok(config) => config,
        Err(err) => {
            audit.record(&AuditEvent::with_detail("startup_failed", err.to_string()));
            return ExitCode::FAILURE;
        }
    };
    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            audit.record(&AuditEvent::with_detail("startup_failed", err.to_string()));
            ExitCode::FAILURE
        }
    }
}

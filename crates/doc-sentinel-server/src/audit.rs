// crates/doc-sentinel-server/src/audit.rs
// ============================================================================
// Module: Audit Logging
// Description: Structured audit sink for watcher and pipeline activity.
// Purpose: Record JSON-line events without a hard observability dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module exposes a thin audit interface for pipeline and watcher
//! events. It is intentionally dependency-light so deployments can plug in a
//! richer observability stack without redesign. The stderr sink writes one
//! JSON object per line; sinks never fail the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use serde::Serialize;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Structured audit event emitted by the server.
///
/// # Invariants
/// - `event` labels are stable for log consumers.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Stable event label.
    pub event: &'static str,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEvent {
    /// Builds an event with no detail.
    #[must_use]
    pub const fn new(event: &'static str) -> Self {
        Self {
            event,
            detail: None,
        }
    }

    /// Builds an event with a detail message.
    #[must_use]
    pub fn with_detail(event: &'static str, detail: impl Into<String>) -> Self {
        Self {
            event,
            detail: Some(detail.into()),
        }
    }
}

// ============================================================================
// SECTION: Audit Sinks
// ============================================================================

/// Audit recording interface.
pub trait AuditSink: Send + Sync {
    /// Records an audit event.
    fn record(&self, event: &AuditEvent);
}

/// Audit sink that writes JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &AuditEvent) {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        if serde_json::to_writer(&mut handle, event).is_ok() {
            let _ = handle.write_all(b"\n");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}

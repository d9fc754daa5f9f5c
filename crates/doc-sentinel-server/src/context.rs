// crates/doc-sentinel-server/src/context.rs
// ============================================================================
// Module: Application Context
// Description: Process-scoped state shared by every component.
// Purpose: Replace hidden singletons with one explicitly wired context.
// Dependencies: doc-sentinel-core, doc-sentinel-oracle
// ============================================================================

//! ## Overview
//! [`AppContext`] bundles the process-wide state — document store, usage
//! ledger, broadcast hub, oracle capability, and audit sink — constructed
//! once at startup and passed to every handler and background task. There
//! are no hidden statics; everything is torn down with the process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use doc_sentinel_core::BroadcastHub;
use doc_sentinel_core::DocumentStore;
use doc_sentinel_core::UsageLedger;
use doc_sentinel_oracle::ContradictionOracle;

use crate::audit::AuditSink;

// ============================================================================
// SECTION: Application Context
// ============================================================================

/// Process-scoped state shared by handlers and background tasks.
pub struct AppContext {
    /// Current uploaded document set.
    pub store: DocumentStore,
    /// Oracle invocation counters.
    pub ledger: UsageLedger,
    /// Live client fan-out hub.
    pub hub: BroadcastHub,
    /// External contradiction oracle.
    pub oracle: Arc<dyn ContradictionOracle>,
    /// Audit sink for watcher and pipeline events.
    pub audit: Arc<dyn AuditSink>,
}

impl AppContext {
    /// Builds a fresh context around the given oracle and audit sink.
    #[must_use]
    pub fn new(
        max_documents: usize,
        oracle: Arc<dyn ContradictionOracle>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            store: DocumentStore::new(max_documents),
            ledger: UsageLedger::new(),
            hub: BroadcastHub::new(),
            oracle,
            audit,
        }
    }
}

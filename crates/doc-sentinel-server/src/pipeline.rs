// crates/doc-sentinel-server/src/pipeline.rs
// ============================================================================
// Module: Update Pipeline
// Description: Orchestration of upload, external-update, and watcher flows.
// Purpose: Wire store, oracle, hub, ledger, and audit into one pipeline.
// Dependencies: doc-sentinel-core, doc-sentinel-oracle
// ============================================================================

//! ## Overview
//! The pipeline owns the orchestration the components deliberately do not:
//! request flows validate, invoke the oracle, and meter synchronously for
//! the caller; the watcher flow broadcasts the raw diff unconditionally,
//! then runs a comparison cycle against the stored set plus a synthetic
//! live document. Every flow snapshots the store at the moment it starts
//! comparing, so a concurrent replacement affects only flows that snapshot
//! afterward. The ledger records only after a successful invocation, and a
//! watcher-path oracle failure is audit-logged, never broadcast.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use doc_sentinel_core::Document;
use doc_sentinel_core::HubMessage;
use doc_sentinel_core::LIVE_INVOCATION_COST;
use doc_sentinel_core::LedgerTotals;
use doc_sentinel_core::MIN_COMPARISON_DOCUMENTS;
use doc_sentinel_core::UPLOAD_COST_PER_DOCUMENT;
use doc_sentinel_core::ValidationError;
use doc_sentinel_oracle::OracleError;
use doc_sentinel_oracle::Report;
use thiserror::Error;
use tokio::sync::mpsc::Receiver;

use crate::audit::AuditEvent;
use crate::context::AppContext;
use crate::watcher::ChangeEvent;
use crate::watcher::ChangeSignal;
use crate::watcher::PolicyWatcher;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name given to the synthetic document built from an external update request.
pub const EXTERNAL_UPDATE_NAME: &str = "External Policy Update";

/// Name given to the synthetic document built from a watched-resource change.
pub const LIVE_UPDATE_NAME: &str = "External Policy Update (Live)";

// ============================================================================
// SECTION: Pipeline Errors
// ============================================================================

/// Errors surfaced by the request-path flows.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request payload failed validation; no state was mutated.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The oracle invocation failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of a successful request-path comparison.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Ledger totals after recording this invocation.
    pub totals: LedgerTotals,
    /// Names of the documents in the comparison set, in order.
    pub files_analyzed: Vec<String>,
    /// Contradiction report returned by the oracle.
    pub report: Report,
}

// ============================================================================
// SECTION: Request Flows
// ============================================================================

/// Runs the upload flow: validate, replace the stored set, invoke, meter.
///
/// The stored set is replaced before the invocation, so a failed oracle
/// call still leaves the new set in place for later comparisons.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] for a rejected batch (store
/// unchanged) or [`PipelineError::Oracle`] for a failed invocation (ledger
/// unchanged).
pub async fn run_upload(
    context: &AppContext,
    documents: Vec<Document>,
) -> Result<CheckOutcome, PipelineError> {
    let files_analyzed: Vec<String> =
        documents.iter().map(|document| document.name.clone()).collect();
    context.store.replace(documents.clone())?;
    let report = context.oracle.invoke(&documents).await?;
    let totals = context.ledger.record_invocation(batch_cost(documents.len()));
    Ok(CheckOutcome {
        totals,
        files_analyzed,
        report,
    })
}

/// Runs the external-update flow against the current stored set.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] when the combined set has fewer
/// than two documents (no oracle call is made) or
/// [`PipelineError::Oracle`] for a failed invocation (ledger unchanged).
pub async fn run_external_update(
    context: &AppContext,
    content: String,
) -> Result<CheckOutcome, PipelineError> {
    let mut comparison = context.store.snapshot();
    comparison.push(Document::new(EXTERNAL_UPDATE_NAME, content));
    if comparison.len() < MIN_COMPARISON_DOCUMENTS {
        return Err(ValidationError::InsufficientDocuments {
            count: comparison.len(),
        }
        .into());
    }
    let files_analyzed: Vec<String> =
        comparison.iter().map(|document| document.name.clone()).collect();
    let report = context.oracle.invoke(&comparison).await?;
    let totals = context.ledger.record_invocation(LIVE_INVOCATION_COST);
    Ok(CheckOutcome {
        totals,
        files_analyzed,
        report,
    })
}

// ============================================================================
// SECTION: Watcher Flow
// ============================================================================

/// Runs one change cycle: broadcast the diff, then compare and report.
///
/// The diff broadcast is unconditional, even when the new content equals
/// the old. With fewer than two documents available the oracle is skipped
/// and the skip is audit-logged. An oracle failure is audit-logged only;
/// clients never see failures on this path.
pub async fn run_change_cycle(context: &AppContext, event: ChangeEvent) {
    context.hub.broadcast(&HubMessage::FileChange {
        old_content: event.old_content,
        new_content: event.new_content.clone(),
    });

    let mut comparison = context.store.snapshot();
    comparison.push(Document::new(LIVE_UPDATE_NAME, event.new_content));
    if comparison.len() < MIN_COMPARISON_DOCUMENTS {
        context.audit.record(&AuditEvent::with_detail(
            "watch_comparison_skipped",
            "not enough documents to compare",
        ));
        return;
    }

    match context.oracle.invoke(&comparison).await {
        Ok(report) => {
            context.hub.broadcast(&HubMessage::Report {
                report: report.text,
            });
            context.ledger.record_invocation(LIVE_INVOCATION_COST);
            context.audit.record(&AuditEvent::new("watch_report_broadcast"));
        }
        Err(err) => {
            context.audit.record(&AuditEvent::with_detail("watch_oracle_failed", err.to_string()));
        }
    }
}

/// Consumes raw change signals until the notifier ends.
///
/// Each signal is turned into a read-and-diff by the watcher; a read
/// failure is audit-logged and the next signal is processed independently.
pub async fn run_watch_loop(
    context: Arc<AppContext>,
    mut watcher: PolicyWatcher,
    mut signals: Receiver<ChangeSignal>,
) {
    while signals.recv().await.is_some() {
        context.audit.record(&AuditEvent::with_detail(
            "watch_change_detected",
            watcher.path().display().to_string(),
        ));
        match watcher.read_change().await {
            Ok(event) => run_change_cycle(&context, event).await,
            Err(err) => {
                context.audit.record(&AuditEvent::with_detail("watch_read_failed", err.to_string()));
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Computes the upload invocation cost for a batch of the given size.
fn batch_cost(batch_size: usize) -> u64 {
    UPLOAD_COST_PER_DOCUMENT.saturating_mul(u64::try_from(batch_size).unwrap_or(u64::MAX))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;

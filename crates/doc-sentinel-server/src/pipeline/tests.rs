// crates/doc-sentinel-server/src/pipeline/tests.rs
// ============================================================================
// Module: Update Pipeline Tests
// Description: Unit tests for upload, external-update, and watcher flows.
// Purpose: Verify metering, broadcast ordering, and failure isolation.
// Dependencies: doc-sentinel-server, doc-sentinel-core, doc-sentinel-oracle
// ============================================================================

//! ## Overview
//! Drives the pipeline flows against a scripted oracle and a capturing
//! audit sink: billing arithmetic, all-or-nothing rejection, the
//! no-dedupe diff broadcast, and the rule that watcher-path failures are
//! logged but never broadcast.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use doc_sentinel_core::Document;
use doc_sentinel_core::HubMessage;
use doc_sentinel_core::ValidationError;
use doc_sentinel_oracle::ContradictionOracle;
use doc_sentinel_oracle::OracleError;
use doc_sentinel_oracle::Report;

use super::EXTERNAL_UPDATE_NAME;
use super::LIVE_UPDATE_NAME;
use super::PipelineError;
use super::run_change_cycle;
use super::run_external_update;
use super::run_upload;
use crate::audit::AuditEvent;
use crate::audit::AuditSink;
use crate::context::AppContext;
use crate::watcher::ChangeEvent;

// ============================================================================
// SECTION: Test Doubles
// ============================================================================

/// Oracle double returning a fixed outcome and recording comparison sets.
struct ScriptedOracle {
    /// Outcome returned by every invocation.
    outcome: Result<Report, OracleError>,
    /// Document names seen per invocation.
    seen: Mutex<Vec<Vec<String>>>,
}

impl ScriptedOracle {
    /// Builds an oracle that always succeeds with a fixed report.
    fn succeeding() -> Self {
        Self {
            outcome: Ok(Report::new("Report: conflicts found.")),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Builds an oracle that always fails with a transport error.
    fn failing() -> Self {
        Self {
            outcome: Err(OracleError::Transport("http request failed".to_string())),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of invocations observed.
    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Returns the document names of the given invocation.
    fn seen_names(&self, call: usize) -> Vec<String> {
        self.seen.lock().unwrap()[call].clone()
    }
}

#[async_trait]
impl ContradictionOracle for ScriptedOracle {
    async fn invoke(&self, documents: &[Document]) -> Result<Report, OracleError> {
        let names = documents.iter().map(|document| document.name.clone()).collect();
        self.seen.lock().unwrap().push(names);
        self.outcome.clone()
    }
}

/// Audit sink double capturing event labels.
#[derive(Default)]
struct CapturingAuditSink {
    /// Recorded event labels in order.
    events: Mutex<Vec<&'static str>>,
}

impl CapturingAuditSink {
    /// Returns the recorded event labels.
    fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditSink for CapturingAuditSink {
    fn record(&self, event: &AuditEvent) {
        self.events.lock().unwrap().push(event.event);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a context around the given oracle, returning concrete handles.
fn test_context(oracle: ScriptedOracle) -> (Arc<AppContext>, Arc<ScriptedOracle>, Arc<CapturingAuditSink>) {
    let oracle = Arc::new(oracle);
    let audit = Arc::new(CapturingAuditSink::default());
    let context = Arc::new(AppContext::new(
        3,
        Arc::clone(&oracle) as Arc<dyn ContradictionOracle>,
        Arc::clone(&audit) as Arc<dyn AuditSink>,
    ));
    (context, oracle, audit)
}

/// Builds a well-formed document with the given name.
fn text_document(name: &str) -> Document {
    Document::new(name, "Attendance must be 80%.")
}

/// Builds a change event between two content strings.
fn change(old: &str, new: &str) -> ChangeEvent {
    ChangeEvent {
        old_content: old.to_string(),
        new_content: new.to_string(),
    }
}

// ============================================================================
// SECTION: Upload Flow Tests
// ============================================================================

#[tokio::test]
async fn upload_bills_per_document_and_counts_one_invocation() {
    let (context, oracle, _audit) = test_context(ScriptedOracle::succeeding());
    let batch = vec![text_document("a.txt"), text_document("b.txt"), text_document("c.txt")];

    let outcome = run_upload(&context, batch).await.unwrap();

    assert_eq!(outcome.totals.invocations, 1);
    assert_eq!(outcome.totals.total_cost, 30);
    assert_eq!(outcome.files_analyzed, vec!["a.txt", "b.txt", "c.txt"]);
    assert!(!outcome.report.text.is_empty());
    assert_eq!(oracle.calls(), 1);
    assert_eq!(context.store.len(), 3);
}

#[tokio::test]
async fn rejected_upload_mutates_nothing_and_skips_the_oracle() {
    let (context, oracle, _audit) = test_context(ScriptedOracle::succeeding());
    context.store.replace(vec![text_document("kept.txt")]).unwrap();

    let batch = vec![text_document("a.txt"), text_document("bad.md")];
    let error = run_upload(&context, batch).await.unwrap_err();

    assert!(matches!(
        error,
        PipelineError::Validation(ValidationError::UnsupportedExtension { .. })
    ));
    assert_eq!(oracle.calls(), 0);
    assert_eq!(context.ledger.totals().invocations, 0);
    assert_eq!(context.store.snapshot()[0].name, "kept.txt");
}

#[tokio::test]
async fn later_upload_fully_supersedes_the_earlier_one() {
    let (context, oracle, _audit) = test_context(ScriptedOracle::succeeding());

    run_upload(&context, vec![text_document("first.txt")]).await.unwrap();
    run_upload(&context, vec![text_document("second.txt")]).await.unwrap();

    let update = run_external_update(&context, "update".to_string()).await.unwrap();
    assert_eq!(update.files_analyzed, vec!["second.txt", EXTERNAL_UPDATE_NAME]);
    assert_eq!(oracle.seen_names(2), vec!["second.txt", EXTERNAL_UPDATE_NAME]);
}

#[tokio::test]
async fn failed_upload_invocation_leaves_the_ledger_untouched() {
    let (context, _oracle, _audit) = test_context(ScriptedOracle::failing());

    let error = run_upload(&context, vec![text_document("a.txt")]).await.unwrap_err();

    assert!(matches!(error, PipelineError::Oracle(OracleError::Transport(_))));
    assert_eq!(context.ledger.totals().invocations, 0);
    // The stored set is replaced before the invocation, so it stays replaced.
    assert_eq!(context.store.len(), 1);
}

#[tokio::test]
async fn concurrent_uploads_lose_no_ledger_increments() {
    let (context, _oracle, _audit) = test_context(ScriptedOracle::succeeding());

    let first = run_upload(&context, vec![text_document("first.txt")]);
    let second = run_upload(&context, vec![text_document("second.txt")]);
    let (first, second) = tokio::join!(first, second);
    first.unwrap();
    second.unwrap();

    let totals = context.ledger.totals();
    assert_eq!(totals.invocations, 2);
    assert_eq!(totals.total_cost, 20);
    assert_eq!(context.store.len(), 1);
}

// ============================================================================
// SECTION: External Update Flow Tests
// ============================================================================

#[tokio::test]
async fn external_update_requires_a_stored_document() {
    let (context, oracle, _audit) = test_context(ScriptedOracle::succeeding());

    let error = run_external_update(&context, "update".to_string()).await.unwrap_err();

    assert!(matches!(
        error,
        PipelineError::Validation(ValidationError::InsufficientDocuments { count: 1 })
    ));
    assert_eq!(oracle.calls(), 0);
    assert_eq!(context.ledger.totals().invocations, 0);
}

#[tokio::test]
async fn external_update_bills_a_flat_cost() {
    let (context, oracle, _audit) = test_context(ScriptedOracle::succeeding());
    context.store.replace(vec![text_document("policy.txt")]).unwrap();

    let outcome = run_external_update(&context, "Attendance must be 70%.".to_string())
        .await
        .unwrap();

    assert_eq!(outcome.totals.invocations, 1);
    assert_eq!(outcome.totals.total_cost, 10);
    assert_eq!(outcome.files_analyzed, vec!["policy.txt", EXTERNAL_UPDATE_NAME]);
    assert_eq!(oracle.seen_names(0), vec!["policy.txt", EXTERNAL_UPDATE_NAME]);
}

// ============================================================================
// SECTION: Watcher Flow Tests
// ============================================================================

#[tokio::test]
async fn change_cycle_broadcasts_diff_then_report() {
    let (context, _oracle, _audit) = test_context(ScriptedOracle::succeeding());
    context.store.replace(vec![text_document("policy.txt")]).unwrap();
    let (_id, mut client) = context.hub.register();

    run_change_cycle(&context, change("A", "B")).await;

    assert_eq!(
        client.try_recv().unwrap(),
        HubMessage::FileChange {
            old_content: "A".to_string(),
            new_content: "B".to_string(),
        }
    );
    assert!(matches!(client.try_recv().unwrap(), HubMessage::Report { .. }));
    let totals = context.ledger.totals();
    assert_eq!(totals.invocations, 1);
    assert_eq!(totals.total_cost, 10);
}

#[tokio::test]
async fn change_cycle_compares_against_the_synthetic_live_document() {
    let (context, oracle, _audit) = test_context(ScriptedOracle::succeeding());
    context.store.replace(vec![text_document("policy.txt")]).unwrap();

    run_change_cycle(&context, change("A", "B")).await;

    assert_eq!(oracle.seen_names(0), vec!["policy.txt", LIVE_UPDATE_NAME]);
}

#[tokio::test]
async fn identical_content_is_not_deduplicated() {
    let (context, oracle, _audit) = test_context(ScriptedOracle::succeeding());
    context.store.replace(vec![text_document("policy.txt")]).unwrap();
    let (_id, mut client) = context.hub.register();

    run_change_cycle(&context, change("same", "same")).await;

    assert_eq!(
        client.try_recv().unwrap(),
        HubMessage::FileChange {
            old_content: "same".to_string(),
            new_content: "same".to_string(),
        }
    );
    assert!(matches!(client.try_recv().unwrap(), HubMessage::Report { .. }));
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn change_cycle_without_documents_skips_the_oracle() {
    let (context, oracle, audit) = test_context(ScriptedOracle::succeeding());
    let (_id, mut client) = context.hub.register();

    run_change_cycle(&context, change("A", "B")).await;

    assert!(matches!(client.try_recv().unwrap(), HubMessage::FileChange { .. }));
    assert!(client.try_recv().is_err());
    assert_eq!(oracle.calls(), 0);
    assert_eq!(context.ledger.totals().invocations, 0);
    assert!(audit.events().contains(&"watch_comparison_skipped"));
}

#[tokio::test]
async fn change_cycle_oracle_failure_is_logged_and_never_broadcast() {
    let (context, _oracle, audit) = test_context(ScriptedOracle::failing());
    context.store.replace(vec![text_document("policy.txt")]).unwrap();
    let (_id, mut client) = context.hub.register();

    run_change_cycle(&context, change("A", "B")).await;

    assert!(matches!(client.try_recv().unwrap(), HubMessage::FileChange { .. }));
    assert!(client.try_recv().is_err());
    assert_eq!(context.ledger.totals().invocations, 0);
    assert!(audit.events().contains(&"watch_oracle_failed"));
}

// crates/doc-sentinel-server/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared test doubles for server integration tests.
// Purpose: Provide a scripted oracle and a context builder.
// Dependencies: doc-sentinel-core, doc-sentinel-oracle, doc-sentinel-server
// ============================================================================

//! ## Overview
//! Shared fixtures for the end-to-end pipeline tests: a scripted oracle that
//! records each comparison set and a context builder wiring it behind a
//! silent audit sink.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use doc_sentinel_core::Document;
use doc_sentinel_oracle::ContradictionOracle;
use doc_sentinel_oracle::OracleError;
use doc_sentinel_oracle::Report;
use doc_sentinel_server::AppContext;
use doc_sentinel_server::AuditSink;
use doc_sentinel_server::NoopAuditSink;

// ============================================================================
// SECTION: Scripted Oracle
// ============================================================================

/// Oracle double returning a fixed report and recording comparison sets.
pub struct ScriptedOracle {
    /// Report text returned by every invocation.
    report: String,
    /// Document names seen per invocation.
    seen: Mutex<Vec<Vec<String>>>,
}

impl ScriptedOracle {
    /// Builds an oracle returning the given report text.
    pub fn new(report: &str) -> Self {
        Self {
            report: report.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of invocations observed.
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Returns the document names of the given invocation.
    pub fn seen_names(&self, call: usize) -> Vec<String> {
        self.seen.lock().unwrap()[call].clone()
    }
}

#[async_trait]
impl ContradictionOracle for ScriptedOracle {
    async fn invoke(&self, documents: &[Document]) -> Result<Report, OracleError> {
        let names = documents.iter().map(|document| document.name.clone()).collect();
        self.seen.lock().unwrap().push(names);
        Ok(Report::new(self.report.clone()))
    }
}

// ============================================================================
// SECTION: Context Builder
// ============================================================================

/// Builds an application context around the given oracle.
pub fn context_with_oracle(oracle: &Arc<ScriptedOracle>) -> Arc<AppContext> {
    Arc::new(AppContext::new(
        3,
        Arc::clone(oracle) as Arc<dyn ContradictionOracle>,
        Arc::new(NoopAuditSink) as Arc<dyn AuditSink>,
    ))
}

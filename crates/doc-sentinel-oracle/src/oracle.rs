// crates/doc-sentinel-oracle/src/oracle.rs
// ============================================================================
// Module: Oracle Interface
// Description: Capability interface and error taxonomy for the text oracle.
// Purpose: Keep the orchestration pipeline independent of the network client.
// Dependencies: doc-sentinel-core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! [`ContradictionOracle`] is the capability seam for the external
//! contradiction-analysis service. The pipeline invokes it with an ordered
//! comparison set and receives an opaque plain-text [`Report`]. Implementors
//! must surface every failure mode — transport, non-success status,
//! malformed payload — as an [`OracleError`] and never panic across the
//! boundary. A hardened deployment can wrap an implementation with retry or
//! circuit-breaking without touching the pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use doc_sentinel_core::Document;
use thiserror::Error;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Opaque plain-text contradiction report returned by the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Report body; not parsed or validated beyond transport.
    pub text: String,
}

impl Report {
    /// Creates a report from its body text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
        }
    }
}

// ============================================================================
// SECTION: Oracle Errors
// ============================================================================

/// Errors surfaced by oracle invocations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The HTTP client could not be constructed.
    #[error("oracle client build failed: {0}")]
    ClientBuild(String),
    /// The configured endpoint is not a valid URL.
    #[error("invalid oracle endpoint: {0}")]
    InvalidEndpoint(String),
    /// The request could not be completed (connect, timeout, transport).
    #[error("oracle request failed: {0}")]
    Transport(String),
    /// The oracle answered with a non-success status.
    #[error("oracle returned status {status}")]
    Status {
        /// HTTP status code of the failed response.
        status: u16,
    },
    /// The response body did not carry a report in the expected shape.
    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}

// ============================================================================
// SECTION: Oracle Trait
// ============================================================================

/// External contradiction-analysis capability.
///
/// Each call is a single best-effort invocation: no retry, no caching, no
/// rate limiting at this seam.
#[async_trait]
pub trait ContradictionOracle: Send + Sync {
    /// Analyzes the ordered comparison set and returns the report.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] when the invocation fails for any reason.
    async fn invoke(&self, documents: &[Document]) -> Result<Report, OracleError>;
}

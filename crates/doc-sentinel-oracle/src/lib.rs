// crates/doc-sentinel-oracle/src/lib.rs
// ============================================================================
// Module: Doc Sentinel Oracle
// Description: External contradiction-oracle boundary for Doc Sentinel.
// Purpose: Provide the oracle capability interface and its HTTP client.
// Dependencies: doc-sentinel-core, reqwest, async-trait
// ============================================================================

//! ## Overview
//! This crate is the only place Doc Sentinel touches the network. The
//! [`ContradictionOracle`] trait is the capability seam the pipeline depends
//! on; [`HttpOracle`] implements it against a generative-language
//! `generateContent` endpoint with a bounded timeout and no retries.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;
pub mod oracle;
pub mod prompt;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::DEFAULT_ENDPOINT;
pub use http::DEFAULT_MODEL;
pub use http::DEFAULT_TIMEOUT_MS;
pub use http::HttpOracle;
pub use http::HttpOracleConfig;
pub use oracle::ContradictionOracle;
pub use oracle::OracleError;
pub use oracle::Report;
pub use prompt::render_comparison_prompt;

// crates/doc-sentinel-core/src/lib.rs
// ============================================================================
// Module: Doc Sentinel Core
// Description: Domain types and process-wide state for Doc Sentinel.
// Purpose: Provide the document store, usage ledger, and broadcast hub.
// Dependencies: serde, thiserror, tokio
// ============================================================================

//! ## Overview
//! Core state for the Doc Sentinel live contradiction service: validated
//! [`Document`] sets held by the [`DocumentStore`], invocation metering in
//! the [`UsageLedger`], and live-client fan-out through the
//! [`BroadcastHub`]. Everything here is in-memory and scoped to the process;
//! nothing persists across restarts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod document;
pub mod hub;
pub mod ledger;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use document::DEFAULT_MAX_DOCUMENTS;
pub use document::Document;
pub use document::MIN_COMPARISON_DOCUMENTS;
pub use document::TEXT_EXTENSION;
pub use document::ValidationError;
pub use document::validate_batch;
pub use hub::BroadcastHub;
pub use hub::CLIENT_CHANNEL_CAPACITY;
pub use hub::ClientId;
pub use hub::HubMessage;
pub use ledger::LIVE_INVOCATION_COST;
pub use ledger::LedgerTotals;
pub use ledger::UPLOAD_COST_PER_DOCUMENT;
pub use ledger::UsageLedger;
pub use store::DocumentStore;

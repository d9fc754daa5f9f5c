// crates/doc-sentinel-core/src/ledger.rs
// ============================================================================
// Module: Usage Ledger
// Description: Process-lifetime counters for oracle invocations and cost.
// Purpose: Meter every successful oracle call without lost increments.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`UsageLedger`] tracks how many oracle invocations the process has made
//! and their accumulated cost. Both counters are monotonically non-decreasing
//! for the life of the process; there is no reset and no persistence.
//! Recording is synchronous and never suspends, so concurrent asynchronous
//! flows cannot interleave inside an increment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::PoisonError;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Cost charged per document in an upload-triggered invocation.
pub const UPLOAD_COST_PER_DOCUMENT: u64 = 10;

/// Flat cost charged for a change-triggered or external-update invocation.
pub const LIVE_INVOCATION_COST: u64 = 10;

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Ledger totals after an invocation is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    /// Number of oracle invocations recorded so far.
    pub invocations: u64,
    /// Accumulated invocation cost.
    pub total_cost: u64,
}

/// Process-lifetime usage and cost counters.
///
/// # Invariants
/// - Totals never decrease.
/// - Concurrent recorders never lose an increment; both counters move under
///   one lock.
#[derive(Debug, Default)]
pub struct UsageLedger {
    /// Current totals, guarded by a single lock.
    totals: Mutex<LedgerTotals>,
}

impl UsageLedger {
    /// Creates a ledger with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one invocation at the given cost and returns the new totals.
    pub fn record_invocation(&self, cost: u64) -> LedgerTotals {
        let mut guard = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        guard.invocations = guard.invocations.saturating_add(1);
        guard.total_cost = guard.total_cost.saturating_add(cost);
        *guard
    }

    /// Returns the current totals without recording anything.
    #[must_use]
    pub fn totals(&self) -> LedgerTotals {
        *self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

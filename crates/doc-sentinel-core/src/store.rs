// crates/doc-sentinel-core/src/store.rs
// ============================================================================
// Module: Document Store
// Description: In-memory store for the current uploaded document set.
// Purpose: Provide atomic whole-set replacement and by-value snapshots.
// Dependencies: crate::document
// ============================================================================

//! ## Overview
//! [`DocumentStore`] owns the current [`Document`] set for the life of the
//! process. Uploads replace the whole set atomically after validation, and
//! readers take by-value snapshots so an in-flight comparison is unaffected
//! by a later replacement. Both operations are synchronous and never suspend,
//! which keeps them atomic with respect to interleaved asynchronous flows.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::PoisonError;

use crate::document::Document;
use crate::document::ValidationError;
use crate::document::validate_batch;

// ============================================================================
// SECTION: Document Store
// ============================================================================

/// In-memory store holding the current uploaded document set.
///
/// # Invariants
/// - The stored set always satisfies [`validate_batch`] for the configured
///   maximum, or is empty (process start state).
/// - `replace` is all-or-nothing: a rejected batch leaves the prior set
///   untouched.
#[derive(Debug)]
pub struct DocumentStore {
    /// Current document set, replaced wholesale on each successful upload.
    documents: Mutex<Vec<Document>>,
    /// Maximum number of documents accepted in one batch.
    max_documents: usize,
}

impl DocumentStore {
    /// Creates an empty store accepting batches up to `max_documents`.
    #[must_use]
    pub fn new(max_documents: usize) -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            max_documents,
        }
    }

    /// Returns the configured maximum batch size.
    #[must_use]
    pub const fn max_documents(&self) -> usize {
        self.max_documents
    }

    /// Validates a batch and atomically replaces the stored set with it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when any entry is invalid; the stored set
    /// is left unchanged in that case.
    pub fn replace(&self, documents: Vec<Document>) -> Result<(), ValidationError> {
        validate_batch(&documents, self.max_documents)?;
        let mut guard = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = documents;
        Ok(())
    }

    /// Returns the current document set by value.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Document> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the number of documents currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

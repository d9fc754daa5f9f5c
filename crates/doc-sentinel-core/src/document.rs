// crates/doc-sentinel-core/src/document.rs
// ============================================================================
// Module: Documents and Batch Validation
// Description: Document value type and all-or-nothing batch validation.
// Purpose: Keep only well-formed plain-text documents in the comparison set.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Document`] is a named plain-text payload submitted for contradiction
//! analysis. Batches are validated as a unit: the first invalid entry rejects
//! the whole batch and no partial state is ever stored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum number of documents held in a stored set.
pub const DEFAULT_MAX_DOCUMENTS: usize = 3;

/// File extension accepted for uploaded documents (compared case-insensitively).
pub const TEXT_EXTENSION: &str = "txt";

/// Minimum number of documents required for a comparison invocation.
pub const MIN_COMPARISON_DOCUMENTS: usize = 2;

// ============================================================================
// SECTION: Document
// ============================================================================

/// Named plain-text document.
///
/// # Invariants
/// - `name` and `text` are non-empty once the document passes validation.
/// - Documents are immutable after storage; updates replace the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document name as supplied by the uploader.
    pub name: String,
    /// Full document text.
    pub text: String,
}

impl Document {
    /// Creates a document from a name and text.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Errors produced by document batch validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The batch contained no documents.
    #[error("no files uploaded")]
    EmptyBatch,
    /// The batch exceeded the configured maximum document count.
    #[error("too many documents: {count} (max {max})")]
    TooManyDocuments {
        /// Number of documents in the rejected batch.
        count: usize,
        /// Configured maximum document count.
        max: usize,
    },
    /// A document name did not carry the accepted plain-text extension.
    #[error("unsupported file type for '{name}': please upload a .txt file")]
    UnsupportedExtension {
        /// Name of the rejected document.
        name: String,
    },
    /// A document body was empty or whitespace-only.
    #[error("file '{name}' is empty")]
    EmptyDocument {
        /// Name of the rejected document.
        name: String,
    },
    /// A comparison was requested with fewer than two documents.
    #[error("need at least one uploaded document to compare against the update")]
    InsufficientDocuments {
        /// Number of documents available for the comparison.
        count: usize,
    },
}

// ============================================================================
// SECTION: Batch Validation
// ============================================================================

/// Validates an upload batch as a unit.
///
/// The first invalid entry rejects the whole batch, so callers can treat a
/// success as permission to store every entry.
///
/// # Errors
///
/// Returns [`ValidationError`] for an empty batch, a batch over `max`
/// documents, an entry without the `.txt` extension, or an entry with
/// empty or whitespace-only text.
pub fn validate_batch(documents: &[Document], max: usize) -> Result<(), ValidationError> {
    if documents.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if documents.len() > max {
        return Err(ValidationError::TooManyDocuments {
            count: documents.len(),
            max,
        });
    }
    for document in documents {
        if !has_text_extension(&document.name) {
            return Err(ValidationError::UnsupportedExtension {
                name: document.name.clone(),
            });
        }
        if document.text.trim().is_empty() {
            return Err(ValidationError::EmptyDocument {
                name: document.name.clone(),
            });
        }
    }
    Ok(())
}

/// Returns true when the document name carries the accepted extension.
fn has_text_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(TEXT_EXTENSION))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;

// crates/doc-sentinel-core/src/document/tests.rs
// ============================================================================
// Module: Document Validation Tests
// Description: Unit tests for batch validation rules.
// Purpose: Verify all-or-nothing rejection and extension/content checks.
// Dependencies: doc-sentinel-core
// ============================================================================

//! ## Overview
//! Validates that upload batches are accepted or rejected as a unit and that
//! the extension check compares case-insensitively against `.txt`.

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

use super::DEFAULT_MAX_DOCUMENTS;
use super::Document;
use super::ValidationError;
use super::validate_batch;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a well-formed document with the given name.
fn text_document(name: &str) -> Document {
    Document::new(name, "Attendance must be 80%.")
}

// ============================================================================
// SECTION: Acceptance Tests
// ============================================================================

#[test]
fn accepts_batches_up_to_the_maximum() {
    for size in 1..=DEFAULT_MAX_DOCUMENTS {
        let batch: Vec<Document> =
            (0..size).map(|index| text_document(&format!("doc-{index}.txt"))).collect();
        assert!(validate_batch(&batch, DEFAULT_MAX_DOCUMENTS).is_ok());
    }
}

#[test]
fn accepts_uppercase_extension() {
    let batch = vec![text_document("POLICY.TXT")];
    assert!(validate_batch(&batch, DEFAULT_MAX_DOCUMENTS).is_ok());
}

// ============================================================================
// SECTION: Rejection Tests
// ============================================================================

#[test]
fn rejects_empty_batch() {
    let error = validate_batch(&[], DEFAULT_MAX_DOCUMENTS).unwrap_err();
    assert_eq!(error, ValidationError::EmptyBatch);
}

#[test]
fn rejects_batch_over_the_maximum() {
    let batch: Vec<Document> =
        (0..4).map(|index| text_document(&format!("doc-{index}.txt"))).collect();
    let error = validate_batch(&batch, DEFAULT_MAX_DOCUMENTS).unwrap_err();
    assert_eq!(
        error,
        ValidationError::TooManyDocuments {
            count: 4,
            max: DEFAULT_MAX_DOCUMENTS,
        }
    );
}

#[test]
fn rejects_unsupported_extension() {
    let batch = vec![text_document("policy.txt"), text_document("notes.md")];
    let error = validate_batch(&batch, DEFAULT_MAX_DOCUMENTS).unwrap_err();
    assert_eq!(
        error,
        ValidationError::UnsupportedExtension {
            name: "notes.md".to_string(),
        }
    );
}

#[test]
fn rejects_name_without_extension() {
    let batch = vec![text_document("policy")];
    assert!(matches!(
        validate_batch(&batch, DEFAULT_MAX_DOCUMENTS),
        Err(ValidationError::UnsupportedExtension { .. })
    ));
}

#[test]
fn rejects_empty_document_text() {
    let batch = vec![Document::new("policy.txt", "")];
    let error = validate_batch(&batch, DEFAULT_MAX_DOCUMENTS).unwrap_err();
    assert_eq!(
        error,
        ValidationError::EmptyDocument {
            name: "policy.txt".to_string(),
        }
    );
}

#[test]
fn rejects_whitespace_only_document_text() {
    let batch = vec![Document::new("policy.txt", " \n\t ")];
    assert!(matches!(
        validate_batch(&batch, DEFAULT_MAX_DOCUMENTS),
        Err(ValidationError::EmptyDocument { .. })
    ));
}

#[test]
fn first_invalid_entry_rejects_the_whole_batch() {
    let batch = vec![text_document("a.txt"), Document::new("b.txt", ""), text_document("c.md")];
    let error = validate_batch(&batch, DEFAULT_MAX_DOCUMENTS).unwrap_err();
    assert_eq!(
        error,
        ValidationError::EmptyDocument {
            name: "b.txt".to_string(),
        }
    );
}

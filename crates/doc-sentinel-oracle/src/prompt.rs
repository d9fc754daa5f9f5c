// crates/doc-sentinel-oracle/src/prompt.rs
// ============================================================================
// Module: Comparison Prompt
// Description: Prompt rendering for contradiction analysis requests.
// Purpose: Format the named comparison set for the text oracle.
// Dependencies: doc-sentinel-core
// ============================================================================

//! ## Overview
//! Renders the instruction prompt sent with every oracle invocation. The
//! comparison set is formatted as `name: text` lines in order, so the oracle
//! can attribute conflicts to document names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use doc_sentinel_core::Document;

// ============================================================================
// SECTION: Prompt Rendering
// ============================================================================

/// Instruction header for comparison requests.
const PROMPT_HEADER: &str = "You are a Smart Document Checker.\n\
Compare these documents and find contradictions.\n\
Return a detailed plain-text report including:\n\
- Document names\n\
- Conflicts found\n\
- Explanation\n\
- Suggested clarification\n\
Documents:\n";

/// Renders the comparison prompt for an ordered document set.
#[must_use]
pub fn render_comparison_prompt(documents: &[Document]) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    for document in documents {
        let _ = writeln!(prompt, "{}: {}", document.name, document.text);
    }
    prompt
}

// ============================================================================
// SECTION: Tests
// ============================================================================

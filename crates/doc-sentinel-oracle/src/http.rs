// crates/doc-sentinel-oracle/src/http.rs
// ============================================================================
// Module: HTTP Oracle Client
// Description: Oracle implementation speaking the generative-language API.
// Purpose: Provide the sole network boundary with a bounded timeout.
// Dependencies: doc-sentinel-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`HttpOracle`] posts the comparison prompt to a generative-language
//! `generateContent` endpoint and reads the first candidate's text as the
//! report. Requests carry a bounded timeout and follow no redirects. Every
//! failure surfaces as an [`OracleError`] with a static message; error text
//! never includes the request URL, which carries the API credential.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use doc_sentinel_core::Document;
use reqwest::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::oracle::ContradictionOracle;
use crate::oracle::OracleError;
use crate::oracle::Report;
use crate::prompt::render_comparison_prompt;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default generative-language API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model invoked for contradiction analysis.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration for the HTTP oracle client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpOracleConfig {
    /// API credential appended to each request.
    pub api_key: String,
    /// Service endpoint base URL.
    pub endpoint: String,
    /// Model name invoked for analysis.
    pub model: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HttpOracleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Request payload for `generateContent`.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    /// Prompt contents.
    contents: Vec<RequestContent>,
}

/// One content entry in the request payload.
#[derive(Debug, Serialize)]
struct RequestContent {
    /// Content parts.
    parts: Vec<RequestPart>,
}

/// One text part in the request payload.
#[derive(Debug, Serialize)]
struct RequestPart {
    /// Prompt text.
    text: String,
}

/// Response payload for `generateContent`.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    /// Candidate completions, first is authoritative.
    candidates: Vec<Candidate>,
}

/// One candidate completion.
#[derive(Debug, Deserialize)]
struct Candidate {
    /// Candidate content.
    content: CandidateContent,
}

/// Content of a candidate completion.
#[derive(Debug, Deserialize)]
struct CandidateContent {
    /// Content parts, first carries the report text.
    parts: Vec<CandidatePart>,
}

/// One text part of a candidate completion.
#[derive(Debug, Deserialize)]
struct CandidatePart {
    /// Report text.
    text: String,
}

// ============================================================================
// SECTION: HTTP Oracle
// ============================================================================

/// Oracle client for a generative-language `generateContent` endpoint.
#[derive(Debug)]
pub struct HttpOracle {
    /// Client configuration, including the credential and timeout.
    config: HttpOracleConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpOracle {
    /// Creates a new HTTP oracle with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] when the endpoint is invalid or the HTTP
    /// client cannot be created.
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        Url::parse(&config.endpoint)
            .map_err(|err| OracleError::InvalidEndpoint(err.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(Policy::none())
            .build()
            .map_err(|_| OracleError::ClientBuild("http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Builds the request URL for the configured model and credential.
    fn request_url(&self) -> Result<Url, OracleError> {
        let base = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let mut url =
            Url::parse(&base).map_err(|err| OracleError::InvalidEndpoint(err.to_string()))?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }
}

#[async_trait]
impl ContradictionOracle for HttpOracle {
    async fn invoke(&self, documents: &[Document]) -> Result<Report, OracleError> {
        let url = self.request_url()?;
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: render_comparison_prompt(documents),
                }],
            }],
        };
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|_| OracleError::Transport("http request failed".to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
            });
        }
        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|_| OracleError::MalformedResponse("json decode failed".to_string()))?;
        extract_report_text(payload)
            .map(Report::new)
            .ok_or_else(|| OracleError::MalformedResponse("response carried no report".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts the report text from the first candidate, when present.
fn extract_report_text(payload: GenerateContentResponse) -> Option<String> {
    payload
        .candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .next()
        .map(|part| part.text)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

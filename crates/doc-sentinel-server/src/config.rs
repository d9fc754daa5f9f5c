// crates/doc-sentinel-server/src/config.rs
// ============================================================================
// Module: Doc Sentinel Configuration
// Description: Configuration loading and validation for the server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: doc-sentinel-core, doc-sentinel-oracle, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a strict size limit; a
//! missing file falls back to defaults so local runs need only the API
//! credential. Invalid configuration fails closed before the server starts.
//! The oracle credential may be supplied through the environment when the
//! file omits it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use doc_sentinel_core::DEFAULT_MAX_DOCUMENTS;
use doc_sentinel_oracle::DEFAULT_ENDPOINT;
use doc_sentinel_oracle::DEFAULT_MODEL;
use doc_sentinel_oracle::DEFAULT_TIMEOUT_MS;
use doc_sentinel_oracle::HttpOracleConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "doc-sentinel.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DOC_SENTINEL_CONFIG";
/// Environment variable supplying the oracle credential as a fallback.
pub const API_KEY_ENV_VAR: &str = "DOC_SENTINEL_API_KEY";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;
/// Default server bind address.
const DEFAULT_BIND: &str = "127.0.0.1:4000";
/// Default watched resource path.
const DEFAULT_WATCHED_PATH: &str = "external_policy.txt";
/// Default watcher poll interval in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
/// Minimum allowed watcher poll interval in milliseconds.
pub(crate) const MIN_POLL_INTERVAL_MS: u64 = 50;
/// Maximum allowed watcher poll interval in milliseconds.
pub(crate) const MAX_POLL_INTERVAL_MS: u64 = 60_000;
/// Minimum allowed oracle request timeout in milliseconds.
pub(crate) const MIN_ORACLE_TIMEOUT_MS: u64 = 500;
/// Maximum allowed oracle request timeout in milliseconds.
pub(crate) const MAX_ORACLE_TIMEOUT_MS: u64 = 60_000;
/// Maximum allowed stored document count.
pub(crate) const MAX_DOCUMENT_COUNT: usize = 16;

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("config read failed: {0}")]
    Io(String),
    /// The config file exceeded the size limit.
    #[error("config file exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        actual_bytes: u64,
    },
    /// The config file failed to parse as TOML.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// A config value failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Doc Sentinel server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocSentinelConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Oracle client configuration.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Watched resource configuration.
    #[serde(default)]
    pub watcher: WatcherConfig,
    /// Document policy configuration.
    #[serde(default)]
    pub documents: DocumentsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Oracle client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// API credential; required for oracle calls. May be supplied through
    /// [`API_KEY_ENV_VAR`] when omitted here.
    #[serde(default)]
    pub api_key: String,
    /// Service endpoint base URL.
    pub endpoint: String,
    /// Model name invoked for analysis.
    pub model: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl OracleConfig {
    /// Converts this section into the HTTP oracle client configuration.
    #[must_use]
    pub fn to_client_config(&self) -> HttpOracleConfig {
        HttpOracleConfig {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Watched resource configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherConfig {
    /// Path of the monitored policy resource.
    pub path: PathBuf,
    /// Poll interval for change detection in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_WATCHED_PATH),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Document policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    /// Maximum number of documents accepted in one upload batch.
    pub max_count: usize,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_DOCUMENTS,
        }
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl DocSentinelConfig {
    /// Loads configuration from the default or env-overridden path.
    ///
    /// A missing file yields the default configuration. The oracle
    /// credential falls back to [`API_KEY_ENV_VAR`] when the file omits it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, oversized, or
    /// fails to parse.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_ENV_VAR)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from);
        let mut config = match fs::metadata(&path) {
            Ok(_) => Self::load_from_path(&path)?,
            Err(err) if err.kind() == ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(ConfigError::Io(err.to_string())),
        };
        config.oracle.api_key =
            resolve_api_key(config.oracle.api_key, env::var(API_KEY_ENV_VAR).ok());
        Ok(config)
    }

    /// Loads configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, oversized, or
    /// fails to parse.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                max_bytes: MAX_CONFIG_FILE_SIZE,
                actual_bytes: metadata.len(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the configuration, failing closed on any bad value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("server.bind must be a socket address".to_string()))?;
        if self.oracle.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("oracle.api_key is required".to_string()));
        }
        let endpoint = Url::parse(&self.oracle.endpoint)
            .map_err(|_| ConfigError::Invalid("oracle.endpoint must be a url".to_string()))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(ConfigError::Invalid(
                "oracle.endpoint must use http or https".to_string(),
            ));
        }
        if self.oracle.model.trim().is_empty() {
            return Err(ConfigError::Invalid("oracle.model is required".to_string()));
        }
        if self.oracle.timeout_ms < MIN_ORACLE_TIMEOUT_MS
            || self.oracle.timeout_ms > MAX_ORACLE_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "oracle.timeout_ms must be between {MIN_ORACLE_TIMEOUT_MS} and {MAX_ORACLE_TIMEOUT_MS}"
            )));
        }
        if self.watcher.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("watcher.path is required".to_string()));
        }
        if self.watcher.poll_interval_ms < MIN_POLL_INTERVAL_MS
            || self.watcher.poll_interval_ms > MAX_POLL_INTERVAL_MS
        {
            return Err(ConfigError::Invalid(format!(
                "watcher.poll_interval_ms must be between {MIN_POLL_INTERVAL_MS} and {MAX_POLL_INTERVAL_MS}"
            )));
        }
        if self.documents.max_count == 0 || self.documents.max_count > MAX_DOCUMENT_COUNT {
            return Err(ConfigError::Invalid(format!(
                "documents.max_count must be between 1 and {MAX_DOCUMENT_COUNT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the oracle credential, preferring the config file value.
fn resolve_api_key(file_value: String, env_value: Option<String>) -> String {
    if file_value.trim().is_empty() {
        env_value.unwrap_or(file_value)
    } else {
        file_value
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

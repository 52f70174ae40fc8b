//! Error types for sockrecord.
//!
//! One error hierarchy built with `thiserror`. Every failure is returned to
//! the immediate caller; nothing in the cache retries on its own.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias using `SockRecordError`.
pub type Result<T> = std::result::Result<T, SockRecordError>;

/// Main error type for all sockrecord operations.
#[derive(Debug, Error)]
pub enum SockRecordError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The endpoint list could not be read.
    #[error("Cannot read endpoint list {}: {source}", path.display())]
    ConfigRead {
        /// Location of the endpoint list
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The endpoint list could not be parsed as a JSON array of strings.
    #[error("Malformed endpoint list: {0}")]
    ConfigFormat(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REQUEST ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Runtime and image endpoints were requested with different addresses.
    #[error("Endpoints differ: runtime '{runtime}' vs image '{image}'")]
    EndpointMismatch {
        /// Requested runtime endpoint
        runtime: String,
        /// Requested image endpoint
        image: String,
    },

    /// A cached entry exists but expires before the caller's freshness horizon.
    #[error("Cached handles for '{endpoint}' expire at {deadline}, before required {expect_by}")]
    StaleEntry {
        /// Endpoint whose entry was rejected
        endpoint: String,
        /// Instant the entry stops being trusted
        deadline: DateTime<Utc>,
        /// Instant the caller needs the handles to remain trusted
        expect_by: DateTime<Utc>,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The transport could not establish a handle.
    #[error("Failed to connect to '{endpoint}': {reason}")]
    Connection {
        /// Endpoint that was dialed
        endpoint: String,
        /// Transport-provided reason
        reason: String,
    },

    /// The transport gave up waiting for the endpoint.
    #[error("Connection to '{endpoint}' timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Endpoint that was dialed
        endpoint: String,
        /// Dial timeout in milliseconds
        timeout_ms: u64,
    },

    /// The endpoint address uses an unsupported scheme or is empty.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SockRecordError {
    /// Returns true if the caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SockRecordError::Connection { .. } | SockRecordError::ConnectionTimeout { .. }
        )
    }

    /// Returns true if this error came from reading the endpoint list.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SockRecordError::ConfigRead { .. } | SockRecordError::ConfigFormat(_)
        )
    }

    /// Returns true if this error came from writing a snapshot.
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, SockRecordError::Serialization(_) | SockRecordError::Io(_))
    }

    /// Returns true if the request was rejected because cached handles are too old.
    pub fn is_stale(&self) -> bool {
        matches!(self, SockRecordError::StaleEntry { .. })
    }
}

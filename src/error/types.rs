//! Error type definitions
//!
//! Defines the main error types used throughout the upload client, plus the
//! failure classification that drives the orchestrator's retry decision.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the upload client
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid caller-supplied input (bad file size, missing metadata, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The video file does not exist or is not a regular file
    #[error("File not found: {path}")]
    NotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// The video file is empty
    #[error("File is empty: {path}")]
    EmptyFile {
        /// Path of the empty file
        path: PathBuf,
    },

    /// The server rejected the request with a non-credential error code
    #[error("Server rejected request: {code} - {message}")]
    ServerRejected {
        /// Server-supplied error code
        code: String,
        /// Server-supplied error message
        message: String,
    },

    /// The access token was rejected; recoverable via a refresh-token exchange
    #[error("Access token expired or invalid: {code} - {message}")]
    AuthExpired {
        /// Server-supplied error code
        code: String,
        /// Server-supplied error message
        message: String,
    },

    /// Credential refresh was attempted and failed, or was not possible.
    /// The user must re-authenticate out of band.
    #[error("Credentials expired: {reason}")]
    CredentialsExpired {
        /// Why the refresh could not produce usable credentials
        reason: String,
    },

    /// The server reported success but the response is missing required fields
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP client errors (timeouts included)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of an HTTP-level failure, used for retry decisions.
///
/// Only [`FailureKind::AuthExpired`] is ever recovered from, and only at the
/// session-initiation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The bearer token was rejected; a refresh may fix it
    AuthExpired,
    /// The server refused the request for a non-credential reason
    ServerRejected,
    /// Transport-level failure: timeout, connection error, malformed response
    NetworkError,
}

/// Error-code fragments the API uses for credential problems.
const AUTH_CODE_MARKERS: [&str; 3] = ["token", "invalid", "expired"];

impl Error {
    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new file-not-found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a new empty-file error
    pub fn empty_file(path: impl Into<PathBuf>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    /// Create a new server rejection error
    pub fn server_rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ServerRejected {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a new credentials-expired error
    pub fn credentials_expired(reason: impl Into<String>) -> Self {
        Self::CredentialsExpired {
            reason: reason.into(),
        }
    }

    /// Create a new protocol violation error
    pub fn protocol_violation(msg: impl Into<String>) -> Self {
        Self::ProtocolViolation(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classify a non-ok API error code into [`Error::AuthExpired`] or
    /// [`Error::ServerRejected`].
    ///
    /// Any code containing "token", "invalid" or "expired" (case-insensitive)
    /// is treated as a credential problem; everything else is a plain
    /// rejection.
    pub fn from_api_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let lowered = code.to_ascii_lowercase();
        if AUTH_CODE_MARKERS.iter().any(|m| lowered.contains(m)) {
            Self::AuthExpired {
                code,
                message: message.into(),
            }
        } else {
            Self::ServerRejected {
                code,
                message: message.into(),
            }
        }
    }

    /// HTTP-level failure classification, if this error stems from a request.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::AuthExpired { .. } => Some(FailureKind::AuthExpired),
            Self::ServerRejected { .. } | Self::ProtocolViolation(_) => {
                Some(FailureKind::ServerRejected)
            }
            Self::Network(_) | Self::Json(_) => Some(FailureKind::NetworkError),
            _ => None,
        }
    }

    /// Whether this failure is recoverable via a credential refresh
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }

    /// Annotate a transfer error with the chunk it happened on.
    ///
    /// Only message-carrying variants are rewritten; transport errors keep
    /// their source intact and are annotated at the log site instead.
    pub(crate) fn with_chunk_context(self, index: u64, start: u64, end: u64) -> Self {
        let context = format!("chunk {index} (bytes {start}-{end})");
        match self {
            Self::ServerRejected { code, message } => Self::ServerRejected {
                code,
                message: format!("{context}: {message}"),
            },
            Self::AuthExpired { code, message } => Self::AuthExpired {
                code,
                message: format!("{context}: {message}"),
            },
            Self::ProtocolViolation(msg) => Self::ProtocolViolation(format!("{context}: {msg}")),
            other => other,
        }
    }
}

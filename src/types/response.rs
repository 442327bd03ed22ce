//! Response type definitions
//!
//! Defines the structures returned by the session-initiation endpoints and
//! the OAuth token endpoint.

use serde::{Deserialize, Serialize};

/// Response envelope from a session-initiation endpoint
///
/// The API reports failures in-band: HTTP 200 with a non-`"ok"` error code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitResponse {
    /// Payload, present on success
    #[serde(default)]
    pub data: Option<InitData>,

    /// Status block; `code == "ok"` means success
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Payload of a successful initiation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitData {
    /// Opaque publish identifier, used for later status queries
    #[serde(default)]
    pub publish_id: Option<String>,

    /// Session-scoped destination URL for chunk PUTs
    #[serde(default)]
    pub upload_url: Option<String>,
}

/// Status block embedded in every API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable status code; `"ok"` on success
    pub code: String,

    /// Human-readable message
    #[serde(default)]
    pub message: String,

    /// Request correlation id for support purposes
    #[serde(default)]
    pub log_id: Option<String>,
}

impl InitResponse {
    /// Whether the embedded status block reports success
    pub fn is_ok(&self) -> bool {
        self.error.as_ref().is_some_and(|e| e.code == "ok")
    }
}

/// Response from the OAuth token endpoint
///
/// The same endpoint serves the authorization-code exchange and the
/// refresh-token grant, so all fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    /// New bearer token
    #[serde(default)]
    pub access_token: Option<String>,

    /// New refresh token, if the server rotated it
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Bearer token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// Token type, normally `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,

    /// Granted scopes
    #[serde(default)]
    pub scope: Option<String>,

    /// The authorized user's open id
    #[serde(default)]
    pub open_id: Option<String>,

    /// Error code on failure
    #[serde(default)]
    pub error: Option<String>,

    /// Error description on failure
    #[serde(default)]
    pub error_description: Option<String>,
}

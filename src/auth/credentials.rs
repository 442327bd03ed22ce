//! Credential value type
//!
//! Credentials are constructed once by the caller and threaded explicitly
//! through every operation; nothing in this crate reads them from ambient
//! state. The refresher produces a new value and never mutates the caller's
//! copy.

use chrono::{DateTime, Utc};

/// A bearer token plus the optional material needed to renew it
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Short-lived bearer token authorizing API calls
    pub access_token: String,

    /// Longer-lived token for minting a new bearer token
    pub refresh_token: Option<String>,

    /// When the bearer token expires, if known
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Create credentials from a bare access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Attach a refresh token
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Attach a known expiry time
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the bearer token is known to have expired.
    ///
    /// An unknown expiry reads as not expired; the server is the final
    /// arbiter either way.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }
}

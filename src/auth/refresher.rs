//! Refresh-token exchange
//!
//! Exchanges a refresh token for a new access token when the orchestrator
//! detects an authorization failure mid-session.

use chrono::{Duration, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    Result,
    auth::Credentials,
    config::Settings,
    types::TokenResponse,
};

/// Client for the OAuth token endpoint (refresh-token grant)
#[derive(Debug, Clone)]
pub struct CredentialRefresher {
    /// Shared HTTP client
    client: Client,
    /// Endpoint and timeout configuration
    settings: Settings,
    /// Application client key
    client_key: String,
    /// Application client secret
    client_secret: String,
}

impl CredentialRefresher {
    /// Create a new refresher bound to an application's client credentials
    pub fn new(
        client: Client,
        settings: Settings,
        client_key: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            settings,
            client_key: client_key.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Exchange a refresh token for new credentials.
    ///
    /// Returns `Ok(None)` when the token endpoint answers without an
    /// `access_token`, so the caller can report "re-authenticate manually"
    /// instead of a generic network error. Transport and decode failures
    /// surface as [`crate::Error::Network`].
    pub async fn refresh(&self, refresh_token: &str) -> Result<Option<Credentials>> {
        let url = self.settings.api.token_url();
        debug!("Requesting refresh-token grant from {}", url);

        let form = [
            ("client_key", self.client_key.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let response: TokenResponse = self
            .client
            .post(&url)
            .timeout(self.settings.http.init_timeout())
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        let Some(access_token) = response.access_token else {
            warn!(
                "Token endpoint returned no access token (error: {:?})",
                response.error
            );
            return Ok(None);
        };

        let mut credentials = Credentials::new(access_token);
        if let Some(refresh_token) = response.refresh_token {
            credentials = credentials.with_refresh_token(refresh_token);
        }
        if let Some(expires_in) = response.expires_in {
            credentials =
                credentials.with_expires_at(Utc::now() + Duration::seconds(expires_in as i64));
        }

        debug!("Obtained refreshed access token");
        Ok(Some(credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn refresher_for(server: &MockServer) -> CredentialRefresher {
        let mut settings = Settings::default();
        settings.api.base_url = server.uri();
        CredentialRefresher::new(Client::new(), settings, "key-1", "secret-1")
    }

    #[tokio::test]
    async fn test_refresh_returns_new_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/oauth/token/"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rft.old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "act.new",
                "refresh_token": "rft.new",
                "expires_in": 86400
            })))
            .expect(1)
            .mount(&server)
            .await;

        let refresher = refresher_for(&server);
        let credentials = refresher.refresh("rft.old").await.unwrap().unwrap();

        assert_eq!(credentials.access_token, "act.new");
        assert_eq!(credentials.refresh_token.as_deref(), Some("rft.new"));
        assert!(credentials.expires_at.is_some());
        assert!(!credentials.is_expired());
    }

    #[tokio::test]
    async fn test_refresh_without_access_token_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/oauth/token/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Refresh token has been revoked"
            })))
            .mount(&server)
            .await;

        let refresher = refresher_for(&server);
        let result = refresher.refresh("rft.revoked").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_refresh_malformed_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/oauth/token/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let refresher = refresher_for(&server);
        let err = refresher.refresh("rft").await.unwrap_err();
        assert!(matches!(err, crate::Error::Network(_)));
    }
}

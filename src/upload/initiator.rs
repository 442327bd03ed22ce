//! Session initiation
//!
//! Opens an upload session against the mode-selected init endpoint and
//! validates the response before any bytes are transmitted.

use reqwest::Client;
use tracing::{debug, info};

use crate::{
    Error, Result,
    auth::Credentials,
    config::Settings,
    types::{InitRequest, InitResponse, PostMetadata, UploadMode},
    upload::UploadPlan,
};

/// Server-side upload context returned by a successful initiation
///
/// One-shot: the session is discarded once the final chunk is acknowledged
/// or a non-recoverable error occurs. `bytes_acknowledged` only ever grows.
#[derive(Debug, Clone)]
pub struct UploadSession {
    /// Opaque publish identifier, returned to the caller on success
    pub publish_id: String,
    /// Session-scoped destination URL for chunk PUTs
    pub upload_url: String,
    /// The chunk geometry declared for this session
    pub plan: UploadPlan,
    /// Bytes durably received by the server so far
    pub bytes_acknowledged: u64,
    /// Delivery mode this session was opened with
    pub mode: UploadMode,
    /// Post metadata, present only for direct-post sessions
    pub post_info: Option<PostMetadata>,
}

/// Client for the session-initiation endpoints
#[derive(Debug, Clone)]
pub struct SessionInitiator {
    /// Shared HTTP client
    client: Client,
    /// Endpoint and timeout configuration
    settings: Settings,
}

impl SessionInitiator {
    /// Create a new initiator
    pub fn new(client: Client, settings: Settings) -> Self {
        Self { client, settings }
    }

    /// Open an upload session declaring the given chunk geometry.
    ///
    /// A non-`"ok"` status code classifies into [`Error::AuthExpired`] or
    /// [`Error::ServerRejected`]; an `"ok"` status missing `publish_id` or
    /// `upload_url` is a [`Error::ProtocolViolation`] — a partial success is
    /// never trusted.
    pub async fn open(
        &self,
        credentials: &Credentials,
        plan: &UploadPlan,
        mode: UploadMode,
        post_info: Option<PostMetadata>,
    ) -> Result<UploadSession> {
        let url = match mode {
            UploadMode::Inbox => self.settings.api.inbox_init_url(),
            UploadMode::DirectPost => self.settings.api.direct_post_init_url(),
        };

        // Inbox sessions never carry metadata, even if the caller supplied some
        let post_info = match mode {
            UploadMode::Inbox => None,
            UploadMode::DirectPost => post_info,
        };

        let body = InitRequest::from_plan(plan, post_info.clone());
        debug!(
            "Initiating upload session at {} ({} bytes, {} x {} byte chunks)",
            url, plan.total_size, plan.chunk_count, plan.chunk_size
        );

        let response: InitResponse = self
            .client
            .post(&url)
            .bearer_auth(&credentials.access_token)
            .timeout(self.settings.http.init_timeout())
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !response.is_ok() {
            return Err(match response.error {
                Some(status) => Error::from_api_code(status.code, status.message),
                None => Error::protocol_violation("initiation response missing status block"),
            });
        }

        let data = response.data.unwrap_or_default();
        let publish_id = data
            .publish_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::protocol_violation("initiation response missing publish_id"))?;
        let upload_url = data
            .upload_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::protocol_violation("initiation response missing upload_url"))?;

        url::Url::parse(&upload_url).map_err(|e| {
            Error::protocol_violation(format!("upload_url is not a valid URL: {}", e))
        })?;

        info!("Opened upload session: publish_id={}", publish_id);

        Ok(UploadSession {
            publish_id,
            upload_url,
            plan: plan.clone(),
            bytes_acknowledged: 0,
            mode,
            post_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn initiator_for(server: &MockServer) -> SessionInitiator {
        let mut settings = Settings::default();
        settings.api.base_url = server.uri();
        SessionInitiator::new(Client::new(), settings)
    }

    fn plan() -> UploadPlan {
        UploadPlan::for_size(3 * 1024 * 1024).unwrap()
    }

    #[tokio::test]
    async fn test_open_inbox_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/post/publish/inbox/video/init/"))
            .and(header("authorization", "Bearer act.test"))
            .and(body_partial_json(serde_json::json!({
                "source_info": {
                    "source": "FILE_UPLOAD",
                    "video_size": 3 * 1024 * 1024,
                    "chunk_size": 3 * 1024 * 1024,
                    "total_chunk_count": 1
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"publish_id": "v_inbox.1", "upload_url": format!("{}/upload/1", server.uri())},
                "error": {"code": "ok", "message": ""}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let initiator = initiator_for(&server);
        let session = initiator
            .open(&Credentials::new("act.test"), &plan(), UploadMode::Inbox, None)
            .await
            .unwrap();

        assert_eq!(session.publish_id, "v_inbox.1");
        assert_eq!(session.bytes_acknowledged, 0);
        assert_eq!(session.mode, UploadMode::Inbox);
        assert!(session.post_info.is_none());
    }

    #[tokio::test]
    async fn test_open_classifies_token_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/post/publish/inbox/video/init/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": {"code": "access_token_invalid", "message": "The access token is invalid"}
            })))
            .mount(&server)
            .await;

        let initiator = initiator_for(&server);
        let err = initiator
            .open(&Credentials::new("act.bad"), &plan(), UploadMode::Inbox, None)
            .await
            .unwrap_err();

        assert!(err.is_auth_expired());
    }

    #[tokio::test]
    async fn test_open_rejects_missing_status_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/post/publish/inbox/video/init/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let initiator = initiator_for(&server);
        let err = initiator
            .open(&Credentials::new("act.test"), &plan(), UploadMode::Inbox, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ProtocolViolation(_)));
        assert!(err.to_string().contains("status block"));
    }

    #[tokio::test]
    async fn test_open_rejects_partial_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/post/publish/inbox/video/init/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"publish_id": "v_inbox.1"},
                "error": {"code": "ok", "message": ""}
            })))
            .mount(&server)
            .await;

        let initiator = initiator_for(&server);
        let err = initiator
            .open(&Credentials::new("act.test"), &plan(), UploadMode::Inbox, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ProtocolViolation(_)));
        assert!(err.to_string().contains("upload_url"));
    }

    #[tokio::test]
    async fn test_direct_post_carries_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/post/publish/video/init/"))
            .and(body_partial_json(serde_json::json!({
                "post_info": {"title": "clip", "privacy_level": "SELF_ONLY"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"publish_id": "v_pub.1", "upload_url": format!("{}/upload/1", server.uri())},
                "error": {"code": "ok", "message": ""}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let initiator = initiator_for(&server);
        let session = initiator
            .open(
                &Credentials::new("act.test"),
                &plan(),
                UploadMode::DirectPost,
                Some(PostMetadata::new("clip")),
            )
            .await
            .unwrap();

        assert_eq!(session.mode, UploadMode::DirectPost);
        assert!(session.post_info.is_some());
    }
}

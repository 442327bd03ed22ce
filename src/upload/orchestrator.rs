//! Upload orchestration
//!
//! Drives the full upload state machine: plan, initiate (with a single
//! refresh-and-retry on an expired token), then transmit chunks strictly in
//! ascending order. Any transmit failure aborts the session — the
//! destination URL is one-shot and the server tracks a single monotonic byte
//! offset, so blind mid-session retry is never safe without re-querying the
//! acknowledged offset, which this client does not attempt.

use std::path::Path;
use std::sync::Arc;

use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use crate::{
    Error, Result,
    auth::{
        Credentials, CredentialRefresher, CredentialStore,
        store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY},
    },
    config::Settings,
    types::{PostMetadata, UploadMode},
    upload::{ChunkTransmitter, SessionInitiator, UploadPlan, UploadSession},
};

/// Drives one upload end to end
///
/// Each [`run`](UploadOrchestrator::run) invocation owns an independent
/// session and file handle; multiple uploads may run concurrently as fully
/// independent instances.
pub struct UploadOrchestrator {
    /// Shared HTTP client
    client: Client,
    /// Endpoint and timeout configuration
    settings: Settings,
    /// Session-initiation client
    initiator: SessionInitiator,
    /// Chunk PUT client
    transmitter: ChunkTransmitter,
    /// Token-endpoint client; refresh is only attempted when configured
    refresher: Option<CredentialRefresher>,
    /// Persistence collaborator for refreshed credentials
    store: Option<Arc<dyn CredentialStore>>,
}

impl UploadOrchestrator {
    /// Create a new orchestrator
    pub fn new(settings: Settings) -> Self {
        let client = Client::new();
        Self {
            initiator: SessionInitiator::new(client.clone(), settings.clone()),
            transmitter: ChunkTransmitter::new(client.clone(), settings.clone()),
            refresher: None,
            store: None,
            client,
            settings,
        }
    }

    /// Enable credential refresh with the application's client credentials
    pub fn with_refresher(
        mut self,
        client_key: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.refresher = Some(CredentialRefresher::new(
            self.client.clone(),
            self.settings.clone(),
            client_key,
            client_secret,
        ));
        self
    }

    /// Attach a persistence collaborator for refreshed credentials
    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Upload one video file and return its publish identifier.
    ///
    /// Direct-post uploads require `post_info`; inbox uploads ignore it.
    /// A single [`Error::AuthExpired`] at initiation triggers one
    /// refresh-and-retry; every other failure surfaces verbatim, annotated
    /// with the failing chunk's index and byte range where applicable.
    pub async fn run(
        &self,
        credentials: &Credentials,
        file_path: impl AsRef<Path>,
        mode: UploadMode,
        post_info: Option<PostMetadata>,
    ) -> Result<String> {
        let path = file_path.as_ref();

        if mode == UploadMode::DirectPost && post_info.is_none() {
            return Err(Error::invalid_input(
                "direct-post uploads require post metadata",
            ));
        }

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| Error::not_found(path))?;
        if !metadata.is_file() {
            return Err(Error::not_found(path));
        }
        let total_size = metadata.len();
        if total_size == 0 {
            return Err(Error::empty_file(path));
        }

        let plan = UploadPlan::for_size(total_size)?;
        info!(
            "Uploading {} ({} bytes, {} x {} byte chunks)",
            path.display(),
            plan.total_size,
            plan.chunk_count,
            plan.chunk_size
        );

        let mut session = self
            .initiate_with_refresh(credentials, &plan, mode, post_info)
            .await?;

        // One handle for the whole session; closed on every exit path by drop
        let mut file = File::open(path).await?;
        for index in 0..plan.chunk_count {
            let (start, end) = plan.chunk_range(index);
            let mut buffer = vec![0u8; (end - start + 1) as usize];
            file.read_exact(&mut buffer).await?;

            let acknowledged = self
                .transmitter
                .send(&session.upload_url, buffer, start, end, plan.total_size)
                .await
                .map_err(|err| {
                    error!(
                        "Aborting upload at chunk {} (bytes {}-{}): {}",
                        index, start, end, err
                    );
                    err.with_chunk_context(index, start, end)
                })?;

            session.bytes_acknowledged = session.bytes_acknowledged.max(acknowledged);
            info!(
                "Chunk {}/{} acknowledged ({}/{} bytes)",
                index + 1,
                plan.chunk_count,
                session.bytes_acknowledged,
                plan.total_size
            );
        }

        info!("Upload complete: publish_id={}", session.publish_id);
        Ok(session.publish_id)
    }

    /// Initiate the session, retrying exactly once with refreshed
    /// credentials if the token is rejected.
    async fn initiate_with_refresh(
        &self,
        credentials: &Credentials,
        plan: &UploadPlan,
        mode: UploadMode,
        post_info: Option<PostMetadata>,
    ) -> Result<UploadSession> {
        match self
            .initiator
            .open(credentials, plan, mode, post_info.clone())
            .await
        {
            Ok(session) => Ok(session),
            Err(err) if err.is_auth_expired() => {
                warn!("Initiation rejected the access token: {}", err);
                let refreshed = self.refresh_credentials(credentials).await?;
                match self.initiator.open(&refreshed, plan, mode, post_info).await {
                    Ok(session) => Ok(session),
                    Err(err) if err.is_auth_expired() => Err(Error::credentials_expired(format!(
                        "refreshed token was also rejected: {}",
                        err
                    ))),
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Exchange the refresh token for new credentials and persist them.
    ///
    /// Every failure mode here is terminal for the upload: the caller must
    /// re-authenticate out of band.
    async fn refresh_credentials(&self, current: &Credentials) -> Result<Credentials> {
        let Some(refresher) = &self.refresher else {
            return Err(Error::credentials_expired(
                "no client credentials configured for refresh",
            ));
        };
        let Some(refresh_token) = current.refresh_token.as_deref() else {
            return Err(Error::credentials_expired("no refresh token available"));
        };

        let refreshed = match refresher.refresh(refresh_token).await {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                return Err(Error::credentials_expired(
                    "token endpoint returned no access token; re-authenticate manually",
                ));
            }
            Err(err) => {
                return Err(Error::credentials_expired(format!(
                    "refresh request failed: {}",
                    err
                )));
            }
        };

        self.persist_credentials(&refreshed).await;
        Ok(refreshed)
    }

    /// Hand refreshed token material to the credential store, if configured.
    /// Persistence problems must not fail an otherwise-healthy upload.
    async fn persist_credentials(&self, credentials: &Credentials) {
        let Some(store) = &self.store else {
            return;
        };

        if let Err(err) = store.store(ACCESS_TOKEN_KEY, &credentials.access_token).await {
            warn!("Failed to persist refreshed access token: {}", err);
        }
        if let Some(refresh_token) = &credentials.refresh_token
            && let Err(err) = store.store(REFRESH_TOKEN_KEY, refresh_token).await
        {
            warn!("Failed to persist rotated refresh token: {}", err);
        }
    }
}

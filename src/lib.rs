//! TikTok Video Uploader - Rust Implementation
//!
//! A client for the TikTok Content Posting API that uploads large video
//! files via the chunked, sequential PUT-based upload protocol, with
//! transparent credential refresh when the bearer token expires mid-session.
//!
//! # Architecture
//!
//! One upload flows through three components, driven by the
//! [`UploadOrchestrator`]:
//! - **Planning**: [`upload::UploadPlan`] maps the file size to the chunk
//!   geometry the API requires up front
//! - **Initiation**: [`upload::SessionInitiator`] opens the session and
//!   returns the publish id and destination URL
//! - **Transmission**: [`upload::ChunkTransmitter`] PUTs each byte range in
//!   strict order and tracks the server-acknowledged offset
//!
//! An expired access token at initiation is recovered exactly once via
//! [`auth::CredentialRefresher`]; refreshed credentials are handed to an
//! injectable [`auth::CredentialStore`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use tiktok_video_uploader::{Credentials, Settings, UploadMode, UploadOrchestrator};
//!
//! # async fn example() -> tiktok_video_uploader::Result<()> {
//! let settings = Settings::default();
//! let orchestrator = UploadOrchestrator::new(settings);
//!
//! let credentials = Credentials::new("act.example");
//! let publish_id = orchestrator
//!     .run(&credentials, "video.mp4", UploadMode::Inbox, None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod types;
pub mod upload;

pub use auth::{CredentialRefresher, CredentialStore, Credentials, MemoryCredentialStore};
pub use config::Settings;
pub use error::{Error, FailureKind, Result};
pub use types::{PostMetadata, PrivacyLevel, UploadMode};
pub use upload::{UploadOrchestrator, UploadPlan};

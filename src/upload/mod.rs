//! # Upload Module
//!
//! The core of the crate: chunk planning, session initiation, chunk
//! transmission and the orchestration tying them together.
//!
//! ## Protocol shape
//!
//! The remote API accepts a video as one session-initiation POST declaring
//! the exact chunk geometry, followed by that many chunk PUTs to a
//! session-scoped URL, strictly in ascending byte order. The server tracks a
//! single monotonic acknowledged-bytes offset per session; nothing here is
//! parallel, and no chunk is sent before the previous one is acknowledged.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use tiktok_video_uploader::{Credentials, Settings, UploadMode, UploadOrchestrator};
//!
//! # tokio_test::block_on(async {
//! let orchestrator = UploadOrchestrator::new(Settings::default())
//!     .with_refresher("client-key", "client-secret");
//!
//! let credentials = Credentials::new("act.example").with_refresh_token("rft.example");
//! let publish_id = orchestrator
//!     .run(&credentials, "video.mp4", UploadMode::Inbox, None)
//!     .await?;
//! println!("Uploaded: {}", publish_id);
//! # Ok::<(), tiktok_video_uploader::Error>(())
//! # });
//! ```

pub mod initiator;
pub mod orchestrator;
pub mod planner;
pub mod transmitter;

pub use initiator::{SessionInitiator, UploadSession};
pub use orchestrator::UploadOrchestrator;
pub use planner::{
    DEFAULT_CHUNK_SIZE, FINAL_CHUNK_CEILING, MAX_CHUNK_COUNT, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE,
    UploadPlan,
};
pub use transmitter::ChunkTransmitter;
